//! AWS control plane implementation

use crate::cli::{self, AwsCli, DOMAINS_REGION};
use crate::error::{AwsError, Result};
use crate::wire::{
    AvailabilityZonesResponse, ChangeInfoResponse, DescribeCertificateResponse,
    DescribeStacksResponse, DomainAvailabilityResponse, HostedZonesResponse,
    OperationDetailResponse, OperationIdResponse, RequestCertificateResponse, StackIdResponse,
};
use async_trait::async_trait;
use tenantstack_cloud::{
    CertificateDetail, CertificateRequest, ChangeBatch, ChangeInfo, ControlPlane,
    ControlPlaneResult, DomainRegistration, HostedZone, OperationDetail, StackDescription,
    StackOperation, StackRequest,
};

/// Control plane that shells out to the aws CLI
pub struct AwsControlPlane {
    cli: AwsCli,
}

impl AwsControlPlane {
    pub fn new(profile: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            cli: AwsCli::new(profile, region),
        }
    }

    pub fn from_cli(cli: AwsCli) -> Self {
        Self { cli }
    }

    pub fn cli(&self) -> &AwsCli {
        &self.cli
    }

    async fn stack_operation(
        &self,
        operation: &str,
        request: &StackRequest,
    ) -> Result<StackOperation> {
        let args = cli::stack_args(request)?;
        let response: StackIdResponse = self.cli.call("cloudformation", operation, &args).await?;
        Ok(StackOperation {
            stack_id: response.stack_id,
        })
    }

    async fn describe_stack_inner(&self, stack_name: &str) -> Result<StackDescription> {
        let response: DescribeStacksResponse = self
            .cli
            .call("cloudformation", "describe-stacks", &cli::stack_name_args(stack_name))
            .await?;
        response
            .stacks
            .into_iter()
            .next()
            .map(StackDescription::from)
            .ok_or_else(|| AwsError::UnexpectedResponse(format!("no stack named '{stack_name}'")))
    }
}

#[async_trait]
impl ControlPlane for AwsControlPlane {
    fn name(&self) -> &str {
        "aws-cli"
    }

    async fn create_stack(&self, request: &StackRequest) -> ControlPlaneResult<StackOperation> {
        Ok(self.stack_operation("create-stack", request).await?)
    }

    async fn update_stack(&self, request: &StackRequest) -> ControlPlaneResult<StackOperation> {
        Ok(self.stack_operation("update-stack", request).await?)
    }

    async fn describe_stack(&self, stack_name: &str) -> ControlPlaneResult<StackDescription> {
        Ok(self.describe_stack_inner(stack_name).await?)
    }

    async fn delete_stack(&self, stack_name: &str) -> ControlPlaneResult<()> {
        self.cli
            .run("cloudformation", "delete-stack", &cli::stack_name_args(stack_name))
            .await?;
        Ok(())
    }

    async fn availability_zones(&self, region: &str) -> ControlPlaneResult<Vec<String>> {
        let response: AvailabilityZonesResponse = self
            .cli
            .call_in(
                region,
                "ec2",
                "describe-availability-zones",
                &cli::availability_zone_args(region),
            )
            .await?;
        Ok(response
            .availability_zones
            .into_iter()
            .map(|z| z.zone_name)
            .collect())
    }

    async fn list_hosted_zones_by_name(
        &self,
        dns_name: &str,
        max_items: u32,
    ) -> ControlPlaneResult<Vec<HostedZone>> {
        let response: HostedZonesResponse = self
            .cli
            .call(
                "route53",
                "list-hosted-zones-by-name",
                &cli::hosted_zone_args(dns_name, max_items),
            )
            .await?;
        Ok(response.hosted_zones.into_iter().map(HostedZone::from).collect())
    }

    async fn change_record_sets(
        &self,
        hosted_zone_id: &str,
        batch: &ChangeBatch,
    ) -> ControlPlaneResult<ChangeInfo> {
        let args = cli::change_batch_args(hosted_zone_id, batch)?;
        let response: ChangeInfoResponse = self
            .cli
            .call("route53", "change-resource-record-sets", &args)
            .await?;
        Ok(response.change_info.into())
    }

    async fn request_certificate(
        &self,
        request: &CertificateRequest,
    ) -> ControlPlaneResult<String> {
        let response: RequestCertificateResponse = self
            .cli
            .call("acm", "request-certificate", &cli::certificate_args(request))
            .await?;
        Ok(response.certificate_arn)
    }

    async fn describe_certificate(&self, arn: &str) -> ControlPlaneResult<CertificateDetail> {
        let response: DescribeCertificateResponse = self
            .cli
            .call("acm", "describe-certificate", &cli::certificate_arn_args(arn))
            .await?;
        Ok(response.certificate.into())
    }

    async fn check_domain_availability(&self, domain_name: &str) -> ControlPlaneResult<String> {
        let response: DomainAvailabilityResponse = self
            .cli
            .call_in(
                DOMAINS_REGION,
                "route53domains",
                "check-domain-availability",
                &cli::domain_name_args(domain_name),
            )
            .await?;
        Ok(response.availability)
    }

    async fn register_domain(
        &self,
        registration: &DomainRegistration,
    ) -> ControlPlaneResult<String> {
        let args = cli::registration_args(registration)?;
        let response: OperationIdResponse = self
            .cli
            .call_in(DOMAINS_REGION, "route53domains", "register-domain", &args)
            .await?;
        Ok(response.operation_id)
    }

    async fn get_operation_detail(
        &self,
        operation_id: &str,
    ) -> ControlPlaneResult<OperationDetail> {
        let response: OperationDetailResponse = self
            .cli
            .call_in(
                DOMAINS_REGION,
                "route53domains",
                "get-operation-detail",
                &cli::operation_id_args(operation_id),
            )
            .await?;
        Ok(response.into())
    }
}
