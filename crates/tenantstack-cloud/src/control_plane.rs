//! Cloud control plane abstraction

use crate::error::ControlPlaneResult;
use crate::types::{
    CertificateDetail, CertificateRequest, ChangeBatch, ChangeInfo, DomainRegistration,
    HostedZone, OperationDetail, StackDescription, StackOperation, StackRequest,
};
use async_trait::async_trait;

/// Remote provisioning API the workflows drive
///
/// Implementations translate each call to the provider's wire protocol. Every
/// call is a single request; none of them waits for the remote side to reach a
/// terminal state.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Returns the control plane name (e.g., "aws-cli")
    fn name(&self) -> &str;

    async fn create_stack(&self, request: &StackRequest) -> ControlPlaneResult<StackOperation>;

    async fn update_stack(&self, request: &StackRequest) -> ControlPlaneResult<StackOperation>;

    async fn describe_stack(&self, stack_name: &str) -> ControlPlaneResult<StackDescription>;

    async fn delete_stack(&self, stack_name: &str) -> ControlPlaneResult<()>;

    /// Zone names available in `region`
    async fn availability_zones(&self, region: &str) -> ControlPlaneResult<Vec<String>>;

    /// Hosted zones in lexicographic order starting at `dns_name`
    async fn list_hosted_zones_by_name(
        &self,
        dns_name: &str,
        max_items: u32,
    ) -> ControlPlaneResult<Vec<HostedZone>>;

    async fn change_record_sets(
        &self,
        hosted_zone_id: &str,
        batch: &ChangeBatch,
    ) -> ControlPlaneResult<ChangeInfo>;

    /// Returns the new certificate's ARN
    async fn request_certificate(&self, request: &CertificateRequest) -> ControlPlaneResult<String>;

    async fn describe_certificate(&self, arn: &str) -> ControlPlaneResult<CertificateDetail>;

    /// Returns the availability status, e.g. `AVAILABLE`
    async fn check_domain_availability(&self, domain_name: &str) -> ControlPlaneResult<String>;

    /// Returns the asynchronous registration operation id
    async fn register_domain(
        &self,
        registration: &DomainRegistration,
    ) -> ControlPlaneResult<String>;

    async fn get_operation_detail(&self, operation_id: &str) -> ControlPlaneResult<OperationDetail>;
}
