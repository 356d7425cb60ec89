//! Scripted control plane for unit tests

use crate::control_plane::ControlPlane;
use crate::error::{ControlPlaneError, ControlPlaneResult};
use crate::types::{
    CertificateDetail, CertificateRequest, ChangeBatch, ChangeInfo, DomainRegistration,
    HostedZone, OperationDetail, StackDescription, StackOperation, StackRequest,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

pub struct MockControlPlane {
    failing: Option<&'static str>,
    calls: Mutex<Vec<String>>,
    stack_requests: Mutex<Vec<StackRequest>>,
    hosted_zones: Vec<HostedZone>,
    certificates: Mutex<VecDeque<CertificateDetail>>,
    change_batches: Mutex<Vec<(String, ChangeBatch)>>,
    certificate_requests: Mutex<Vec<CertificateRequest>>,
    availability: String,
    registrations: Mutex<Vec<DomainRegistration>>,
}

impl MockControlPlane {
    pub fn new() -> Self {
        Self {
            failing: None,
            calls: Mutex::new(Vec::new()),
            stack_requests: Mutex::new(Vec::new()),
            hosted_zones: Vec::new(),
            certificates: Mutex::new(VecDeque::new()),
            change_batches: Mutex::new(Vec::new()),
            certificate_requests: Mutex::new(Vec::new()),
            availability: "AVAILABLE".to_string(),
            registrations: Mutex::new(Vec::new()),
        }
    }

    /// Makes every call to `operation` fail with a raw output
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing = Some(operation);
        self
    }

    pub fn with_hosted_zones(mut self, zones: Vec<HostedZone>) -> Self {
        self.hosted_zones = zones;
        self
    }

    /// Successive `describe_certificate` answers; the last one repeats
    pub fn with_certificates(self, details: Vec<CertificateDetail>) -> Self {
        *self.certificates.lock().unwrap() = details.into();
        self
    }

    pub fn with_availability(mut self, status: &str) -> Self {
        self.availability = status.to_string();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(operation))
            .count()
    }

    pub fn stack_requests(&self) -> Vec<StackRequest> {
        self.stack_requests.lock().unwrap().clone()
    }

    pub fn change_batches(&self) -> Vec<(String, ChangeBatch)> {
        self.change_batches.lock().unwrap().clone()
    }

    pub fn certificate_requests(&self) -> Vec<CertificateRequest> {
        self.certificate_requests.lock().unwrap().clone()
    }

    pub fn registrations(&self) -> Vec<DomainRegistration> {
        self.registrations.lock().unwrap().clone()
    }

    fn record(&self, operation: &str, subject: &str) -> ControlPlaneResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation} {subject}"));
        if self.failing == Some(operation) {
            return Err(ControlPlaneError::new(format!("{operation} rejected"))
                .with_output(format!("{{\"operation\": \"{operation}\"}}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ControlPlane for MockControlPlane {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_stack(&self, request: &StackRequest) -> ControlPlaneResult<StackOperation> {
        self.record("create_stack", &request.stack_name)?;
        self.stack_requests.lock().unwrap().push(request.clone());
        Ok(StackOperation {
            stack_id: Some(format!("stack/{}", request.stack_name)),
        })
    }

    async fn update_stack(&self, request: &StackRequest) -> ControlPlaneResult<StackOperation> {
        self.record("update_stack", &request.stack_name)?;
        self.stack_requests.lock().unwrap().push(request.clone());
        Ok(StackOperation {
            stack_id: Some(format!("stack/{}", request.stack_name)),
        })
    }

    async fn describe_stack(&self, stack_name: &str) -> ControlPlaneResult<StackDescription> {
        self.record("describe_stack", stack_name)?;
        Ok(StackDescription {
            stack_name: stack_name.to_string(),
            status: "CREATE_COMPLETE".to_string(),
            status_reason: None,
            outputs: Vec::new(),
        })
    }

    async fn delete_stack(&self, stack_name: &str) -> ControlPlaneResult<()> {
        self.record("delete_stack", stack_name)
    }

    async fn availability_zones(&self, region: &str) -> ControlPlaneResult<Vec<String>> {
        self.record("availability_zones", region)?;
        Ok(vec![format!("{region}a"), format!("{region}b")])
    }

    async fn list_hosted_zones_by_name(
        &self,
        dns_name: &str,
        max_items: u32,
    ) -> ControlPlaneResult<Vec<HostedZone>> {
        self.record("list_hosted_zones_by_name", dns_name)?;
        Ok(self
            .hosted_zones
            .iter()
            .filter(|z| z.name.as_str() >= dns_name)
            .take(max_items as usize)
            .cloned()
            .collect())
    }

    async fn change_record_sets(
        &self,
        hosted_zone_id: &str,
        batch: &ChangeBatch,
    ) -> ControlPlaneResult<ChangeInfo> {
        self.record("change_record_sets", hosted_zone_id)?;
        self.change_batches
            .lock()
            .unwrap()
            .push((hosted_zone_id.to_string(), batch.clone()));
        Ok(ChangeInfo {
            id: "/change/C1".to_string(),
            status: "PENDING".to_string(),
        })
    }

    async fn request_certificate(
        &self,
        request: &CertificateRequest,
    ) -> ControlPlaneResult<String> {
        self.record("request_certificate", &request.domain_name)?;
        self.certificate_requests
            .lock()
            .unwrap()
            .push(request.clone());
        Ok("arn:aws:acm:us-west-2:123456789012:certificate/abc".to_string())
    }

    async fn describe_certificate(&self, arn: &str) -> ControlPlaneResult<CertificateDetail> {
        self.record("describe_certificate", arn)?;
        let mut queue = self.certificates.lock().unwrap();
        let detail = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        detail.ok_or_else(|| ControlPlaneError::new("no certificate scripted"))
    }

    async fn check_domain_availability(&self, domain_name: &str) -> ControlPlaneResult<String> {
        self.record("check_domain_availability", domain_name)?;
        Ok(self.availability.clone())
    }

    async fn register_domain(
        &self,
        registration: &DomainRegistration,
    ) -> ControlPlaneResult<String> {
        self.record("register_domain", &registration.domain_name)?;
        self.registrations
            .lock()
            .unwrap()
            .push(registration.clone());
        Ok("op-1234".to_string())
    }

    async fn get_operation_detail(
        &self,
        operation_id: &str,
    ) -> ControlPlaneResult<OperationDetail> {
        self.record("get_operation_detail", operation_id)?;
        Ok(OperationDetail {
            operation_id: operation_id.to_string(),
            status: "IN_PROGRESS".to_string(),
            domain_name: None,
            message: None,
        })
    }
}
