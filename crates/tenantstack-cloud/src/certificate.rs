//! Wildcard certificate issuance with DNS validation

use crate::control_plane::ControlPlane;
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::retry::{Availability, RetryPolicy, poll_until_available};
use crate::types::{
    CertificateDetail, CertificateRequest, ChangeAction, ChangeBatch, ChangeInfo, RecordChange,
    RecordSet, ValidationRecord,
};
use tracing::info;

pub const VALIDATION_METHOD_DNS: &str = "DNS";
pub const VALIDATION_RECORD_TTL_SECONDS: u64 = 300;

/// Result of [`Certificates::setup_ssl`]
#[derive(Debug, Clone)]
pub struct CertificateSetup {
    pub arn: String,
    pub validation_change: ChangeInfo,
}

pub struct Certificates<'a> {
    control_plane: &'a dyn ControlPlane,
    orchestrator: &'a Orchestrator,
    policy: RetryPolicy,
}

impl<'a> Certificates<'a> {
    pub fn new(control_plane: &'a dyn ControlPlane, orchestrator: &'a Orchestrator) -> Self {
        Self {
            control_plane,
            orchestrator,
            policy: RetryPolicy::CERTIFICATE_VALIDATION,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Requests `*.<domain>` (plus the apex), waits for its validation record
    /// and upserts that record into `hosted_zone_id`
    pub async fn setup_ssl(&self, domain: &str, hosted_zone_id: &str) -> Result<CertificateSetup> {
        let arn = self.request(domain).await?;
        info!(arn = %arn, "created certificate");

        let record = self.validation_record(&arn).await?;
        let validation_change = self.upsert_validation_record(hosted_zone_id, &record).await?;
        info!(status = %validation_change.status, "DNS validation record submitted");

        Ok(CertificateSetup {
            arn,
            validation_change,
        })
    }

    async fn request(&self, domain: &str) -> Result<String> {
        let request = CertificateRequest {
            domain_name: format!("*.{domain}"),
            subject_alternative_names: vec![domain.to_string()],
            validation_method: VALIDATION_METHOD_DNS.to_string(),
        };
        self.orchestrator
            .run(format!("Requesting SSL Certificate for: '{domain}'"), || {
                self.control_plane.request_certificate(&request)
            })
            .await
    }

    /// Polls until the control plane has populated the validation record
    async fn validation_record(&self, arn: &str) -> Result<ValidationRecord> {
        let action =
            format!("Retrieving resource record for DNS certification for certificate '{arn}'");
        let control_plane = self.control_plane;
        let orchestrator = self.orchestrator;
        let description = action.as_str();

        poll_until_available(&self.policy, &action, arn, move || async move {
            let detail = orchestrator
                .run(description, || control_plane.describe_certificate(arn))
                .await?;
            Ok(match detail.validation_record() {
                Some(record) => Availability::Ready(record.clone()),
                None => Availability::Pending,
            })
        })
        .await
    }

    async fn upsert_validation_record(
        &self,
        hosted_zone_id: &str,
        record: &ValidationRecord,
    ) -> Result<ChangeInfo> {
        let batch = ChangeBatch {
            comment: "Adding DNS validation CNAME".to_string(),
            changes: vec![RecordChange {
                action: ChangeAction::Upsert,
                record: RecordSet {
                    name: record.name.clone(),
                    record_type: record.record_type.clone(),
                    ttl: Some(VALIDATION_RECORD_TTL_SECONDS),
                    values: vec![record.value.clone()],
                    alias: None,
                },
            }],
        };
        self.orchestrator
            .run(batch.comment.clone(), || {
                self.control_plane.change_record_sets(hosted_zone_id, &batch)
            })
            .await
    }

    pub async fn describe(&self, arn: &str) -> Result<CertificateDetail> {
        self.orchestrator
            .run("Describe Aws Certificate Manager certificate", || {
                self.control_plane.describe_certificate(arn)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloudError;
    use crate::testing::MockControlPlane;
    use crate::types::DomainValidation;
    use std::time::Duration;
    use tracing::Span;

    fn detail(record: Option<ValidationRecord>) -> CertificateDetail {
        CertificateDetail {
            arn: "arn:aws:acm:us-west-2:123456789012:certificate/abc".into(),
            status: "PENDING_VALIDATION".into(),
            domain_validations: vec![DomainValidation {
                domain_name: "*.example.com".into(),
                resource_record: record,
            }],
        }
    }

    fn record() -> ValidationRecord {
        ValidationRecord {
            name: "_x1.example.com.".into(),
            record_type: "CNAME".into(),
            value: "_x2.acm-validations.aws.".into(),
        }
    }

    fn fast() -> RetryPolicy {
        RetryPolicy::new(5, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_setup_ssl_waits_for_record_then_upserts_it() {
        let cp = MockControlPlane::new().with_certificates(vec![
            detail(None),
            detail(None),
            detail(Some(record())),
        ]);
        let orchestrator = Orchestrator::new(Span::none());
        let setup = Certificates::new(&cp, &orchestrator)
            .with_policy(fast())
            .setup_ssl("example.com", "Z123")
            .await
            .unwrap();

        assert!(setup.arn.starts_with("arn:aws:acm:"));
        assert_eq!(cp.count("describe_certificate"), 3);

        let requests = cp.certificate_requests();
        assert_eq!(requests[0].domain_name, "*.example.com");
        assert_eq!(requests[0].subject_alternative_names, vec!["example.com"]);
        assert_eq!(requests[0].validation_method, "DNS");

        let batches = cp.change_batches();
        assert_eq!(batches.len(), 1);
        let (zone, batch) = &batches[0];
        assert_eq!(zone, "Z123");
        let change = &batch.changes[0];
        assert_eq!(change.action, ChangeAction::Upsert);
        assert_eq!(change.record.name, "_x1.example.com.");
        assert_eq!(change.record.record_type, "CNAME");
        assert_eq!(change.record.ttl, Some(300));
        assert_eq!(change.record.values, vec!["_x2.acm-validations.aws."]);
    }

    #[tokio::test]
    async fn test_record_absent_for_every_poll_exhausts() {
        let cp = MockControlPlane::new().with_certificates(vec![detail(None)]);
        let orchestrator = Orchestrator::new(Span::none());
        let err = Certificates::new(&cp, &orchestrator)
            .with_policy(fast())
            .setup_ssl("example.com", "Z123")
            .await
            .unwrap_err();

        assert_eq!(cp.count("describe_certificate"), 5);
        assert!(cp.change_batches().is_empty());
        match err {
            CloudError::RetryExhausted {
                resource, attempts, ..
            } => {
                assert_eq!(resource, "arn:aws:acm:us-west-2:123456789012:certificate/abc");
                assert_eq!(attempts, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_describe_failure_is_not_retried() {
        let cp = MockControlPlane::new().failing("describe_certificate");
        let orchestrator = Orchestrator::new(Span::none());
        let err = Certificates::new(&cp, &orchestrator)
            .with_policy(fast())
            .setup_ssl("example.com", "Z123")
            .await
            .unwrap_err();

        assert_eq!(cp.count("describe_certificate"), 1);
        assert!(matches!(err, CloudError::OperationFailed { .. }));
    }
}
