//! JSON shapes accepted and printed by the aws CLI

use serde::{Deserialize, Serialize};
use tenantstack_cloud::{
    CertificateDetail, ChangeBatch, ChangeInfo, ContactDetail, DomainValidation, HostedZone,
    OperationDetail, StackDescription, StackOutput, ValidationRecord,
};
use tenantstack_template::ParameterValue;

// Requests

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackParameter<'a> {
    pub parameter_key: &'a str,
    pub parameter_value: &'a str,
}

impl<'a> From<&'a ParameterValue> for StackParameter<'a> {
    fn from(p: &'a ParameterValue) -> Self {
        Self {
            parameter_key: &p.key,
            parameter_value: &p.value,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireChangeBatch {
    pub comment: String,
    pub changes: Vec<WireChange>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireChange {
    pub action: &'static str,
    pub resource_record_set: WireRecordSet,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireRecordSet {
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource_records: Vec<WireRecordValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<WireAliasTarget>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireRecordValue {
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireAliasTarget {
    pub hosted_zone_id: String,
    #[serde(rename = "DNSName")]
    pub dns_name: String,
    pub evaluate_target_health: bool,
}

impl From<&ChangeBatch> for WireChangeBatch {
    fn from(batch: &ChangeBatch) -> Self {
        Self {
            comment: batch.comment.clone(),
            changes: batch
                .changes
                .iter()
                .map(|change| WireChange {
                    action: change.action.as_str(),
                    resource_record_set: WireRecordSet {
                        name: change.record.name.clone(),
                        record_type: change.record.record_type.clone(),
                        ttl: change.record.ttl,
                        resource_records: change
                            .record
                            .values
                            .iter()
                            .map(|value| WireRecordValue {
                                value: value.clone(),
                            })
                            .collect(),
                        alias_target: change.record.alias.as_ref().map(|alias| WireAliasTarget {
                            hosted_zone_id: alias.hosted_zone_id.clone(),
                            dns_name: alias.dns_name.clone(),
                            evaluate_target_health: alias.evaluate_target_health,
                        }),
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireContact<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub contact_type: &'a str,
    pub organization_name: &'a str,
    pub address_line1: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub country_code: &'a str,
    pub zip_code: &'a str,
    pub phone_number: &'a str,
    pub email: &'a str,
}

impl<'a> From<&'a ContactDetail> for WireContact<'a> {
    fn from(c: &'a ContactDetail) -> Self {
        Self {
            first_name: &c.first_name,
            last_name: &c.last_name,
            contact_type: &c.contact_type,
            organization_name: &c.organization_name,
            address_line1: &c.address_line1,
            city: &c.city,
            state: &c.state,
            country_code: &c.country_code,
            zip_code: &c.zip_code,
            phone_number: &c.phone_number,
            email: &c.email,
        }
    }
}

// Responses

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackIdResponse {
    pub stack_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeStacksResponse {
    #[serde(default)]
    pub stacks: Vec<WireStack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireStack {
    pub stack_name: String,
    pub stack_status: String,
    pub stack_status_reason: Option<String>,
    #[serde(default)]
    pub outputs: Vec<WireStackOutput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireStackOutput {
    pub output_key: String,
    pub output_value: String,
}

impl From<WireStack> for StackDescription {
    fn from(stack: WireStack) -> Self {
        Self {
            stack_name: stack.stack_name,
            status: stack.stack_status,
            status_reason: stack.stack_status_reason,
            outputs: stack
                .outputs
                .into_iter()
                .map(|o| StackOutput {
                    key: o.output_key,
                    value: o.output_value,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AvailabilityZonesResponse {
    #[serde(default)]
    pub availability_zones: Vec<WireAvailabilityZone>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireAvailabilityZone {
    pub zone_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZonesResponse {
    #[serde(default)]
    pub hosted_zones: Vec<WireHostedZone>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireHostedZone {
    pub id: String,
    pub name: String,
}

impl From<WireHostedZone> for HostedZone {
    fn from(zone: WireHostedZone) -> Self {
        Self {
            id: zone.id,
            name: zone.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeInfoResponse {
    pub change_info: WireChangeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireChangeInfo {
    pub id: String,
    pub status: String,
}

impl From<WireChangeInfo> for ChangeInfo {
    fn from(info: WireChangeInfo) -> Self {
        Self {
            id: info.id,
            status: info.status,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestCertificateResponse {
    pub certificate_arn: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeCertificateResponse {
    pub certificate: WireCertificate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireCertificate {
    pub certificate_arn: String,
    pub status: String,
    #[serde(default)]
    pub domain_validation_options: Vec<WireDomainValidation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireDomainValidation {
    pub domain_name: String,
    pub resource_record: Option<WireResourceRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireResourceRecord {
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    pub value: String,
}

impl From<WireCertificate> for CertificateDetail {
    fn from(cert: WireCertificate) -> Self {
        Self {
            arn: cert.certificate_arn,
            status: cert.status,
            domain_validations: cert
                .domain_validation_options
                .into_iter()
                .map(|v| DomainValidation {
                    domain_name: v.domain_name,
                    resource_record: v.resource_record.map(|r| ValidationRecord {
                        name: r.name,
                        record_type: r.record_type,
                        value: r.value,
                    }),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainAvailabilityResponse {
    pub availability: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperationIdResponse {
    pub operation_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperationDetailResponse {
    pub operation_id: String,
    #[serde(default)]
    pub status: String,
    pub domain_name: Option<String>,
    pub message: Option<String>,
}

impl From<OperationDetailResponse> for OperationDetail {
    fn from(op: OperationDetailResponse) -> Self {
        Self {
            operation_id: op.operation_id,
            status: op.status,
            domain_name: op.domain_name,
            message: op.message,
        }
    }
}
