//! Hosted zone lookup and load balancer alias records

use crate::control_plane::ControlPlane;
use crate::error::{CloudError, Result};
use crate::orchestrator::Orchestrator;
use crate::types::{
    AliasTarget, ChangeAction, ChangeBatch, ChangeInfo, HostedZone, RecordChange, RecordSet,
};
use tracing::info;

/// Enough to see a public and a private zone sharing one name
const HOSTED_ZONE_PAGE_SIZE: u32 = 10;
const ALIAS_RECORD_TYPE: &str = "A";
const DUALSTACK_PREFIX: &str = "dualstack.";

/// Registered domains are stored fully qualified, with a trailing dot
pub fn fully_qualified(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    }
}

pub struct HostedZones<'a> {
    control_plane: &'a dyn ControlPlane,
    orchestrator: &'a Orchestrator,
}

impl<'a> HostedZones<'a> {
    pub fn new(control_plane: &'a dyn ControlPlane, orchestrator: &'a Orchestrator) -> Self {
        Self {
            control_plane,
            orchestrator,
        }
    }

    /// The single hosted zone named exactly `<domain>.`
    pub async fn find(&self, domain: &str) -> Result<HostedZone> {
        let dns_name = fully_qualified(domain);
        let zones = self
            .orchestrator
            .run(
                format!("Querying Route 53 for the hosted zone associated with domain name '{domain}'"),
                || {
                    self.control_plane
                        .list_hosted_zones_by_name(&dns_name, HOSTED_ZONE_PAGE_SIZE)
                },
            )
            .await?;

        // The listing starts at `dns_name` but continues with later names
        let mut matching: Vec<HostedZone> = zones
            .into_iter()
            .filter(|z| z.name.eq_ignore_ascii_case(&dns_name))
            .collect();

        match matching.len() {
            0 => Err(CloudError::NoHostedZone(domain.to_string())),
            1 => {
                let zone = matching.remove(0);
                info!(domain = %domain, hosted_zone = %zone.id, "found hosted zone");
                Ok(zone)
            }
            _ => Err(CloudError::MultipleHostedZones(domain.to_string())),
        }
    }
}

/// Alias records from each tenant subdomain to the shared load balancer
#[derive(Debug, Clone)]
pub struct AliasRequest {
    pub domain: String,
    pub hosted_zone_id: String,
    pub elb_dns_name: String,
    pub elb_hosted_zone_id: String,
    pub subdomains: Vec<String>,
}

impl AliasRequest {
    /// One UPSERT `A` alias per `<subdomain>.<domain>`
    pub fn change_batch(&self) -> ChangeBatch {
        let target = AliasTarget {
            dns_name: format!("{DUALSTACK_PREFIX}{}", self.elb_dns_name),
            hosted_zone_id: self.elb_hosted_zone_id.clone(),
            evaluate_target_health: false,
        };

        ChangeBatch {
            comment: "Adding alias from domain name to ELB domain name".to_string(),
            changes: self
                .subdomains
                .iter()
                .map(|subdomain| RecordChange {
                    action: ChangeAction::Upsert,
                    record: RecordSet {
                        name: format!("{}.{}", subdomain, self.domain),
                        record_type: ALIAS_RECORD_TYPE.to_string(),
                        ttl: None,
                        values: Vec::new(),
                        alias: Some(target.clone()),
                    },
                })
                .collect(),
        }
    }
}

pub struct AliasRecords<'a> {
    control_plane: &'a dyn ControlPlane,
    orchestrator: &'a Orchestrator,
}

impl<'a> AliasRecords<'a> {
    pub fn new(control_plane: &'a dyn ControlPlane, orchestrator: &'a Orchestrator) -> Self {
        Self {
            control_plane,
            orchestrator,
        }
    }

    pub async fn create(&self, request: &AliasRequest) -> Result<ChangeInfo> {
        let batch = request.change_batch();
        let change = self
            .orchestrator
            .run(
                format!(
                    "Create alias record in Hosted Zone for domain name '{}' to '{}'",
                    request.domain, request.elb_dns_name
                ),
                || {
                    self.control_plane
                        .change_record_sets(&request.hosted_zone_id, &batch)
                },
            )
            .await?;
        info!(status = %change.status, id = %change.id, "alias records submitted");
        Ok(change)
    }
}
