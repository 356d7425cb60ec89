//! Domain name registration

use crate::control_plane::ControlPlane;
use crate::error::{CloudError, Result};
use crate::orchestrator::Orchestrator;
use crate::types::{ContactDetail, DomainRegistration, OperationDetail};
use tracing::info;

pub const AVAILABLE: &str = "AVAILABLE";
pub const DEFAULT_CONTACT_TYPE: &str = "ASSOCIATION";
pub const COUNTRY_CODE_US: &str = "US";
const REGISTRATION_YEARS: u32 = 1;

/// Registrant details as entered by the operator
#[derive(Debug, Clone, Default)]
pub struct Registrant {
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub email: String,
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    /// Defaults to [`DEFAULT_CONTACT_TYPE`]
    pub contact_type: Option<String>,
}

impl Registrant {
    fn contact(&self) -> ContactDetail {
        ContactDetail {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            organization_name: self.organization.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            address_line1: self.street_address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            country_code: COUNTRY_CODE_US.to_string(),
            contact_type: self
                .contact_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTACT_TYPE.to_string()),
        }
    }
}

pub struct Domains<'a> {
    control_plane: &'a dyn ControlPlane,
    orchestrator: &'a Orchestrator,
}

impl<'a> Domains<'a> {
    pub fn new(control_plane: &'a dyn ControlPlane, orchestrator: &'a Orchestrator) -> Self {
        Self {
            control_plane,
            orchestrator,
        }
    }

    /// Registers `domain` for one auto-renewing year; returns the operation id
    pub async fn register(&self, domain: &str, registrant: &Registrant) -> Result<String> {
        self.ensure_available(domain).await?;

        let registration = DomainRegistration {
            domain_name: domain.to_string(),
            duration_in_years: REGISTRATION_YEARS,
            auto_renew: true,
            contact: registrant.contact(),
        };
        let operation_id = self
            .orchestrator
            .run(format!("Registering domain name '{domain}'"), || {
                self.control_plane.register_domain(&registration)
            })
            .await?;

        info!(domain = %domain, operation_id = %operation_id, "registration submitted");
        Ok(operation_id)
    }

    async fn ensure_available(&self, domain: &str) -> Result<()> {
        let status = self
            .orchestrator
            .run(
                format!("Checking for availability of domain name '{domain}'"),
                || self.control_plane.check_domain_availability(domain),
            )
            .await?;

        if status != AVAILABLE {
            return Err(CloudError::DomainUnavailable {
                domain: domain.to_string(),
                status,
            });
        }
        Ok(())
    }

    /// Status of an asynchronous registration or record operation
    pub async fn operation_status(&self, operation_id: &str) -> Result<OperationDetail> {
        self.orchestrator
            .run(
                format!("Querying status of resource record operation with op id: '{operation_id}'"),
                || self.control_plane.get_operation_detail(operation_id),
            )
            .await
    }
}
