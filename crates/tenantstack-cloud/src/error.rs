//! Provisioning error types

use tenantstack_template::TemplateError;
use thiserror::Error;

/// Failure reported by a [`ControlPlane`](crate::ControlPlane) call
///
/// Carries whatever the remote side answered before failing, which may be a
/// partial or malformed response.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ControlPlaneError {
    message: String,
    raw_output: Option<String>,
}

impl ControlPlaneError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raw_output: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.raw_output = Some(output.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn raw_output(&self) -> Option<&str> {
        self.raw_output.as_deref()
    }
}

pub type ControlPlaneResult<T> = std::result::Result<T, ControlPlaneError>;

/// Fatal provisioning errors; none of them is retried
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Error occurred performing action '{action}'\n  Output: '{output}'\n  Error: '{source}'")]
    OperationFailed {
        action: String,
        output: String,
        source: ControlPlaneError,
    },

    #[error("Could not find any hosted zones associated with domain name '{0}'")]
    NoHostedZone(String),

    #[error("Found more than one hosted zone associated with domain name '{0}'")]
    MultipleHostedZones(String),

    #[error("Domain name '{domain}' is not available. Status is: '{status}'")]
    DomainUnavailable { domain: String, status: String },

    #[error("'{resource}' never became available after {attempts} attempts: {action}")]
    RetryExhausted {
        action: String,
        resource: String,
        attempts: u32,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

pub type Result<T> = std::result::Result<T, CloudError>;
