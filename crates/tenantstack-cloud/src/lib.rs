//! TenantStack Provisioning
//!
//! Drives remote provisioning operations against a cloud control plane:
//! stack lifecycle, certificate issuance, DNS records and domain registration.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 tenantstack CLI                   │
//! └─────────────────┬────────────────────────────────┘
//!                   │
//! ┌─────────────────▼────────────────────────────────┐
//! │               tenantstack-cloud                   │
//! │  StackManager  Certificates  HostedZones  Domains │
//! │         └──────────┬──────────┘                   │
//! │              Orchestrator (fail-fast)             │
//! │              poll_until_available (bounded)       │
//! │  trait ControlPlane { ... }                       │
//! └─────────────────┬────────────────────────────────┘
//!                   │
//! ┌─────────────────▼────────────────────────────────┐
//! │  tenantstack-cloud-aws (aws CLI)                  │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod certificate;
pub mod control_plane;
pub mod dns;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod retry;
pub mod stack;
pub mod types;

#[cfg(test)]
mod testing;

// Re-exports
pub use certificate::{CertificateSetup, Certificates};
pub use control_plane::ControlPlane;
pub use dns::{AliasRecords, AliasRequest, HostedZones};
pub use domain::{Domains, Registrant};
pub use error::{CloudError, ControlPlaneError, ControlPlaneResult, Result};
pub use orchestrator::{Orchestrator, ProvisioningOperation};
pub use retry::{Availability, RetryPolicy, poll_until_available};
pub use stack::{CAPABILITY_IAM, StackManager};
pub use types::*;
