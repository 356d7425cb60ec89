//! AWS control plane for TenantStack
//!
//! Implements the [`ControlPlane`](tenantstack_cloud::ControlPlane) trait by
//! invoking the `aws` CLI: CloudFormation for stacks, EC2 for availability
//! zones, Route 53 for records, ACM for certificates and Route 53 Domains for
//! registration.
//!
//! # Requirements
//!
//! - `aws` CLI v2 must be installed
//! - Credentials come from the CLI's own configuration (profile or environment)
//!
//! # Example
//!
//! ```ignore
//! use tenantstack_cloud::{Orchestrator, StackManager};
//! use tenantstack_cloud_aws::AwsControlPlane;
//!
//! let control_plane = AwsControlPlane::new("default", "us-west-2");
//! let orchestrator = Orchestrator::new(tracing::info_span!("run"));
//! let zones = StackManager::new(&control_plane, &orchestrator)
//!     .availability_zones("us-west-2")
//!     .await?;
//! ```

pub mod cli;
pub mod error;
pub mod provider;
pub mod wire;

pub use cli::{AwsCli, DOMAINS_REGION};
pub use error::{AwsError, Result};
pub use provider::AwsControlPlane;
