//! TenantStack Template Synthesis
//!
//! Builds the resource graph for a shared hosting service in which any number
//! of tenants (one subdomain each) share a load balancer, a file system and a
//! container cluster, then renders it as a deterministic template document.
//!
//! # Pipeline
//!
//! ```text
//! subdomains ──► partition ──► GraphBuilder ──► ResourceGraph ──► serialize
//!                (ports,        (network, lb,     (validated        (4-space JSON,
//!                 priorities,    storage,          references)       suffix fix)
//!                 cpu/memory)    tenants)
//! ```

pub mod builder;
pub mod constants;
pub mod error;
pub mod graph;
pub mod intrinsics;
pub mod naming;
pub mod parameters;
pub mod partition;
pub mod serializer;
pub mod stage;

// Re-exports
pub use builder::{SynthesisInput, synthesize};
pub use error::{Result, TemplateError};
pub use graph::{Output, Parameter, ParameterValue, Resource, ResourceGraph};
pub use naming::{LogicalIds, validate_subdomains};
pub use parameters::ParameterValues;
pub use partition::{ComputeBudget, SplitRatio, TaskShare, Tenant};
pub use serializer::{serialize, write_to_file};
pub use stage::{Region, StackInfo, Stage};
