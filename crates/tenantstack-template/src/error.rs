//! Template synthesis error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("At least one tenant subdomain is required")]
    NoTenants,

    #[error("Tenant subdomain '{0}' is declared more than once")]
    DuplicateTenant(String),

    #[error("Tenant subdomain '{name}' is not a valid DNS label: {reason}")]
    InvalidTenantName { name: String, reason: String },

    #[error("Tenant subdomains '{first}' and '{second}' map to the same logical id fragment '{fragment}'")]
    TenantIdCollision {
        first: String,
        second: String,
        fragment: String,
    },

    #[error("Logical id '{0}' is already declared in the graph")]
    DuplicateLogicalId(String),

    #[error("Resource '{resource}' depends on undeclared resource '{target}'")]
    DanglingDependency { resource: String, target: String },

    #[error("'{owner}' references undeclared name '{target}'")]
    DanglingReference { owner: String, target: String },

    #[error("No availability zones were supplied for region '{0}'")]
    NoAvailabilityZones(String),

    #[error("Port space exhausted: base port {base_port} cannot host {tenants} tenants")]
    PortSpaceExhausted { base_port: u16, tenants: usize },

    #[error("Routing priority {0} is outside the allowed range 1..=50000")]
    PriorityOutOfRange(u32),

    #[error("Compute budget of {cpu_units} cpu units / {memory_mb} MB is too small for {tenants} tenants")]
    BudgetTooSmall {
        cpu_units: u32,
        memory_mb: u32,
        tenants: usize,
    },

    #[error("Stage '{0}' is not valid. Choose from: Gamma, Prod")]
    InvalidStage(String),

    #[error("Region '{0}' is not a valid region name (expected something like 'us-west-2')")]
    InvalidRegion(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
