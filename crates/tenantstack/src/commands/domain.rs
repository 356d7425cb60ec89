use crate::config::require_text;
use clap::Args;
use colored::Colorize;
use tenantstack_cloud::{ControlPlane, Domains, Orchestrator, Registrant};

#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Domain name to request ownership of, e.g. your-domain-name-gamma.com
    #[arg(short, long)]
    pub domain_name: Option<String>,

    /// First name of domain name admin
    #[arg(short, long)]
    pub first_name: Option<String>,

    /// Last name of domain name admin
    #[arg(short, long)]
    pub last_name: Option<String>,

    /// Phone number of the organization
    #[arg(short = 'n', long)]
    pub phone_number: Option<String>,

    /// Email of domain name admin
    #[arg(short, long)]
    pub email: Option<String>,

    /// Contact type of domain name admin. Default: ASSOCIATION
    #[arg(short, long)]
    pub contact_type: Option<String>,

    /// Organization name
    #[arg(short, long)]
    pub organization_name: Option<String>,

    /// Street address of the organization
    #[arg(short = 't', long)]
    pub street_address: Option<String>,

    /// City of the organization's address
    #[arg(short = 'y', long)]
    pub city: Option<String>,

    /// State of the organization's address
    #[arg(short = 'x', long)]
    pub state: Option<String>,

    /// Zip code of the organization's address
    #[arg(short, long)]
    pub zip_code: Option<String>,
}

impl RegisterArgs {
    fn resolve(self) -> anyhow::Result<(String, Registrant)> {
        let domain = require_text(self.domain_name, "--domain-name")?;
        let registrant = Registrant {
            first_name: require_text(self.first_name, "--first-name")?,
            last_name: require_text(self.last_name, "--last-name")?,
            phone_number: require_text(self.phone_number, "--phone-number")?,
            email: require_text(self.email, "--email")?,
            organization: require_text(self.organization_name, "--organization-name")?,
            street_address: require_text(self.street_address, "--street-address")?,
            city: require_text(self.city, "--city")?,
            state: require_text(self.state, "--state")?,
            zip_code: require_text(self.zip_code, "--zip-code")?,
            contact_type: self.contact_type.filter(|c| !c.trim().is_empty()),
        };
        Ok((domain, registrant))
    }
}

pub async fn register(
    args: RegisterArgs,
    control_plane: &dyn ControlPlane,
    orchestrator: &Orchestrator,
) -> anyhow::Result<()> {
    let (domain, registrant) = args.resolve()?;

    println!("{} {}", "Registering".blue(), domain.cyan());
    let operation_id = Domains::new(control_plane, orchestrator)
        .register(&domain, &registrant)
        .await?;
    println!("{} {}", "Registration operation id:".green(), operation_id.bold());
    Ok(())
}

pub async fn print_status(
    operation_id: Option<String>,
    control_plane: &dyn ControlPlane,
    orchestrator: &Orchestrator,
) -> anyhow::Result<()> {
    let operation_id = require_text(operation_id, "--operation-id")?;

    let detail = Domains::new(control_plane, orchestrator)
        .operation_status(&operation_id)
        .await?;
    println!("Current status: '{}'", detail.status.yellow());
    if let Some(message) = &detail.message {
        println!("{}", message.dimmed());
    }
    Ok(())
}
