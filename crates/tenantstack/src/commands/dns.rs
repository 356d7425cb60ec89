use crate::config::{RunConfig, require_text};
use clap::Args;
use colored::Colorize;
use tenantstack_cloud::{AliasRecords, AliasRequest, ControlPlane, HostedZones, Orchestrator};

#[derive(Args, Debug, Clone)]
pub struct AliasArgs {
    /// Domain name the subdomains live under
    #[arg(short, long)]
    pub domain_name: Option<String>,

    /// Id of the hosted zone for the domain name
    #[arg(short = 'z', long)]
    pub hosted_zone_id: Option<String>,

    /// Domain name of the Elastic Load Balancer
    #[arg(short, long)]
    pub elb_domain_name: Option<String>,

    /// Hosted zone of the Elastic Load Balancer
    #[arg(short = 'n', long)]
    pub elb_hosted_zone: Option<String>,

    /// WordPress subdomains separated by ':', e.g. blog:shop
    #[arg(short = 'w', long, value_delimiter = ':')]
    pub subdomains: Vec<String>,
}

pub async fn describe_hosted_zone(
    domain_name: Option<String>,
    control_plane: &dyn ControlPlane,
    orchestrator: &Orchestrator,
) -> anyhow::Result<()> {
    let domain = require_text(domain_name, "--domain-name")?;

    let zone = HostedZones::new(control_plane, orchestrator)
        .find(&domain)
        .await?;
    println!(
        "Domain name '{}' hosted zone: '{}'",
        domain.cyan(),
        zone.id.green()
    );
    Ok(())
}

pub async fn create_alias(
    run: &RunConfig,
    args: AliasArgs,
    control_plane: &dyn ControlPlane,
    orchestrator: &Orchestrator,
) -> anyhow::Result<()> {
    let request = AliasRequest {
        domain: require_text(args.domain_name, "--domain-name")?,
        hosted_zone_id: require_text(args.hosted_zone_id, "--hosted-zone-id")?,
        elb_dns_name: require_text(args.elb_domain_name, "--elb-domain-name")?,
        elb_hosted_zone_id: require_text(args.elb_hosted_zone, "--elb-hosted-zone")?,
        subdomains: run.subdomains(args.subdomains)?,
    };

    let change = AliasRecords::new(control_plane, orchestrator)
        .create(&request)
        .await?;
    println!(
        "{} status '{}', id '{}'",
        "Alias records submitted:".green(),
        change.status.yellow(),
        change.id
    );
    Ok(())
}
