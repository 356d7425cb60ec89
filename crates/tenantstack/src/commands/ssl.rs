use crate::config::{RunConfig, require_text};
use colored::Colorize;
use tenantstack_cloud::{Certificates, ControlPlane, Orchestrator};

pub async fn setup(
    run: &RunConfig,
    domain_name: Option<String>,
    hosted_zone_id: Option<String>,
    control_plane: &dyn ControlPlane,
    orchestrator: &Orchestrator,
) -> anyhow::Result<()> {
    // Gamma and Prod each get their own certificate
    let stage = run.stage()?;
    let domain = require_text(domain_name, "--domain-name")?;
    let hosted_zone_id = require_text(hosted_zone_id, "--hosted-zone-id")?;

    println!(
        "{} *.{} ({})",
        "Requesting SSL certificate for".blue(),
        domain.cyan(),
        stage
    );
    let setup = Certificates::new(control_plane, orchestrator)
        .setup_ssl(&domain, &hosted_zone_id)
        .await?;

    println!("{} {}", "Certificate ARN:".green(), setup.arn.bold());
    println!(
        "DNS validation record change '{}' is {}",
        setup.validation_change.id,
        setup.validation_change.status.yellow()
    );
    Ok(())
}

pub async fn describe(
    ssl_arn: Option<String>,
    control_plane: &dyn ControlPlane,
    orchestrator: &Orchestrator,
) -> anyhow::Result<()> {
    let arn = require_text(ssl_arn, "--ssl-arn")?;

    let detail = Certificates::new(control_plane, orchestrator)
        .describe(&arn)
        .await?;
    println!("{}: {}", "Cert ARN".bold(), detail.arn);
    println!("{}: {}", "Status".bold(), detail.status.yellow());
    Ok(())
}
