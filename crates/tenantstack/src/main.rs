mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::dns::AliasArgs;
use commands::domain::RegisterArgs;
use commands::stack::CfServiceCommand;
use config::{GlobalArgs, RunConfig};
use std::process::ExitCode;
use tenantstack_cloud::Orchestrator;
use tenantstack_cloud_aws::AwsControlPlane;
use tenantstack_config::ConfigError;
use tracing_subscriber::EnvFilter;

/// Configuration errors
const EXIT_CONFIG: u8 = 1;
/// Every other fatal error
const EXIT_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "tenantstack", version)]
#[command(
    about = "Create and update the multi-tenant WordPress CloudFormation stack and more",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a domain name with Route 53 Domains - be sure to differentiate gamma/prod
    RegisterDomainName(RegisterArgs),
    /// Print the status of a Route 53 Domains operation
    PrintRecordStatus {
        /// Operation ID obtained from registering a domain name
        #[arg(short = 'i', long)]
        operation_id: Option<String>,
    },
    /// Print the hosted zone given the domain name
    DescribeHostedZone {
        /// Registered domain name
        #[arg(short, long)]
        domain_name: Option<String>,
    },
    /// Request a wildcard SSL certificate for the domain and add its DNS validation record
    SetupSsl {
        /// Domain name the certificate covers
        #[arg(short, long)]
        domain_name: Option<String>,
        /// Id of the hosted zone for the domain name
        #[arg(short = 'z', long)]
        hosted_zone_id: Option<String>,
    },
    /// Describe the SSL certificate
    DescribeSsl {
        /// The ARN of the SSL certificate created by AWS Certificate Manager
        #[arg(short = 'a', long)]
        ssl_arn: Option<String>,
    },
    /// CloudFormation operations on the service stack
    CfService {
        #[command(subcommand)]
        command: CfServiceCommand,
    },
    /// Create aliases from each subdomain to the load balancer's domain name
    CreateElbAlias(AliasArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "Error:".red().bold(), err);
            ExitCode::from(exit_status(&err))
        }
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ConfigError>().is_some() {
        EXIT_CONFIG
    } else {
        EXIT_FAILURE
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = tenantstack_config::load()?;
    let run = RunConfig::resolve(cli.global, settings)?;

    let control_plane = AwsControlPlane::new(run.profile.clone(), run.region.as_str());
    let orchestrator = Orchestrator::new(run.span());

    match cli.command {
        Commands::RegisterDomainName(args) => {
            commands::domain::register(args, &control_plane, &orchestrator).await
        }
        Commands::PrintRecordStatus { operation_id } => {
            commands::domain::print_status(operation_id, &control_plane, &orchestrator).await
        }
        Commands::DescribeHostedZone { domain_name } => {
            commands::dns::describe_hosted_zone(domain_name, &control_plane, &orchestrator).await
        }
        Commands::SetupSsl {
            domain_name,
            hosted_zone_id,
        } => {
            commands::ssl::setup(&run, domain_name, hosted_zone_id, &control_plane, &orchestrator)
                .await
        }
        Commands::DescribeSsl { ssl_arn } => {
            commands::ssl::describe(ssl_arn, &control_plane, &orchestrator).await
        }
        Commands::CfService { command } => {
            commands::stack::handle(&run, command, &control_plane, &orchestrator).await
        }
        Commands::CreateElbAlias(args) => {
            commands::dns::create_alias(&run, args, &control_plane, &orchestrator).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subdomains_split_on_colon() {
        let cli = Cli::try_parse_from([
            "tenantstack",
            "cf-service",
            "write",
            "--subdomains",
            "blog:shop",
            "--availability-zones",
            "us-west-2a,us-west-2b",
        ])
        .unwrap();
        match cli.command {
            Commands::CfService {
                command: CfServiceCommand::Write(args),
            } => {
                assert_eq!(args.subdomains, vec!["blog", "shop"]);
                assert_eq!(args.availability_zones, vec!["us-west-2a", "us-west-2b"]);
            }
            _ => panic!("expected cf-service write"),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tenantstack",
            "describe-ssl",
            "--ssl-arn",
            "arn",
            "-s",
            "Prod",
            "-r",
            "us-east-1",
        ])
        .unwrap();
        assert_eq!(cli.global.stage.as_deref(), Some("Prod"));
        assert_eq!(cli.global.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_config_errors_exit_with_one() {
        let err = anyhow::Error::new(ConfigError::MissingOption("--stage".into()));
        assert_eq!(exit_status(&err), 1);
        assert_eq!(exit_status(&anyhow::anyhow!("remote failure")), 2);
    }
}
