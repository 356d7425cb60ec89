use crate::config::{RunConfig, require_text};
use clap::{Args, Subcommand};
use colored::Colorize;
use tenantstack_cloud::{ControlPlane, Orchestrator, StackManager};
use tenantstack_template::{
    ParameterValues, ResourceGraph, StackInfo, SynthesisInput, serialize, synthesize, write_to_file,
};

#[derive(Subcommand, Debug)]
pub enum CfServiceCommand {
    /// Write the CloudFormation template to a local file - useful for debugging
    Write(TemplateArgs),
    /// Create the CloudFormation stack
    Create(StackArgs),
    /// Update the CloudFormation stack
    Update(StackArgs),
    /// Describe the CloudFormation stack after creation
    Describe,
    /// Delete the CloudFormation stack
    Delete,
}

#[derive(Args, Debug, Clone)]
pub struct TemplateArgs {
    /// WordPress subdomains separated by ':', e.g. blog:shop
    #[arg(short = 'w', long, value_delimiter = ':')]
    pub subdomains: Vec<String>,

    /// Availability zones separated by ',' (skips looking them up)
    #[arg(long, value_delimiter = ',')]
    pub availability_zones: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StackArgs {
    /// Password to use for the mysql database
    #[arg(short = 'b', long)]
    pub db_password: Option<String>,

    /// Domain name the tenants are served under
    #[arg(short, long)]
    pub domain_name: Option<String>,

    /// The ARN of the SSL certificate created by AWS Certificate Manager
    #[arg(short = 'a', long)]
    pub ssl_arn: Option<String>,

    /// EC2 key pair for the container instances
    #[arg(short, long)]
    pub key_name: Option<String>,

    #[command(flatten)]
    pub template: TemplateArgs,
}

struct StackPlan {
    info: StackInfo,
    template_body: String,
    parameters: ParameterValues,
}

pub async fn handle(
    run: &RunConfig,
    command: CfServiceCommand,
    control_plane: &dyn ControlPlane,
    orchestrator: &Orchestrator,
) -> anyhow::Result<()> {
    let stacks = StackManager::new(control_plane, orchestrator);

    match command {
        CfServiceCommand::Write(args) => {
            let stage = run.stage()?;
            let subdomains = run.subdomains(args.subdomains.clone())?;
            let info = StackInfo::service(stage);

            let graph = build_graph(run, &info, subdomains, &args, &stacks).await?;
            let path = info.template_file_name();
            write_to_file(&graph, &path)?;
            println!("{} {}", "Template written to".green(), path.cyan());
        }
        CfServiceCommand::Create(args) => {
            let plan = prepare(run, &args, &stacks).await?;
            let operation = stacks
                .create(&plan.info, plan.template_body, &plan.parameters.to_list())
                .await?;
            println!(
                "{} {}",
                "Stack creation started:".green(),
                operation.stack_id.unwrap_or_else(|| plan.info.stack_name()).cyan()
            );
        }
        CfServiceCommand::Update(args) => {
            let plan = prepare(run, &args, &stacks).await?;
            let operation = stacks
                .update(&plan.info, plan.template_body, &plan.parameters.to_list())
                .await?;
            println!(
                "{} {}",
                "Stack update started:".green(),
                operation.stack_id.unwrap_or_else(|| plan.info.stack_name()).cyan()
            );
        }
        CfServiceCommand::Describe => {
            let info = StackInfo::service(run.stage()?);
            let description = stacks.describe(&info).await?;

            println!("{}: {}", "Stack".bold(), description.stack_name.cyan());
            println!("{}: {}", "Status".bold(), description.status.yellow());
            if let Some(reason) = &description.status_reason {
                println!("{}: {}", "Reason".bold(), reason);
            }
            for output in &description.outputs {
                println!("  {} = {}", output.key.cyan(), output.value);
            }
        }
        CfServiceCommand::Delete => {
            let info = StackInfo::service(run.stage()?);
            stacks.delete(&info).await?;
            println!("{} {}", "Stack deletion started:".green(), info.stack_name().cyan());
        }
    }

    Ok(())
}

/// Validates every option, then synthesizes the template
async fn prepare(
    run: &RunConfig,
    args: &StackArgs,
    stacks: &StackManager<'_>,
) -> anyhow::Result<StackPlan> {
    let stage = run.stage()?;
    let db_password = require_text(args.db_password.clone(), "--db-password")?;
    let domain_name = require_text(args.domain_name.clone(), "--domain-name")?;
    let certificate_arn = require_text(args.ssl_arn.clone(), "--ssl-arn")?;
    let subdomains = run.subdomains(args.template.subdomains.clone())?;
    let key_name = require_text(args.key_name.clone(), "--key-name")?;

    let info = StackInfo::service(stage);
    let graph = build_graph(run, &info, subdomains, &args.template, stacks).await?;

    Ok(StackPlan {
        info,
        template_body: serialize(&graph)?,
        parameters: ParameterValues {
            db_password,
            domain_name,
            certificate_arn,
            key_name,
        },
    })
}

async fn build_graph(
    run: &RunConfig,
    info: &StackInfo,
    subdomains: Vec<String>,
    args: &TemplateArgs,
    stacks: &StackManager<'_>,
) -> anyhow::Result<ResourceGraph> {
    let availability_zones = if args.availability_zones.is_empty() {
        stacks.availability_zones(run.region.as_str()).await?
    } else {
        args.availability_zones.clone()
    };

    let input = SynthesisInput::new(
        info.stage(),
        run.region.clone(),
        availability_zones,
        subdomains,
    )
    .with_budget(run.budget());
    Ok(synthesize(&input)?)
}
