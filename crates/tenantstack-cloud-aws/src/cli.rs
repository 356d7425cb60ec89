//! aws CLI wrapper
//!
//! Every control plane call is one `aws <service> <operation>` invocation with
//! JSON output.

use crate::error::{AwsError, Result};
use crate::wire::{StackParameter, WireChangeBatch, WireContact};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::process::Stdio;
use tenantstack_cloud::{CertificateRequest, ChangeBatch, DomainRegistration, StackRequest};
use tokio::process::Command;

pub const DEFAULT_PROGRAM: &str = "aws";
pub const DEFAULT_PROFILE: &str = "default";
/// Route 53 Domains only answers in us-east-1
pub const DOMAINS_REGION: &str = "us-east-1";

pub struct AwsCli {
    program: String,
    profile: String,
    region: String,
}

impl AwsCli {
    pub fn new(profile: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            profile: profile.into(),
            region: region.into(),
        }
    }

    /// Use a different executable, e.g. a pinned install path
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Global options appended to every invocation
    pub fn global_args(&self, region: &str) -> Vec<String> {
        let mut args = vec![
            "--output".to_string(),
            "json".to_string(),
            "--region".to_string(),
            region.to_string(),
        ];
        // Without --profile the CLI also honours environment credentials
        if self.profile != DEFAULT_PROFILE {
            args.push("--profile".to_string());
            args.push(self.profile.clone());
        }
        args
    }

    /// Run an aws command and return stdout
    pub async fn run(&self, service: &str, operation: &str, args: &[String]) -> Result<String> {
        self.run_in(&self.region, service, operation, args).await
    }

    pub async fn run_in(
        &self,
        region: &str,
        service: &str,
        operation: &str,
        args: &[String],
    ) -> Result<String> {
        let global = self.global_args(region);
        let mut cmd = Command::new(&self.program);
        cmd.arg(service).arg(operation).args(args).args(&global);
        cmd.env("AWS_PAGER", "");
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(
            "Running: {} {} {} {}",
            self.program,
            service,
            operation,
            redact(service, args).join(" ")
        );

        let output = cmd.output().await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AwsError::CliNotFound,
            _ => AwsError::Io(e),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AwsError::CommandFailed {
                stderr: stderr.trim().to_string(),
                stdout,
            });
        }

        Ok(stdout)
    }

    /// Run and parse the JSON answer
    pub async fn call<T: DeserializeOwned>(
        &self,
        service: &str,
        operation: &str,
        args: &[String],
    ) -> Result<T> {
        let output = self.run(service, operation, args).await?;
        parse(output)
    }

    pub async fn call_in<T: DeserializeOwned>(
        &self,
        region: &str,
        service: &str,
        operation: &str,
        args: &[String],
    ) -> Result<T> {
        let output = self.run_in(region, service, operation, args).await?;
        parse(output)
    }
}

fn parse<T: DeserializeOwned>(output: String) -> Result<T> {
    serde_json::from_str(&output).map_err(|source| AwsError::Json { source, output })
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|source| AwsError::Json {
        source,
        output: String::new(),
    })
}

/// Template bodies are long and parameters carry the database password
fn redact(service: &str, args: &[String]) -> Vec<String> {
    let mut hide_next = false;
    args.iter()
        .map(|arg| {
            if hide_next {
                hide_next = false;
                return "<redacted>".to_string();
            }
            hide_next = service == "cloudformation"
                && (arg == "--template-body" || arg == "--parameters");
            arg.clone()
        })
        .collect()
}

// Argument builders

pub fn stack_args(request: &StackRequest) -> Result<Vec<String>> {
    let parameters: Vec<StackParameter<'_>> =
        request.parameters.iter().map(StackParameter::from).collect();
    let mut args = vec![
        "--stack-name".to_string(),
        request.stack_name.clone(),
        "--template-body".to_string(),
        request.template_body.clone(),
        "--parameters".to_string(),
        to_json(&parameters)?,
    ];
    if !request.capabilities.is_empty() {
        args.push("--capabilities".to_string());
        args.extend(request.capabilities.iter().cloned());
    }
    Ok(args)
}

pub fn stack_name_args(stack_name: &str) -> Vec<String> {
    vec!["--stack-name".to_string(), stack_name.to_string()]
}

pub fn availability_zone_args(region: &str) -> Vec<String> {
    vec![
        "--filters".to_string(),
        format!("Name=region-name,Values={region}"),
    ]
}

pub fn hosted_zone_args(dns_name: &str, max_items: u32) -> Vec<String> {
    vec![
        "--dns-name".to_string(),
        dns_name.to_string(),
        "--max-items".to_string(),
        max_items.to_string(),
    ]
}

pub fn change_batch_args(hosted_zone_id: &str, batch: &ChangeBatch) -> Result<Vec<String>> {
    Ok(vec![
        "--hosted-zone-id".to_string(),
        hosted_zone_id.to_string(),
        "--change-batch".to_string(),
        to_json(&WireChangeBatch::from(batch))?,
    ])
}

pub fn certificate_args(request: &CertificateRequest) -> Vec<String> {
    let mut args = vec![
        "--domain-name".to_string(),
        request.domain_name.clone(),
        "--validation-method".to_string(),
        request.validation_method.clone(),
    ];
    if !request.subject_alternative_names.is_empty() {
        args.push("--subject-alternative-names".to_string());
        args.extend(request.subject_alternative_names.iter().cloned());
    }
    args
}

pub fn certificate_arn_args(arn: &str) -> Vec<String> {
    vec!["--certificate-arn".to_string(), arn.to_string()]
}

pub fn domain_name_args(domain_name: &str) -> Vec<String> {
    vec!["--domain-name".to_string(), domain_name.to_string()]
}

/// The one contact is submitted as admin, registrant and tech contact
pub fn registration_args(registration: &DomainRegistration) -> Result<Vec<String>> {
    let contact = to_json(&WireContact::from(&registration.contact))?;
    let mut args = vec![
        "--domain-name".to_string(),
        registration.domain_name.clone(),
        "--duration-in-years".to_string(),
        registration.duration_in_years.to_string(),
    ];
    args.push(if registration.auto_renew {
        "--auto-renew".to_string()
    } else {
        "--no-auto-renew".to_string()
    });
    for role in ["--admin-contact", "--registrant-contact", "--tech-contact"] {
        args.push(role.to_string());
        args.push(contact.clone());
    }
    Ok(args)
}

pub fn operation_id_args(operation_id: &str) -> Vec<String> {
    vec!["--operation-id".to_string(), operation_id.to_string()]
}
