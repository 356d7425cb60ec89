//! AWS control plane error types

use tenantstack_cloud::ControlPlaneError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("aws CLI not found. Please install AWS CLI v2: https://aws.amazon.com/cli/")]
    CliNotFound,

    #[error("aws command failed: {stderr}")]
    CommandFailed { stderr: String, stdout: String },

    #[error("Unexpected aws response: {0}")]
    UnexpectedResponse(String),

    #[error("JSON parse error: {source}")]
    Json {
        source: serde_json::Error,
        output: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AwsError {
    /// Whatever the CLI printed before the failure, if anything
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            AwsError::CommandFailed { stdout, .. } if !stdout.is_empty() => Some(stdout.as_str()),
            AwsError::Json { output, .. } => Some(output.as_str()),
            _ => None,
        }
    }
}

impl From<AwsError> for ControlPlaneError {
    fn from(err: AwsError) -> Self {
        let output = err.raw_output().map(str::to_string);
        let cp = ControlPlaneError::new(err.to_string());
        match output {
            Some(output) => cp.with_output(output),
            None => cp,
        }
    }
}

pub type Result<T> = std::result::Result<T, AwsError>;
