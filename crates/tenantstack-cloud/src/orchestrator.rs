//! Fail-fast execution of named remote actions
//!
//! Remote actions are not resumable mid-run, so any failure is turned into a
//! fatal [`CloudError::OperationFailed`] carrying the action description, the
//! raw remote output and the cause. The only exception is the retry-poll in
//! [`crate::retry`], which is reserved for eventually consistent reads.

use crate::error::{CloudError, ControlPlaneResult, Result};
use std::fmt::Debug;
use std::future::Future;
use tracing::{Instrument, Span, debug, error};

/// A named, single-use remote call
pub struct ProvisioningOperation<F> {
    pub description: String,
    pub invoke: F,
}

impl<F> ProvisioningOperation<F> {
    pub fn new(description: impl Into<String>, invoke: F) -> Self {
        Self {
            description: description.into(),
            invoke,
        }
    }
}

/// Executes provisioning operations inside a run-scoped span
#[derive(Debug, Clone)]
pub struct Orchestrator {
    span: Span,
}

impl Orchestrator {
    /// `span` carries the run's context (stage, region, profile)
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Runs the operation once, returning its result or a fatal error
    pub async fn execute<T, F, Fut>(&self, operation: ProvisioningOperation<F>) -> Result<T>
    where
        T: Debug,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ControlPlaneResult<T>>,
    {
        let ProvisioningOperation {
            description,
            invoke,
        } = operation;

        let outcome = async {
            debug!(action = %description, "performing action");
            let outcome = invoke().await;
            match &outcome {
                Ok(result) => debug!(action = %description, output = ?result, "action succeeded"),
                Err(e) => error!(action = %description, error = %e, "action failed"),
            }
            outcome
        }
        .instrument(self.span.clone())
        .await;

        outcome.map_err(|source| CloudError::OperationFailed {
            output: source.raw_output().unwrap_or_default().to_string(),
            action: description,
            source,
        })
    }

    /// Shorthand for [`execute`](Self::execute) with an inline description
    pub async fn run<T, F, Fut>(&self, description: impl Into<String>, invoke: F) -> Result<T>
    where
        T: Debug,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ControlPlaneResult<T>>,
    {
        self.execute(ProvisioningOperation::new(description, invoke))
            .await
    }
}
