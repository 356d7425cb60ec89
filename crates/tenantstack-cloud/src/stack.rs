//! Stack lifecycle against the control plane
//!
//! Each call is a single fail-fast operation. Nothing here waits for the stack
//! to reach a terminal state; that is left to the operator.

use crate::control_plane::ControlPlane;
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::types::{StackDescription, StackOperation, StackRequest};
use tenantstack_template::{ParameterValue, StackInfo};
use tracing::info;

/// Lets the stack create IAM roles
pub const CAPABILITY_IAM: &str = "CAPABILITY_IAM";

pub struct StackManager<'a> {
    control_plane: &'a dyn ControlPlane,
    orchestrator: &'a Orchestrator,
}

impl<'a> StackManager<'a> {
    pub fn new(control_plane: &'a dyn ControlPlane, orchestrator: &'a Orchestrator) -> Self {
        Self {
            control_plane,
            orchestrator,
        }
    }

    fn request(
        info: &StackInfo,
        template_body: String,
        parameters: &[ParameterValue],
    ) -> StackRequest {
        StackRequest {
            stack_name: info.stack_name(),
            template_body,
            parameters: parameters.to_vec(),
            capabilities: vec![CAPABILITY_IAM.to_string()],
        }
    }

    pub async fn create(
        &self,
        info: &StackInfo,
        template_body: String,
        parameters: &[ParameterValue],
    ) -> Result<StackOperation> {
        let request = Self::request(info, template_body, parameters);
        let operation = self
            .orchestrator
            .run("Create CloudFormation stack", || {
                self.control_plane.create_stack(&request)
            })
            .await?;
        info!(stack = %request.stack_name, "stack creation in progress");
        Ok(operation)
    }

    pub async fn update(
        &self,
        info: &StackInfo,
        template_body: String,
        parameters: &[ParameterValue],
    ) -> Result<StackOperation> {
        let request = Self::request(info, template_body, parameters);
        let operation = self
            .orchestrator
            .run("Update CloudFormation stack", || {
                self.control_plane.update_stack(&request)
            })
            .await?;
        info!(stack = %request.stack_name, "stack update in progress");
        Ok(operation)
    }

    pub async fn describe(&self, info: &StackInfo) -> Result<StackDescription> {
        let stack_name = info.stack_name();
        self.orchestrator
            .run("Describe CloudFormation stack", || {
                self.control_plane.describe_stack(&stack_name)
            })
            .await
    }

    pub async fn delete(&self, info: &StackInfo) -> Result<()> {
        let stack_name = info.stack_name();
        self.orchestrator
            .run("Delete CloudFormation stack", || {
                self.control_plane.delete_stack(&stack_name)
            })
            .await?;
        info!(stack = %stack_name, "stack deletion requested");
        Ok(())
    }

    /// Zones used to spread the subnets, enumerated for `region`
    pub async fn availability_zones(&self, region: &str) -> Result<Vec<String>> {
        self.orchestrator
            .run(
                format!("Describe availability zones in region '{region}'"),
                || self.control_plane.availability_zones(region),
            )
            .await
    }
}
