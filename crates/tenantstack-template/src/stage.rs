//! Deployment stage, region and stack naming

use crate::error::{Result, TemplateError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment stage in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Gamma,
    Prod,
}

impl Stage {
    pub const ALL: [Stage; 2] = [Stage::Gamma, Stage::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Gamma => "Gamma",
            Stage::Prod => "Prod",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TemplateError::InvalidStage(s.to_string()))
    }
}

/// Cloud region the stack is deployed to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region(String);

impl Region {
    pub const DEFAULT: &'static str = "us-west-2";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Region {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Region {
    type Err = TemplateError;

    /// Accepts names shaped like `us-west-2` or `ap-northeast-1`
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        let valid = parts.len() >= 3
            && parts[0].len() == 2
            && parts[..parts.len() - 1]
                .iter()
                .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_lowercase()))
            && parts[parts.len() - 1]
                .chars()
                .all(|c| c.is_ascii_digit())
            && !parts[parts.len() - 1].is_empty();

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(TemplateError::InvalidRegion(s.to_string()))
        }
    }
}

const SERVICE_STACK_NAME: &str = "tenantstack-service";
const SERVICE_TEMPLATE_FILE_PREFIX: &str = "./tenantstack-service";

/// Resolves the stack name and template output file for a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackInfo {
    base_stack_name: String,
    stage: Stage,
    template_file_prefix: String,
}

impl StackInfo {
    pub fn new(
        base_stack_name: impl Into<String>,
        stage: Stage,
        template_file_prefix: impl Into<String>,
    ) -> Self {
        Self {
            base_stack_name: base_stack_name.into(),
            stage,
            template_file_prefix: template_file_prefix.into(),
        }
    }

    /// The shared-hosting service stack
    pub fn service(stage: Stage) -> Self {
        Self::new(SERVICE_STACK_NAME, stage, SERVICE_TEMPLATE_FILE_PREFIX)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// `<base>-<Stage>`
    pub fn stack_name(&self) -> String {
        format!("{}-{}", self.base_stack_name, self.stage)
    }

    /// `<prefix>-cf-<Stage>.json`
    pub fn template_file_name(&self) -> String {
        format!("{}-cf-{}.json", self.template_file_prefix, self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_parse() {
        assert_eq!("Gamma".parse::<Stage>().unwrap(), Stage::Gamma);
        assert_eq!("prod".parse::<Stage>().unwrap(), Stage::Prod);
        assert!(matches!(
            "beta".parse::<Stage>(),
            Err(TemplateError::InvalidStage(s)) if s == "beta"
        ));
    }

    #[test]
    fn test_region_parse() {
        assert_eq!("us-east-1".parse::<Region>().unwrap().as_str(), "us-east-1");
        assert!("ap-northeast-1".parse::<Region>().is_ok());
        assert!("us-gov-west-1".parse::<Region>().is_ok());
        assert!("uswest2".parse::<Region>().is_err());
        assert!("us-west-".parse::<Region>().is_err());
        assert!("US-WEST-2".parse::<Region>().is_err());
        assert_eq!(Region::default().as_str(), "us-west-2");
    }

    #[test]
    fn test_stack_info_names() {
        let info = StackInfo::service(Stage::Gamma);
        assert_eq!(info.stack_name(), "tenantstack-service-Gamma");
        assert_eq!(
            info.template_file_name(),
            "./tenantstack-service-cf-Gamma.json"
        );
    }
}
