//! Run configuration
//!
//! Global options and the optional settings file are resolved once into a
//! [`RunConfig`]. Command options go through [`require`]. Both happen before
//! any remote call is made.

use clap::Args;
use tenantstack_config::{ConfigError, Settings};
use tenantstack_template::{ComputeBudget, Region, Stage, validate_subdomains};
use tracing::Span;

pub const DEFAULT_PROFILE: &str = "default";

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// AWS profile to use. Default: 'default'
    #[arg(short, long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Stage to use: Gamma or Prod
    #[arg(short, long, global = true, env = "TENANTSTACK_STAGE")]
    pub stage: Option<String>,

    /// Region to use. Default: us-west-2
    #[arg(short, long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,
}

/// Typed global configuration for one invocation
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub profile: String,
    pub region: Region,
    stage: Option<Stage>,
    settings: Settings,
}

impl RunConfig {
    /// Command line and environment first, then the settings file, then defaults
    pub fn resolve(global: GlobalArgs, settings: Settings) -> Result<Self, ConfigError> {
        let profile = global
            .profile
            .or_else(|| settings.profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

        let region = match global.region.or_else(|| settings.region.clone()) {
            Some(region) => region.parse().map_err(|e| invalid("--region", e))?,
            None => Region::default(),
        };

        let stage = global
            .stage
            .or_else(|| settings.stage.clone())
            .map(|stage| stage.parse::<Stage>())
            .transpose()
            .map_err(|e| invalid("--stage", e))?;

        Ok(Self {
            profile,
            region,
            stage,
            settings,
        })
    }

    pub fn stage(&self) -> Result<Stage, ConfigError> {
        require(self.stage, "--stage")
    }

    /// `--subdomains` or the settings file's list; validated as DNS labels
    pub fn subdomains(&self, from_cli: Vec<String>) -> Result<Vec<String>, ConfigError> {
        let subdomains = if from_cli.is_empty() {
            self.settings.subdomains.clone()
        } else {
            from_cli
        };
        if subdomains.is_empty() {
            return Err(ConfigError::MissingOption("--subdomains".to_string()));
        }
        validate_subdomains(&subdomains).map_err(|e| invalid("--subdomains", e))?;
        Ok(subdomains)
    }

    pub fn budget(&self) -> ComputeBudget {
        let defaults = ComputeBudget::default();
        let compute = &self.settings.compute;
        ComputeBudget {
            total_cpu_units: compute.total_cpu_units.unwrap_or(defaults.total_cpu_units),
            total_memory_mb: compute.total_memory_mb.unwrap_or(defaults.total_memory_mb),
            base_port: compute.base_port.unwrap_or(defaults.base_port),
        }
    }

    /// The span every remote action of this run is recorded under
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "tenantstack",
            stage = self.stage.map(|s| s.as_str()).unwrap_or("-"),
            region = %self.region,
            profile = %self.profile,
        )
    }
}

pub fn require<T>(value: Option<T>, option: &str) -> Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingOption(option.to_string()))
}

/// Like [`require`], but an empty string counts as absent
pub fn require_text(value: Option<String>, option: &str) -> Result<String, ConfigError> {
    require(value.filter(|v| !v.trim().is_empty()), option)
}

fn invalid(option: &str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        option: option.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenantstack_config::ComputeSettings;

    fn args(profile: Option<&str>, stage: Option<&str>, region: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            profile: profile.map(str::to_string),
            stage: stage.map(str::to_string),
            region: region.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults() {
        let run = RunConfig::resolve(GlobalArgs::default(), Settings::default()).unwrap();
        assert_eq!(run.profile, "default");
        assert_eq!(run.region.as_str(), "us-west-2");
        assert!(matches!(run.stage(), Err(ConfigError::MissingOption(o)) if o == "--stage"));
    }

    #[test]
    fn test_command_line_beats_settings_file() {
        let settings = Settings {
            profile: Some("file-profile".into()),
            region: Some("eu-west-1".into()),
            stage: Some("Prod".into()),
            ..Settings::default()
        };
        let run = RunConfig::resolve(args(Some("cli"), Some("gamma"), None), settings).unwrap();
        assert_eq!(run.profile, "cli");
        assert_eq!(run.region.as_str(), "eu-west-1");
        assert_eq!(run.stage().unwrap(), Stage::Gamma);
    }

    #[test]
    fn test_invalid_stage_is_a_config_error() {
        let err =
            RunConfig::resolve(args(None, Some("beta"), None), Settings::default()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid value for --stage"));
    }

    #[test]
    fn test_subdomains_fall_back_to_settings() {
        let settings = Settings {
            subdomains: vec!["blog".into(), "shop".into()],
            ..Settings::default()
        };
        let run = RunConfig::resolve(GlobalArgs::default(), settings).unwrap();
        assert_eq!(run.subdomains(Vec::new()).unwrap(), vec!["blog", "shop"]);
        assert_eq!(run.subdomains(vec!["news".into()]).unwrap(), vec!["news"]);
    }

    #[test]
    fn test_missing_subdomains() {
        let run = RunConfig::resolve(GlobalArgs::default(), Settings::default()).unwrap();
        let err = run.subdomains(Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Please provide a value for --subdomains");
    }

    #[test]
    fn test_invalid_subdomain_label() {
        let run = RunConfig::resolve(GlobalArgs::default(), Settings::default()).unwrap();
        assert!(matches!(
            run.subdomains(vec!["Not A Label".into()]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_budget_overrides() {
        let settings = Settings {
            compute: ComputeSettings {
                base_port: Some(9100),
                ..ComputeSettings::default()
            },
            ..Settings::default()
        };
        let run = RunConfig::resolve(GlobalArgs::default(), settings).unwrap();
        let budget = run.budget();
        assert_eq!(budget.base_port, 9100);
        assert_eq!(budget.total_cpu_units, ComputeBudget::default().total_cpu_units);
    }

    #[test]
    fn test_require_text_treats_blank_as_missing() {
        assert!(require_text(Some("  ".into()), "--domain-name").is_err());
        assert_eq!(require_text(Some("x".into()), "--domain-name").unwrap(), "x");
    }
}
