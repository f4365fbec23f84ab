//! Settings file management

use serde::{Deserialize, Serialize};

use crate::errors::DeployError;
use crate::logs::LogLevel;
use crate::retry::{CeilingAnchor, QueryErrorPolicy};

/// Deployer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit logs as JSON
    #[serde(default)]
    pub log_json: bool,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// AWS client configuration
    #[serde(default)]
    pub aws: AwsSettings,

    /// Change set creation polling
    #[serde(default)]
    pub change_set: ChangeSetSettings,

    /// Stack convergence polling
    #[serde(default)]
    pub convergence: ConvergenceSettings,
}

impl Settings {
    /// Reject values the polling loops cannot work with
    pub fn validate(&self) -> Result<(), DeployError> {
        if self.change_set.max_attempts == 0 {
            return Err(DeployError::ConfigError(
                "change_set.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.convergence.multiplier < 1.0 {
            return Err(DeployError::ConfigError(
                "convergence.multiplier must be at least 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.convergence.randomization_factor) {
            return Err(DeployError::ConfigError(
                "convergence.randomization_factor must be between 0 and 1".to_string(),
            ));
        }
        if self.convergence.initial_interval_secs == 0
            || self.convergence.max_interval_secs < self.convergence.initial_interval_secs
        {
            return Err(DeployError::ConfigError(
                "convergence intervals must satisfy 0 < initial <= max".to_string(),
            ));
        }
        if let QueryErrorPolicy::FailAfterConsecutive(0) = self.convergence.query_errors {
            return Err(DeployError::ConfigError(
                "convergence.query_errors must allow at least one failure".to_string(),
            ));
        }
        Ok(())
    }
}

/// AWS settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsSettings {
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub profile: Option<String>,
}

/// Change set creation polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeSetSettings {
    #[serde(default = "default_change_set_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_change_set_attempts")]
    pub max_attempts: u32,
}

fn default_change_set_interval() -> u64 {
    5
}

fn default_change_set_attempts() -> u32 {
    12
}

impl Default for ChangeSetSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_change_set_interval(),
            max_attempts: default_change_set_attempts(),
        }
    }
}

/// Stack convergence polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceSettings {
    #[serde(default = "default_initial_interval")]
    pub initial_interval_secs: u64,

    #[serde(default = "default_max_interval")]
    pub max_interval_secs: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    #[serde(default = "default_randomization_factor")]
    pub randomization_factor: f64,

    #[serde(default = "default_ceiling")]
    pub ceiling_secs: u64,

    #[serde(default)]
    pub ceiling_anchor: CeilingAnchor,

    #[serde(default)]
    pub query_errors: QueryErrorPolicy,
}

fn default_initial_interval() -> u64 {
    12
}

fn default_max_interval() -> u64 {
    60
}

fn default_multiplier() -> f64 {
    1.5
}

fn default_randomization_factor() -> f64 {
    0.5
}

fn default_ceiling() -> u64 {
    600
}

impl Default for ConvergenceSettings {
    fn default() -> Self {
        Self {
            initial_interval_secs: default_initial_interval(),
            max_interval_secs: default_max_interval(),
            multiplier: default_multiplier(),
            randomization_factor: default_randomization_factor(),
            ceiling_secs: default_ceiling(),
            ceiling_anchor: CeilingAnchor::default(),
            query_errors: QueryErrorPolicy::default(),
        }
    }
}
