//! Application configuration options

use std::time::Duration;

use crate::retry::{ExponentialBackoffPolicy, FixedIntervalPolicy};
use crate::storage::settings::Settings;

/// Options for a deployment run
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// AWS client configuration
    pub aws: AwsOptions,

    /// Change set creation polling
    pub change_set: FixedIntervalPolicy,

    /// Stack convergence polling
    pub convergence: ExponentialBackoffPolicy,
}

/// AWS client options; unset fields fall back to the default provider chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsOptions {
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl From<&Settings> for DeployOptions {
    fn from(settings: &Settings) -> Self {
        let change_set = &settings.change_set;
        let convergence = &settings.convergence;

        Self {
            aws: AwsOptions {
                region: settings.aws.region.clone(),
                profile: settings.aws.profile.clone(),
            },
            change_set: FixedIntervalPolicy {
                interval: Duration::from_secs(change_set.interval_secs),
                max_attempts: change_set.max_attempts,
            },
            convergence: ExponentialBackoffPolicy {
                initial_interval: Duration::from_secs(convergence.initial_interval_secs),
                max_interval: Duration::from_secs(convergence.max_interval_secs),
                multiplier: convergence.multiplier,
                randomization_factor: convergence.randomization_factor,
                ceiling: Duration::from_secs(convergence.ceiling_secs),
                ceiling_anchor: convergence.ceiling_anchor,
                query_errors: convergence.query_errors,
            },
        }
    }
}
