//! Retry policies for the polling phases
//!
//! Change set creation is expected to be quick and is polled on a fixed
//! interval with an attempt budget. Stack convergence can take minutes and is
//! polled with jittered exponential backoff under a wall-clock ceiling. The
//! two are kept as distinct policy values and handed to each loop explicitly.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Fixed interval polling used while a change set is being created
#[derive(Debug, Clone, PartialEq)]
pub struct FixedIntervalPolicy {
    /// Delay between two polls
    pub interval: Duration,

    /// Maximum number of polls
    pub max_attempts: u32,
}

impl Default for FixedIntervalPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 12,
        }
    }
}

/// Point in time the convergence ceiling is measured from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CeilingAnchor {
    /// Start of the execution wait loop
    #[default]
    PhaseStart,

    /// Start of the whole deploy call
    DeployStart,
}

/// How query errors are treated while waiting for convergence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryErrorPolicy {
    /// Keep retrying until the ceiling is reached
    #[default]
    RetryWithinCeiling,

    /// Give up after this many consecutive failed queries
    FailAfterConsecutive(u32),
}

/// Jittered exponential backoff used while waiting for stack convergence
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoffPolicy {
    /// First interval
    pub initial_interval: Duration,

    /// Interval cap before jitter
    pub max_interval: Duration,

    /// Growth factor between intervals
    pub multiplier: f64,

    /// Jitter ratio; each delay is drawn from `[i * (1 - r), i * (1 + r)]`
    pub randomization_factor: f64,

    /// Hard wall-clock ceiling
    pub ceiling: Duration,

    pub ceiling_anchor: CeilingAnchor,

    pub query_errors: QueryErrorPolicy,
}

impl Default for ExponentialBackoffPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(12),
            max_interval: Duration::from_secs(60),
            multiplier: 1.5,
            randomization_factor: 0.5,
            ceiling: Duration::from_secs(600), // 10 minutes
            ceiling_anchor: CeilingAnchor::PhaseStart,
            query_errors: QueryErrorPolicy::RetryWithinCeiling,
        }
    }
}

/// Calculate the un-jittered backoff interval for the given attempt
pub fn calc_exp_backoff(policy: &ExponentialBackoffPolicy, attempt: u32) -> Duration {
    let delay_secs = policy.initial_interval.as_secs_f64() * policy.multiplier.powi(attempt as i32);
    let capped_delay = delay_secs.min(policy.max_interval.as_secs_f64());
    Duration::from_secs_f64(capped_delay)
}

/// Apply random jitter to an interval
pub fn randomize(interval: Duration, factor: f64) -> Duration {
    if !factor.is_finite() || factor <= 0.0 || interval.is_zero() {
        return interval;
    }
    let factor = factor.min(1.0);

    let secs = interval.as_secs_f64();
    let delta = factor * secs;
    let jittered = rand::thread_rng().gen_range((secs - delta)..=(secs + delta));
    Duration::from_secs_f64(jittered.max(0.0))
}

/// Backoff bookkeeping for a single polling loop
#[derive(Debug, Clone)]
pub struct RetryState {
    policy: ExponentialBackoffPolicy,
    started_at: Instant,
    attempts: u32,
}

impl RetryState {
    /// Start tracking a loop whose ceiling is measured from `started_at`
    pub fn new(policy: &ExponentialBackoffPolicy, started_at: Instant) -> Self {
        Self {
            policy: policy.clone(),
            started_at,
            attempts: 0,
        }
    }

    /// Number of delays handed out so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Interval the next delay will be drawn around
    pub fn current_interval(&self) -> Duration {
        calc_exp_backoff(&self.policy, self.attempts)
    }

    /// Next delay to sleep, or `None` once sleeping would pass the ceiling
    pub fn next_delay(&mut self) -> Option<Duration> {
        let delay = randomize(self.current_interval(), self.policy.randomization_factor);
        if self.elapsed() + delay > self.policy.ceiling {
            return None;
        }
        self.attempts += 1;
        Some(delay)
    }
}
