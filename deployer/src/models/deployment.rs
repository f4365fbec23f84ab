//! Deployment request and report models

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cfn::models::ChangeSetType;
use crate::deploy::fsm::DeploymentState;
use crate::errors::DeployError;
use crate::naming::MAX_NAME_LEN;

/// Input to a single deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRequest {
    /// Target stack name, trimmed to the service limit before use
    pub stack_name: String,

    /// Template body
    pub template_body: String,

    /// Acknowledge named IAM resources in the template
    #[serde(default)]
    pub named_iam_capability: bool,
}

impl DeploymentRequest {
    pub fn new(
        stack_name: impl Into<String>,
        template_body: impl Into<String>,
        named_iam_capability: bool,
    ) -> Self {
        Self {
            stack_name: stack_name.into(),
            template_body: template_body.into(),
            named_iam_capability,
        }
    }

    /// Check the request before anything is sent to the service
    pub fn validate(&self) -> Result<(), DeployError> {
        if self.stack_name.is_empty() {
            return Err(DeployError::ValidationError(
                "stack name must not be empty".to_string(),
            ));
        }
        if self.stack_name.len() > MAX_NAME_LEN {
            return Err(DeployError::ValidationError(format!(
                "stack name is longer than {} bytes",
                MAX_NAME_LEN
            )));
        }
        if self.template_body.trim().is_empty() {
            return Err(DeployError::ValidationError(
                "template body must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// How a successful deployment ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployOutcome {
    /// The change set was executed and the stack converged
    Converged,

    /// The change set contained no changes; nothing was executed
    NoChanges,
}

/// Summary of a successful deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployReport {
    pub stack_name: String,
    pub change_set_type: ChangeSetType,
    pub change_set_name: String,
    pub outcome: DeployOutcome,
    pub state: DeploymentState,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}
