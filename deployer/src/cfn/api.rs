//! Service boundary used by the deployment phases

use async_trait::async_trait;
use thiserror::Error;

use crate::cfn::models::{ChangeSetDescription, CreateChangeSetInput, StackSummary};

/// Error text returned by the service
///
/// The service has no structured not-found code for stacks, so the message is
/// kept as-is and classified by [`ServiceError::is_stack_missing`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error reports that the described stack does not exist
    pub fn is_stack_missing(&self) -> bool {
        self.message.contains("does not exist")
    }
}

/// Stack and change set operations of the orchestration service
#[async_trait]
pub trait StackApi: Send + Sync {
    /// Describe the stack with the exact given name
    async fn describe_stack(&self, stack_name: &str) -> Result<Vec<StackSummary>, ServiceError>;

    /// Submit a change set, returning its id
    async fn create_change_set(&self, input: CreateChangeSetInput) -> Result<String, ServiceError>;

    async fn describe_change_set(
        &self,
        change_set_id: &str,
        stack_name: &str,
    ) -> Result<ChangeSetDescription, ServiceError>;

    async fn execute_change_set(
        &self,
        change_set_name: &str,
        stack_name: &str,
    ) -> Result<(), ServiceError>;
}
