//! CloudFormation value types as seen by the deployer

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether the change set creates a new stack or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeSetType {
    Create,
    Update,
}

impl ChangeSetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeSetType::Create => "CREATE",
            ChangeSetType::Update => "UPDATE",
        }
    }
}

impl fmt::Display for ChangeSetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stack status reported by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackStatus {
    CreateInProgress,
    UpdateInProgress,
    CreateComplete,
    UpdateComplete,
    UpdateCompleteCleanupInProgress,
    /// Any status the deployer does not wait on, kept verbatim
    Other(String),
}

impl StackStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "CREATE_IN_PROGRESS" => StackStatus::CreateInProgress,
            "UPDATE_IN_PROGRESS" => StackStatus::UpdateInProgress,
            "CREATE_COMPLETE" => StackStatus::CreateComplete,
            "UPDATE_COMPLETE" => StackStatus::UpdateComplete,
            "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS" => StackStatus::UpdateCompleteCleanupInProgress,
            other => StackStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StackStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            StackStatus::UpdateInProgress => "UPDATE_IN_PROGRESS",
            StackStatus::CreateComplete => "CREATE_COMPLETE",
            StackStatus::UpdateComplete => "UPDATE_COMPLETE",
            StackStatus::UpdateCompleteCleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
            StackStatus::Other(status) => status,
        }
    }

    /// The stack has converged after a create or update
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            StackStatus::CreateComplete
                | StackStatus::UpdateComplete
                | StackStatus::UpdateCompleteCleanupInProgress
        )
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, StackStatus::CreateInProgress | StackStatus::UpdateInProgress)
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stack returned by a describe query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSummary {
    pub stack_name: String,
    pub status: StackStatus,
}

/// Change set creation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSetStatus {
    CreatePending,
    CreateInProgress,
    CreateComplete,
    Failed,
    Other(String),
}

impl ChangeSetStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "CREATE_PENDING" => ChangeSetStatus::CreatePending,
            "CREATE_IN_PROGRESS" => ChangeSetStatus::CreateInProgress,
            "CREATE_COMPLETE" => ChangeSetStatus::CreateComplete,
            "FAILED" => ChangeSetStatus::Failed,
            other => ChangeSetStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChangeSetStatus::CreatePending => "CREATE_PENDING",
            ChangeSetStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            ChangeSetStatus::CreateComplete => "CREATE_COMPLETE",
            ChangeSetStatus::Failed => "FAILED",
            ChangeSetStatus::Other(status) => status,
        }
    }
}

impl fmt::Display for ChangeSetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of describing a change set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSetDescription {
    pub status: ChangeSetStatus,
    pub status_reason: Option<String>,
}

/// Parameters of a change set creation request
#[derive(Debug, Clone)]
pub struct CreateChangeSetInput {
    pub change_set_name: String,
    pub change_set_type: ChangeSetType,
    pub stack_name: String,
    pub template_body: String,
    /// Acknowledge that the template creates named IAM resources
    pub named_iam: bool,
}
