//! Finite State Machine for a stack deployment

use serde::{Deserialize, Serialize};

/// Deployment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    /// Initial state, nothing sent yet
    Pending,

    /// Probing whether the stack exists
    Resolving,

    /// Change set submitted, waiting for it to be created
    CreatingChangeSet,

    /// Change set executed, waiting for the stack to converge
    Executing,

    /// Stack reached a completed status
    Converged,

    /// Change set was empty, nothing executed
    NoChanges,

    /// Deployment failed
    Failed,

    /// Deployment cancelled by the caller
    Cancelled,
}

impl DeploymentState {
    /// No further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentState::Converged
                | DeploymentState::NoChanges
                | DeploymentState::Failed
                | DeploymentState::Cancelled
        )
    }

    fn is_in_flight(&self) -> bool {
        matches!(
            self,
            DeploymentState::Resolving
                | DeploymentState::CreatingChangeSet
                | DeploymentState::Executing
        )
    }
}

/// Deployment event
#[derive(Debug, Clone)]
pub enum DeploymentEvent {
    /// Start probing the stack
    Start,

    /// Change set type decided
    Resolved,

    /// Change set created and ready to execute
    ChangeSetReady,

    /// Change set contained no changes
    ChangeSetEmpty,

    /// Stack converged after execution
    Converged,

    /// Any phase failed
    Failed(String),

    /// Caller cancelled the deployment
    Cancel,
}

/// Deployment FSM
#[derive(Debug, Clone)]
pub struct DeploymentFsm {
    state: DeploymentState,
    error: Option<String>,
}

impl DeploymentFsm {
    /// Create a new FSM in pending state
    pub fn new() -> Self {
        Self {
            state: DeploymentState::Pending,
            error: None,
        }
    }

    /// Get current state
    pub fn state(&self) -> DeploymentState {
        self.state
    }

    /// Get error message if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: DeploymentEvent) -> Result<(), String> {
        let new_state = match (&self.state, &event) {
            (DeploymentState::Pending, DeploymentEvent::Start) => DeploymentState::Resolving,

            (DeploymentState::Resolving, DeploymentEvent::Resolved) => {
                DeploymentState::CreatingChangeSet
            }

            (DeploymentState::CreatingChangeSet, DeploymentEvent::ChangeSetReady) => {
                DeploymentState::Executing
            }
            (DeploymentState::CreatingChangeSet, DeploymentEvent::ChangeSetEmpty) => {
                DeploymentState::NoChanges
            }

            (DeploymentState::Executing, DeploymentEvent::Converged) => DeploymentState::Converged,

            (state, DeploymentEvent::Failed(err)) if state.is_in_flight() => {
                self.error = Some(err.clone());
                DeploymentState::Failed
            }
            (state, DeploymentEvent::Cancel) if state.is_in_flight() => DeploymentState::Cancelled,

            // Invalid transitions
            (state, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", state, event));
            }
        };

        self.state = new_state;
        Ok(())
    }
}

impl Default for DeploymentFsm {
    fn default() -> Self {
        Self::new()
    }
}
