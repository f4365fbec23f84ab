//! Change set submission and creation wait

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cfn::api::StackApi;
use crate::cfn::models::{ChangeSetDescription, ChangeSetStatus, ChangeSetType, CreateChangeSetInput};
use crate::deploy::check_cancelled;
use crate::errors::DeployError;
use crate::models::deployment::DeploymentRequest;
use crate::naming::{canonical_stack_name, change_set_name};
use crate::retry::FixedIntervalPolicy;

const EMPTY_CHANGE_SET_REASON: &str = "submitted information didn't contain changes";

/// A submitted change set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSetHandle {
    /// Id returned by the service
    pub id: String,

    /// Name generated for this deployment attempt
    pub name: String,
}

/// How change set creation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSetOutcome {
    /// Created, ready to execute
    Ready,

    /// Failed only because there was nothing to change
    Empty,
}

/// Whether a failed change set failed because it contains no changes
///
/// The service reports this only through the status reason text.
pub fn change_set_is_empty(description: &ChangeSetDescription) -> bool {
    description.status == ChangeSetStatus::Failed
        && description
            .status_reason
            .as_deref()
            .is_some_and(|reason| reason.contains(EMPTY_CHANGE_SET_REASON))
}

enum CreateWait {
    Complete,
    Failed(String),
}

/// Submit a change set for the request and wait until it is created
pub async fn submit_and_wait(
    api: &dyn StackApi,
    request: &DeploymentRequest,
    change_set_type: ChangeSetType,
    policy: &FixedIntervalPolicy,
    cancel: &CancellationToken,
) -> Result<(ChangeSetHandle, ChangeSetOutcome), DeployError> {
    let name = change_set_name(&request.stack_name);
    let stack_name = canonical_stack_name(&request.stack_name);

    let input = CreateChangeSetInput {
        change_set_name: name.clone(),
        change_set_type,
        stack_name: stack_name.clone(),
        template_body: request.template_body.clone(),
        named_iam: request.named_iam_capability,
    };

    check_cancelled(cancel, &format!("before creating ChangeSet '{}'", name))?;
    let id = api.create_change_set(input).await.map_err(|e| {
        DeployError::Submission(format!(
            "the ChangeSetType was {} error in creating ChangeSet: {}",
            change_set_type, e
        ))
    })?;
    info!("Created {} ChangeSet '{}' for stack '{}'", change_set_type, name, stack_name);

    let handle = ChangeSetHandle { id, name };

    let reason = match wait_for_create_complete(api, &handle.id, &stack_name, policy, cancel).await? {
        CreateWait::Complete => return Ok((handle, ChangeSetOutcome::Ready)),
        CreateWait::Failed(reason) => reason,
    };

    let description = api
        .describe_change_set(&handle.id, &stack_name)
        .await
        .map_err(|e| DeployError::Probe(format!("error describing the ChangeSet: {}", e)))?;

    if change_set_is_empty(&description) {
        info!("ChangeSet '{}' is empty. Nothing to do.", handle.id);
        return Ok((handle, ChangeSetOutcome::Empty));
    }

    Err(DeployError::CreationTimeout(reason))
}

async fn wait_for_create_complete(
    api: &dyn StackApi,
    change_set_id: &str,
    stack_name: &str,
    policy: &FixedIntervalPolicy,
    cancel: &CancellationToken,
) -> Result<CreateWait, DeployError> {
    for attempt in 1..=policy.max_attempts {
        match api.describe_change_set(change_set_id, stack_name).await {
            Ok(description) => match description.status {
                ChangeSetStatus::CreateComplete => return Ok(CreateWait::Complete),
                ChangeSetStatus::Failed => {
                    return Ok(CreateWait::Failed(format!(
                        "change set creation failed: {}",
                        description.status_reason.as_deref().unwrap_or("no reason given")
                    )));
                }
                status => debug!(
                    "ChangeSet '{}' is {} (attempt {}/{})",
                    change_set_id, status, attempt, policy.max_attempts
                ),
            },
            Err(e) => {
                warn!("Describing ChangeSet '{}' failed: {}", change_set_id, e);
                return Ok(CreateWait::Failed(e.to_string()));
            }
        }

        if attempt < policy.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(DeployError::Cancelled(format!(
                        "waiting for ChangeSet '{}' creation",
                        change_set_id
                    )));
                }
                _ = tokio::time::sleep(policy.interval) => {}
            }
        }
    }

    Ok(CreateWait::Failed(format!(
        "exceeded {} wait attempts",
        policy.max_attempts
    )))
}
