//! Change set execution and stack convergence wait
//!
//! After the execution trigger the stack is polled until it reaches a
//! completed status. In-progress statuses and failed queries are retried under
//! the backoff policy; any other status ends the wait immediately since
//! waiting longer cannot recover it.

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::cfn::api::StackApi;
use crate::cfn::models::StackSummary;
use crate::deploy::check_cancelled;
use crate::errors::DeployError;
use crate::retry::{CeilingAnchor, ExponentialBackoffPolicy, QueryErrorPolicy, RetryState};

/// Result of a single convergence poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    Converged,
    Retry(String),
    Fatal(String),
}

/// Classify a describe result for the stack being waited on
pub fn classify_stacks(stacks: &[StackSummary]) -> PollStatus {
    if stacks.len() != 1 {
        return PollStatus::Fatal(format!(
            "unexpected (!=1) number of stacks in result: {}",
            stacks.len()
        ));
    }

    let stack = &stacks[0];
    if stack.status.is_complete() {
        PollStatus::Converged
    } else if stack.status.is_in_progress() {
        PollStatus::Retry("stack not yet in completed state".to_string())
    } else {
        PollStatus::Fatal(format!(
            "unexpected stack status for stack {}: {}",
            stack.stack_name, stack.status
        ))
    }
}

/// Execute the change set and wait for the stack to converge
pub async fn execute_and_wait(
    api: &dyn StackApi,
    stack_name: &str,
    change_set_name: &str,
    policy: &ExponentialBackoffPolicy,
    deploy_started: Instant,
    cancel: &CancellationToken,
) -> Result<(), DeployError> {
    check_cancelled(cancel, &format!("before executing ChangeSet '{}'", change_set_name))?;
    api.execute_change_set(change_set_name, stack_name)
        .await
        .map_err(|e| DeployError::Submission(format!("error executing the ChangeSet: {}", e)))?;
    info!("Executing ChangeSet '{}' on stack '{}'", change_set_name, stack_name);

    wait_for_convergence(api, stack_name, policy, deploy_started, cancel).await?;

    info!("ChangeSet '{}' has been successfully executed.", change_set_name);
    Ok(())
}

/// Poll the stack until it converges, fails, or the ceiling is reached
pub async fn wait_for_convergence(
    api: &dyn StackApi,
    stack_name: &str,
    policy: &ExponentialBackoffPolicy,
    deploy_started: Instant,
    cancel: &CancellationToken,
) -> Result<(), DeployError> {
    let anchor = match policy.ceiling_anchor {
        CeilingAnchor::PhaseStart => Instant::now(),
        CeilingAnchor::DeployStart => deploy_started,
    };
    let mut retry = RetryState::new(policy, anchor);
    let mut consecutive_errors = 0u32;

    loop {
        check_cancelled(cancel, &format!("waiting for stack '{}' to converge", stack_name))?;

        let reason = match api.describe_stack(stack_name).await {
            Ok(stacks) => {
                consecutive_errors = 0;
                match classify_stacks(&stacks) {
                    PollStatus::Converged => return Ok(()),
                    PollStatus::Fatal(reason) => {
                        error!("{}", reason);
                        return Err(DeployError::FatalStatus(reason));
                    }
                    PollStatus::Retry(reason) => reason,
                }
            }
            Err(e) => {
                consecutive_errors += 1;
                if let QueryErrorPolicy::FailAfterConsecutive(max) = policy.query_errors {
                    if consecutive_errors >= max {
                        return Err(DeployError::Probe(format!(
                            "error describing the stack ({} consecutive failures): {}",
                            consecutive_errors, e
                        )));
                    }
                }
                warn!("Error describing stack '{}', retrying: {}", stack_name, e);
                format!("error describing the stack: {}", e)
            }
        };

        let Some(delay) = retry.next_delay() else {
            error!(
                "Stack '{}' did not converge within {:?}: {}",
                stack_name, policy.ceiling, reason
            );
            return Err(DeployError::CeilingExceeded {
                ceiling: policy.ceiling,
                last_reason: reason,
            });
        };

        debug!(
            "Stack '{}' not converged ({}), retry {} in {:?}",
            stack_name,
            reason,
            retry.attempts(),
            delay
        );

        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(DeployError::Cancelled(format!(
                    "waiting for stack '{}' to converge",
                    stack_name
                )));
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
