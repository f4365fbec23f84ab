//! Decides whether a deployment creates or updates the stack

use tracing::debug;

use crate::cfn::api::StackApi;
use crate::cfn::models::ChangeSetType;
use crate::errors::DeployError;

/// Probe the stack and pick the change set type
pub async fn resolve_change_set_type(
    api: &dyn StackApi,
    stack_name: &str,
) -> Result<ChangeSetType, DeployError> {
    match api.describe_stack(stack_name).await {
        Ok(_) => {
            debug!("Stack '{}' exists, updating", stack_name);
            Ok(ChangeSetType::Update)
        }
        Err(e) if e.is_stack_missing() => {
            debug!("Stack '{}' does not exist, creating", stack_name);
            Ok(ChangeSetType::Create)
        }
        Err(e) => Err(DeployError::Probe(format!(
            "unexpected error while describing stack: {}",
            e
        ))),
    }
}
