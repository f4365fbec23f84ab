//! Drives a deployment through its phases

use std::sync::Arc;

use chrono::Utc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::app::options::DeployOptions;
use crate::cfn::api::StackApi;
use crate::cfn::models::ChangeSetType;
use crate::deploy::change_set::{submit_and_wait, ChangeSetHandle, ChangeSetOutcome};
use crate::deploy::check_cancelled;
use crate::deploy::converge::execute_and_wait;
use crate::deploy::fsm::{DeploymentEvent, DeploymentFsm};
use crate::deploy::resolver::resolve_change_set_type;
use crate::errors::DeployError;
use crate::models::deployment::{DeployOutcome, DeployReport, DeploymentRequest};
use crate::naming::canonical_stack_name;

/// Stack deployer
pub struct Deployer {
    api: Arc<dyn StackApi>,
    options: DeployOptions,
}

impl Deployer {
    /// Create a new deployer
    pub fn new(api: Arc<dyn StackApi>, options: DeployOptions) -> Self {
        Self { api, options }
    }

    /// Deploy the template in `request` to its stack
    ///
    /// Returns once the stack has converged, or immediately after change set
    /// creation when the change set turned out to be empty.
    pub async fn deploy(
        &self,
        request: &DeploymentRequest,
        cancel: &CancellationToken,
    ) -> Result<DeployReport, DeployError> {
        request.validate()?;

        let started = Instant::now();
        let started_at = Utc::now();
        let mut fsm = DeploymentFsm::new();
        transition(&mut fsm, DeploymentEvent::Start)?;

        info!("Deploying stack '{}'", request.stack_name);

        match self.run_phases(&mut fsm, request, started, cancel).await {
            Ok((change_set_type, handle, outcome)) => Ok(DeployReport {
                stack_name: canonical_stack_name(&request.stack_name),
                change_set_type,
                change_set_name: handle.name,
                outcome,
                state: fsm.state(),
                started_at,
                elapsed: started.elapsed(),
            }),
            Err(e) => {
                let event = if e.is_cancelled() {
                    DeploymentEvent::Cancel
                } else {
                    DeploymentEvent::Failed(e.to_string())
                };
                if let Err(t) = fsm.process(event) {
                    warn!("{}", t);
                }
                error!(
                    "Deployment of stack '{}' ended in state {:?}: {}",
                    request.stack_name,
                    fsm.state(),
                    e
                );
                Err(e)
            }
        }
    }

    async fn run_phases(
        &self,
        fsm: &mut DeploymentFsm,
        request: &DeploymentRequest,
        started: Instant,
        cancel: &CancellationToken,
    ) -> Result<(ChangeSetType, ChangeSetHandle, DeployOutcome), DeployError> {
        let api = self.api.as_ref();
        let stack_name = canonical_stack_name(&request.stack_name);

        check_cancelled(cancel, "before resolving the ChangeSet type")?;
        let change_set_type = resolve_change_set_type(api, &request.stack_name).await?;
        transition(fsm, DeploymentEvent::Resolved)?;

        let (handle, outcome) = submit_and_wait(
            api,
            request,
            change_set_type,
            &self.options.change_set,
            cancel,
        )
        .await?;

        if outcome == ChangeSetOutcome::Empty {
            transition(fsm, DeploymentEvent::ChangeSetEmpty)?;
            return Ok((change_set_type, handle, DeployOutcome::NoChanges));
        }
        transition(fsm, DeploymentEvent::ChangeSetReady)?;

        execute_and_wait(
            api,
            &stack_name,
            &handle.name,
            &self.options.convergence,
            started,
            cancel,
        )
        .await?;
        transition(fsm, DeploymentEvent::Converged)?;

        Ok((change_set_type, handle, DeployOutcome::Converged))
    }
}

fn transition(fsm: &mut DeploymentFsm, event: DeploymentEvent) -> Result<(), DeployError> {
    fsm.process(event).map_err(DeployError::Internal)
}

/// Deploy a template with default options and no cancellation
pub async fn deploy(
    api: Arc<dyn StackApi>,
    stack_name: &str,
    template_body: &str,
    named_iam_capability: bool,
) -> Result<(), DeployError> {
    let request = DeploymentRequest::new(stack_name, template_body, named_iam_capability);
    Deployer::new(api, DeployOptions::default())
        .deploy(&request, &CancellationToken::new())
        .await
        .map(|_| ())
}
