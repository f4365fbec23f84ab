//! Deployment phases

use tokio_util::sync::CancellationToken;

use crate::errors::DeployError;

pub mod change_set;
pub mod converge;
pub mod deployer;
pub mod fsm;
pub mod resolver;

pub use deployer::{deploy, Deployer};

/// Stop before the next service call once the token has fired
pub(crate) fn check_cancelled(cancel: &CancellationToken, what: &str) -> Result<(), DeployError> {
    if cancel.is_cancelled() {
        return Err(DeployError::Cancelled(what.to_string()));
    }
    Ok(())
}
