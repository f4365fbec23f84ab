//! Deployment run entry point

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::app::options::DeployOptions;
use crate::cfn::api::StackApi;
use crate::cfn::client::CloudFormationApi;
use crate::deploy::Deployer;
use crate::errors::DeployError;
use crate::models::deployment::{DeployReport, DeploymentRequest};

/// Run a deployment against CloudFormation
pub async fn run(
    options: DeployOptions,
    request: DeploymentRequest,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<DeployReport, DeployError> {
    info!("Initializing CloudFormation client...");
    let api = Arc::new(CloudFormationApi::connect(&options.aws).await);
    run_with_api(api, options, request, shutdown_signal).await
}

/// Run a deployment, cancelling it when `shutdown_signal` resolves
pub async fn run_with_api(
    api: Arc<dyn StackApi>,
    options: DeployOptions,
    request: DeploymentRequest,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<DeployReport, DeployError> {
    let cancel = CancellationToken::new();

    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal.await;
            info!("Shutdown signal received, cancelling deployment...");
            cancel.cancel();
        }
    });

    let deployer = Deployer::new(api, options);
    let result = deployer.deploy(&request, &cancel).await;

    watcher.abort();
    result
}
