//! AWS CloudFormation implementation of [`StackApi`]

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::config::Region;
use aws_sdk_cloudformation::error::DisplayErrorContext;
use aws_sdk_cloudformation::types::{Capability, ChangeSetType as SdkChangeSetType};
use aws_sdk_cloudformation::Client;
use tracing::debug;

use crate::app::options::AwsOptions;
use crate::cfn::api::{ServiceError, StackApi};
use crate::cfn::models::{
    ChangeSetDescription, ChangeSetStatus, CreateChangeSetInput, StackStatus, StackSummary,
};

/// CloudFormation client
#[derive(Debug, Clone)]
pub struct CloudFormationApi {
    client: Client,
}

impl CloudFormationApi {
    /// Wrap an existing SDK client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default credential chain
    pub async fn connect(options: &AwsOptions) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &options.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &options.profile {
            loader = loader.profile_name(profile);
        }

        let config = loader.load().await;
        debug!("CloudFormation client region: {:?}", config.region());
        Self::new(Client::new(&config))
    }
}

fn service_error<E: std::error::Error>(err: E) -> ServiceError {
    ServiceError::new(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl StackApi for CloudFormationApi {
    async fn describe_stack(&self, stack_name: &str) -> Result<Vec<StackSummary>, ServiceError> {
        let output = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(service_error)?;

        Ok(output
            .stacks()
            .iter()
            .map(|stack| StackSummary {
                stack_name: stack.stack_name().unwrap_or_default().to_string(),
                status: StackStatus::parse(
                    stack.stack_status().map(|s| s.as_str()).unwrap_or_default(),
                ),
            })
            .collect())
    }

    async fn create_change_set(&self, input: CreateChangeSetInput) -> Result<String, ServiceError> {
        let mut request = self
            .client
            .create_change_set()
            .change_set_name(input.change_set_name)
            .change_set_type(SdkChangeSetType::from(input.change_set_type.as_str()))
            .stack_name(input.stack_name)
            .template_body(input.template_body);

        if input.named_iam {
            request = request.capabilities(Capability::CapabilityNamedIam);
        }

        let output = request.send().await.map_err(service_error)?;
        output
            .id()
            .map(str::to_string)
            .ok_or_else(|| ServiceError::new("CreateChangeSet response did not contain an id"))
    }

    async fn describe_change_set(
        &self,
        change_set_id: &str,
        stack_name: &str,
    ) -> Result<ChangeSetDescription, ServiceError> {
        let output = self
            .client
            .describe_change_set()
            .change_set_name(change_set_id)
            .stack_name(stack_name)
            .send()
            .await
            .map_err(service_error)?;

        Ok(ChangeSetDescription {
            status: ChangeSetStatus::parse(output.status().map(|s| s.as_str()).unwrap_or_default()),
            status_reason: output.status_reason().map(str::to_string),
        })
    }

    async fn execute_change_set(
        &self,
        change_set_name: &str,
        stack_name: &str,
    ) -> Result<(), ServiceError> {
        self.client
            .execute_change_set()
            .change_set_name(change_set_name)
            .stack_name(stack_name)
            .send()
            .await
            .map_err(service_error)?;
        Ok(())
    }
}
