//! cfndeploy Library
//!
//! Deploys a CloudFormation template to a stack through a change set and
//! waits for the stack to converge.

pub mod app;
pub mod cfn;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod logs;
pub mod models;
pub mod naming;
pub mod retry;
pub mod storage;
pub mod utils;

pub use deploy::{deploy, Deployer};
pub use errors::DeployError;
pub use naming::{logical_name_from_label, stack_name_from_label};
