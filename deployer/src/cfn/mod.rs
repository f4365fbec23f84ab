//! CloudFormation service boundary

pub mod api;
pub mod client;
pub mod models;

pub use api::{ServiceError, StackApi};
pub use client::CloudFormationApi;
