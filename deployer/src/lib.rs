//! Lambda Deployer Library
//!
//! Runs orchestrator apps as AWS Lambda functions: creates them from staged
//! artifacts, reports their status and removes them again.

pub mod app;
pub mod deploy;
pub mod errors;
pub mod logs;
pub mod settings;
pub mod telemetry;
pub mod utils;

pub use deploy::deployer::LambdaAppDeployer;
pub use deploy::ids::AppHandle;
pub use errors::DeployerError;
