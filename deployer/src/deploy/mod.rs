//! Deployment module

pub mod backend;
pub mod deployer;
pub mod ids;
pub mod lambda;
pub mod properties;
pub mod saga;
pub mod status;
