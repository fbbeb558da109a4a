//! Deployer unit tests

mod test_deploy;
mod test_handles;
mod test_undeploy;
