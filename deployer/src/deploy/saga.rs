//! Saga for deploying one function.
//!
//! Each backend resource created along the way records how to remove it
//! again, so a failure part way through does not leave an orphaned function
//! behind without a handle to find it by.

use tracing::{error, info};

use crate::deploy::backend::{CreateFunctionParams, EventSourceMappingParams, FunctionApi};
use crate::errors::DeployerError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CompensationAction {
    DeleteFunction { arn: String },
    DeleteEventSourceMapping { uuid: String },
}

pub struct DeploySaga<'a> {
    api: &'a dyn FunctionApi,
    deployment_id: String,
    compensation_actions: Vec<CompensationAction>,
}

impl<'a> DeploySaga<'a> {
    pub fn new(api: &'a dyn FunctionApi, deployment_id: impl Into<String>) -> Self {
        Self {
            api,
            deployment_id: deployment_id.into(),
            compensation_actions: Vec::new(),
        }
    }

    /// Number of undo actions recorded so far
    pub fn pending_compensations(&self) -> usize {
        self.compensation_actions.len()
    }

    pub async fn create_function(
        &mut self,
        params: CreateFunctionParams,
    ) -> Result<String, DeployerError> {
        match self.api.create_function(params).await {
            Ok(arn) => {
                self.compensation_actions
                    .push(CompensationAction::DeleteFunction { arn: arn.clone() });
                Ok(arn)
            }
            Err(e) => {
                error!("Failed to create function for {}: {}", self.deployment_id, e);
                self.compensate().await;
                Err(e.into())
            }
        }
    }

    pub async fn create_event_source_mapping(
        &mut self,
        params: EventSourceMappingParams,
    ) -> Result<String, DeployerError> {
        match self.api.create_event_source_mapping(params).await {
            Ok(uuid) => {
                self.compensation_actions
                    .push(CompensationAction::DeleteEventSourceMapping { uuid: uuid.clone() });
                Ok(uuid)
            }
            Err(e) => {
                error!(
                    "Failed to create event source mapping for {}: {}",
                    self.deployment_id, e
                );
                self.compensate().await;
                Err(e.into())
            }
        }
    }

    /// Undo every recorded step, newest first
    pub async fn compensate(&mut self) {
        if self.compensation_actions.is_empty() {
            return;
        }
        info!(
            "Running {} compensation action(s) for deployment {}",
            self.pending_compensations(),
            self.deployment_id
        );
        let actions = std::mem::take(&mut self.compensation_actions);
        for action in actions.into_iter().rev() {
            let result = match &action {
                CompensationAction::DeleteFunction { arn } => self.api.delete_function(arn).await,
                CompensationAction::DeleteEventSourceMapping { uuid } => {
                    self.api.delete_event_source_mapping(uuid).await
                }
            };
            match result {
                Ok(()) => info!("Rolled back {:?}", action),
                Err(e) if e.is_not_found() => info!("Nothing to roll back for {:?}", action),
                Err(e) => error!("Failed to roll back {:?}: {}", action, e),
            }
        }
    }

    /// Keep everything created so far
    pub fn commit(mut self) {
        info!("Committing deployment {}", self.deployment_id);
        self.compensation_actions.clear();
    }
}
