use crate::domain::entities::workflow::{TradeWorkflow, WorkflowStep};
use crate::domain::error::DomainError;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWorkflow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub workflow: TradeWorkflow,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredStep {
    pub id: i64,
    pub workflow_id: i64,
    pub trade_id: String,
    pub position: usize,
    #[serde(flatten)]
    pub step: WorkflowStep,
}

/// Persisted workflow projections, one row per workflow plus one per step.
pub trait WorkflowRepository: Send + Sync {
    /// Inserts the workflow and its steps, returning the workflow's surrogate id.
    fn add_workflow(&self, workflow: &TradeWorkflow) -> Result<i64, DomainError>;
    fn list_workflows(&self) -> Result<Vec<StoredWorkflow>, DomainError>;
    fn list_steps(&self) -> Result<Vec<StoredStep>, DomainError>;
    fn count_workflows(&self) -> Result<usize, DomainError>;
}
