use crate::application::workflow::derive_workflow;
use crate::domain::entities::trade::Trade;
use crate::domain::entities::workflow::TradeWorkflow;
use crate::domain::error::DomainError;
use crate::domain::ports::trade_repository::TradeRepository;
use crate::domain::ports::workflow_repository::WorkflowRepository;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub trades_inserted: usize,
    pub workflows_inserted: usize,
    pub errors: Vec<String>,
}

/// Writes trades and their workflow projections to the relational store.
#[derive(Clone)]
pub struct PersistUseCase {
    trades: Arc<dyn TradeRepository>,
    workflows: Arc<dyn WorkflowRepository>,
}

impl PersistUseCase {
    pub fn new(trades: Arc<dyn TradeRepository>, workflows: Arc<dyn WorkflowRepository>) -> Self {
        Self { trades, workflows }
    }

    /// Inserts one trade and then its workflow.
    pub fn persist(&self, trade: &Trade) -> Result<i64, DomainError> {
        self.trades.add_trade(trade)?;
        self.workflows.add_workflow(&derive_workflow(trade))
    }

    pub fn add_workflow(&self, workflow: &TradeWorkflow) -> Result<i64, DomainError> {
        self.workflows.add_workflow(workflow)
    }

    /// Best-effort bulk copy: each record is inserted on its own, failures are
    /// collected and the loop moves on. A trade that fails to insert gets no workflow.
    pub fn migrate(&self, trades: &[Trade]) -> MigrationReport {
        let mut report = MigrationReport::default();
        for trade in trades {
            if let Err(e) = self.trades.add_trade(trade) {
                warn!(trade_id = trade.trade_id(), error = %e, "trade insert failed");
                report.errors.push(format!("{}: {e}", trade.trade_id()));
                continue;
            }
            report.trades_inserted += 1;

            match self.workflows.add_workflow(&derive_workflow(trade)) {
                Ok(_) => report.workflows_inserted += 1,
                Err(e) => {
                    warn!(trade_id = trade.trade_id(), error = %e, "workflow insert failed");
                    report.errors.push(format!("{} workflow: {e}", trade.trade_id()));
                }
            }
        }
        info!(
            trades = report.trades_inserted,
            workflows = report.workflows_inserted,
            errors = report.errors.len(),
            "migration finished"
        );
        report
    }
}
