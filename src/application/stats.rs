use crate::domain::error::DomainError;
use crate::domain::ports::trade_repository::TradeRepository;
use crate::domain::ports::workflow_repository::WorkflowRepository;
use crate::domain::values::confirmation_status::ConfirmationStatus;
use crate::domain::values::trade_kind::TradeKind;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_trades: usize,
    pub total_equity_trades: usize,
    pub total_fx_trades: usize,
    pub total_workflows: usize,
    /// Confirmed plus Settled.
    pub trade_confirmations: usize,
    pub confirmed_trades: usize,
    pub pending_trades: usize,
    /// Failed plus Disputed.
    pub failed_trades: usize,
    pub settled_trades: usize,
}

pub struct StatsUseCase {
    trades: Arc<dyn TradeRepository>,
    workflows: Arc<dyn WorkflowRepository>,
}

impl StatsUseCase {
    pub fn new(trades: Arc<dyn TradeRepository>, workflows: Arc<dyn WorkflowRepository>) -> Self {
        Self { trades, workflows }
    }

    /// Counts straight from the database on every call.
    pub fn stats(&self) -> Result<DashboardStats, DomainError> {
        let mut stats = DashboardStats {
            total_workflows: self.workflows.count_workflows()?,
            ..Default::default()
        };
        for row in self.trades.status_counts()? {
            stats.total_trades += row.count;
            match row.kind {
                TradeKind::Equity => stats.total_equity_trades += row.count,
                TradeKind::Fx => stats.total_fx_trades += row.count,
            }
            match row.status {
                ConfirmationStatus::Confirmed => {
                    stats.confirmed_trades += row.count;
                    stats.trade_confirmations += row.count;
                }
                ConfirmationStatus::Settled => {
                    stats.settled_trades += row.count;
                    stats.trade_confirmations += row.count;
                }
                ConfirmationStatus::Pending => stats.pending_trades += row.count,
                ConfirmationStatus::Failed | ConfirmationStatus::Disputed => {
                    stats.failed_trades += row.count
                }
            }
        }
        Ok(stats)
    }
}
