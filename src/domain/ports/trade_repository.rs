use crate::domain::entities::trade::{EquityTrade, FxTrade, Trade};
use crate::domain::error::DomainError;
use crate::domain::values::confirmation_status::ConfirmationStatus;
use crate::domain::values::trade_kind::TradeKind;

#[derive(Debug, Clone, PartialEq)]
pub struct StatusCount {
    pub kind: TradeKind,
    pub status: ConfirmationStatus,
    pub count: usize,
}

/// Persisted copy of the ingested trades. Enrichment is not stored.
pub trait TradeRepository: Send + Sync {
    fn add_equity(&self, trade: &EquityTrade) -> Result<(), DomainError>;
    fn add_fx(&self, trade: &FxTrade) -> Result<(), DomainError>;
    fn list_equity(&self) -> Result<Vec<EquityTrade>, DomainError>;
    fn list_fx(&self) -> Result<Vec<FxTrade>, DomainError>;
    fn get_trade(&self, trade_id: &str) -> Result<Option<Trade>, DomainError>;
    fn status_counts(&self) -> Result<Vec<StatusCount>, DomainError>;

    fn add_trade(&self, trade: &Trade) -> Result<(), DomainError> {
        match trade {
            Trade::Equity(t) => self.add_equity(t),
            Trade::Fx(t) => self.add_fx(t),
        }
    }
}
