pub mod approval;
pub mod break_type;
pub mod confirmation_status;
pub mod document_bucket;
pub mod fx_trade_status;
pub mod pending_with;
pub mod priority;
pub mod queue_status;
pub mod risk_level;
pub mod side;
pub mod step_status;
pub mod trade_kind;
