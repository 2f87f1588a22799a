pub mod random_source;
pub mod trade_repository;
pub mod trade_source;
pub mod workflow_repository;
