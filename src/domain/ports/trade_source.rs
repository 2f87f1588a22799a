use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Where raw CSV text comes from: a local file, an HTTP endpoint, an upload.
#[async_trait]
pub trait TradeSource: Send + Sync {
    /// Human-readable location, used in logs.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<String, DomainError>;
}
