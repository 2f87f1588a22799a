use crate::domain::error::DomainError;
use crate::domain::ports::trade_source::TradeSource;
use async_trait::async_trait;

/// CSV text already in memory, e.g. an uploaded request body.
pub struct InlineSource {
    label: String,
    text: String,
}

impl InlineSource {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

#[async_trait]
impl TradeSource for InlineSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    async fn fetch(&self) -> Result<String, DomainError> {
        Ok(self.text.clone())
    }
}
