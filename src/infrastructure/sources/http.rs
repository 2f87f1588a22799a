use crate::domain::error::DomainError;
use crate::domain::ports::trade_source::TradeSource;
use async_trait::async_trait;
use std::time::Duration;

/// Dataset served over HTTP, fetched in full on every call.
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl TradeSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String, DomainError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DomainError::Network(format!("GET {} failed: {e}", self.url)))?;

        if !resp.status().is_success() {
            return Err(DomainError::Network(format!(
                "GET {} returned HTTP {}",
                self.url,
                resp.status()
            )));
        }

        resp.text()
            .await
            .map_err(|e| DomainError::Network(format!("reading {} failed: {e}", self.url)))
    }
}
