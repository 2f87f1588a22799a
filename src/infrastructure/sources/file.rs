use crate::domain::error::DomainError;
use crate::domain::ports::trade_source::TradeSource;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TradeSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, DomainError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DomainError::Network(format!("failed to read {}: {e}", self.path.display())))
    }
}
