use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Duplicate trade id: {0}")]
    Duplicate(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Input is empty")]
    EmptyInput,

    #[error("No data rows found after the header")]
    NoData,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Database(e.to_string())
    }
}

impl From<csv::Error> for DomainError {
    fn from(e: csv::Error) -> Self {
        DomainError::Parse(e.to_string())
    }
}

impl From<&str> for DomainError {
    fn from(s: &str) -> Self {
        DomainError::InvalidInput(s.to_string())
    }
}
