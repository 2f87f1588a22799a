use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How far a trade's document pack has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentBucket {
    Complete,
    Pending,
    Missing,
}

impl fmt::Display for DocumentBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentBucket::Complete => write!(f, "complete"),
            DocumentBucket::Pending => write!(f, "pending"),
            DocumentBucket::Missing => write!(f, "missing"),
        }
    }
}

impl FromStr for DocumentBucket {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "complete" => Ok(DocumentBucket::Complete),
            "pending" => Ok(DocumentBucket::Pending),
            "missing" => Ok(DocumentBucket::Missing),
            _ => Err(format!("Unknown document status: {s}")),
        }
    }
}
