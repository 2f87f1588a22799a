use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow bucket a trade currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueStatus {
    Drafting,
    Matching,
    #[serde(rename = "Pending Approval", alias = "Pending Client Confirmation")]
    PendingApproval,
    /// Complete, no confirmation required.
    #[serde(rename = "CCNR")]
    Ccnr,
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueStatus::Drafting => write!(f, "Drafting"),
            QueueStatus::Matching => write!(f, "Matching"),
            QueueStatus::PendingApproval => write!(f, "Pending Approval"),
            QueueStatus::Ccnr => write!(f, "CCNR"),
        }
    }
}

impl FromStr for QueueStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "drafting" => Ok(QueueStatus::Drafting),
            "matching" => Ok(QueueStatus::Matching),
            "pendingapproval" | "pendingclientconfirmation" => Ok(QueueStatus::PendingApproval),
            "ccnr" => Ok(QueueStatus::Ccnr),
            _ => Err(format!("Unknown queue status: {s}")),
        }
    }
}
