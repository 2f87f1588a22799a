use crate::domain::error::DomainError;
use crate::domain::values::break_type::BreakType;
use crate::domain::values::pending_with::PendingWith;
use crate::domain::values::risk_level::RiskLevel;
use crate::domain::values::trade_kind::TradeKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureStatus {
    Open,
    Resolved,
    Escalated,
}

impl fmt::Display for FailureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStatus::Open => write!(f, "Open"),
            FailureStatus::Resolved => write!(f, "Resolved"),
            FailureStatus::Escalated => write!(f, "Escalated"),
        }
    }
}

/// Break analysis for a Failed or Disputed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureAnalysis {
    pub id: String,
    pub trade_id: String,
    pub trade_kind: TradeKind,
    pub break_type: BreakType,
    pub reason: String,
    pub solution: String,
    pub estimated_resolution_time: String,
    pub assigned_to: String,
    pub pending_with: PendingWith,
    pub next_action_owner: String,
    pub break_classification: String,
    pub action_fields: Vec<String>,
    pub impact: RiskLevel,
    pub status: FailureStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub escalated_at: Option<DateTime<Utc>>,
}

impl FailureAnalysis {
    pub fn is_open(&self) -> bool {
        self.status == FailureStatus::Open
    }

    pub fn resolve(&mut self) -> Result<(), DomainError> {
        self.ensure_open(FailureStatus::Resolved)?;
        self.status = FailureStatus::Resolved;
        self.resolved_at = Some(Utc::now());
        Ok(())
    }

    pub fn escalate(&mut self) -> Result<(), DomainError> {
        self.ensure_open(FailureStatus::Escalated)?;
        self.status = FailureStatus::Escalated;
        self.escalated_at = Some(Utc::now());
        Ok(())
    }

    fn ensure_open(&self, target: FailureStatus) -> Result<(), DomainError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition(format!(
                "failure analysis for {} is {} and cannot become {}",
                self.trade_id, self.status, target
            )))
        }
    }
}
