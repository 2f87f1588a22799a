use crate::domain::values::trade_kind::TradeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a trade's confirmation.
///
/// One enum covers both asset classes; [`ConfirmationStatus::allowed_for`] holds the
/// per-variant subset that ingestion enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfirmationStatus {
    Confirmed,
    Pending,
    Failed,
    Settled,
    Disputed,
}

impl ConfirmationStatus {
    pub const ALL: [ConfirmationStatus; 5] = [
        ConfirmationStatus::Confirmed,
        ConfirmationStatus::Pending,
        ConfirmationStatus::Failed,
        ConfirmationStatus::Settled,
        ConfirmationStatus::Disputed,
    ];

    /// Failed and Disputed trades carry a break and get a failure analysis.
    pub fn is_break(&self) -> bool {
        matches!(self, ConfirmationStatus::Failed | ConfirmationStatus::Disputed)
    }

    pub fn allowed_for(&self, kind: TradeKind) -> bool {
        match kind {
            TradeKind::Equity => !matches!(self, ConfirmationStatus::Disputed),
            TradeKind::Fx => matches!(
                self,
                ConfirmationStatus::Confirmed
                    | ConfirmationStatus::Pending
                    | ConfirmationStatus::Disputed
            ),
        }
    }
}

impl fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmationStatus::Confirmed => write!(f, "Confirmed"),
            ConfirmationStatus::Pending => write!(f, "Pending"),
            ConfirmationStatus::Failed => write!(f, "Failed"),
            ConfirmationStatus::Settled => write!(f, "Settled"),
            ConfirmationStatus::Disputed => write!(f, "Disputed"),
        }
    }
}

impl FromStr for ConfirmationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(ConfirmationStatus::Confirmed),
            "pending" => Ok(ConfirmationStatus::Pending),
            "failed" => Ok(ConfirmationStatus::Failed),
            "settled" => Ok(ConfirmationStatus::Settled),
            "disputed" => Ok(ConfirmationStatus::Disputed),
            _ => Err(format!("Unknown confirmation status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equity_rejects_disputed() {
        assert!(!ConfirmationStatus::Disputed.allowed_for(TradeKind::Equity));
        assert!(ConfirmationStatus::Settled.allowed_for(TradeKind::Equity));
    }

    #[test]
    fn fx_rejects_failed_and_settled() {
        assert!(!ConfirmationStatus::Failed.allowed_for(TradeKind::Fx));
        assert!(!ConfirmationStatus::Settled.allowed_for(TradeKind::Fx));
        assert!(ConfirmationStatus::Disputed.allowed_for(TradeKind::Fx));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(" failed ".parse::<ConfirmationStatus>(), Ok(ConfirmationStatus::Failed));
        assert!("unknown".parse::<ConfirmationStatus>().is_err());
    }
}
