use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Booking state of an FX trade, tracked separately from its confirmation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FxTradeStatus {
    Booked,
    Confirmed,
    Settled,
    Cancelled,
}

impl fmt::Display for FxTradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FxTradeStatus::Booked => write!(f, "Booked"),
            FxTradeStatus::Confirmed => write!(f, "Confirmed"),
            FxTradeStatus::Settled => write!(f, "Settled"),
            FxTradeStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for FxTradeStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "booked" => Ok(FxTradeStatus::Booked),
            "confirmed" => Ok(FxTradeStatus::Confirmed),
            "settled" => Ok(FxTradeStatus::Settled),
            "cancelled" | "canceled" => Ok(FxTradeStatus::Cancelled),
            _ => Err(format!("Unknown FX trade status: {s}")),
        }
    }
}
