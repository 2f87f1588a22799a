use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeKind {
    Equity,
    Fx,
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeKind::Equity => write!(f, "equity"),
            TradeKind::Fx => write!(f, "fx"),
        }
    }
}

impl FromStr for TradeKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equity" => Ok(TradeKind::Equity),
            "fx" => Ok(TradeKind::Fx),
            _ => Err(format!("Unknown trade kind: {s}")),
        }
    }
}
