use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Economic breaks affect trade value; non-economic ones are documentation or process gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakType {
    Economic,
    #[serde(rename = "Non-Economic")]
    NonEconomic,
}

impl fmt::Display for BreakType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakType::Economic => write!(f, "Economic"),
            BreakType::NonEconomic => write!(f, "Non-Economic"),
        }
    }
}

impl FromStr for BreakType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "economic" => Ok(BreakType::Economic),
            "noneconomic" => Ok(BreakType::NonEconomic),
            _ => Err(format!("Unknown break type: {s}")),
        }
    }
}
