use crate::domain::values::break_type::BreakType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Party currently holding up a broken trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PendingWith {
    Legal,
    #[serde(rename = "Middle Office")]
    MiddleOffice,
    Client,
    #[serde(rename = "Front Office")]
    FrontOffice,
    #[serde(rename = "Trading Sales")]
    TradingSales,
}

impl PendingWith {
    /// Parties that can own a break of the given type.
    pub fn candidates(break_type: BreakType) -> &'static [PendingWith] {
        match break_type {
            BreakType::Economic => &[PendingWith::MiddleOffice, PendingWith::FrontOffice],
            BreakType::NonEconomic => &[
                PendingWith::Legal,
                PendingWith::Client,
                PendingWith::TradingSales,
            ],
        }
    }

    pub fn next_action_owner(&self) -> &'static str {
        match self {
            PendingWith::Legal => "Legal Counsel",
            PendingWith::MiddleOffice => "Middle Office Analyst",
            PendingWith::Client => "Client Relationship Manager",
            PendingWith::FrontOffice => "Front Office Trader",
            PendingWith::TradingSales => "Trading Sales Desk",
        }
    }

    pub fn break_classification(&self) -> &'static str {
        match self {
            PendingWith::Legal => "Documentation - Legal Terms",
            PendingWith::MiddleOffice => "Economic - Booking Mismatch",
            PendingWith::Client => "Documentation - Client Confirmation Outstanding",
            PendingWith::FrontOffice => "Economic - Trade Capture Error",
            PendingWith::TradingSales => "Process - Sales Allocation",
        }
    }
}

impl fmt::Display for PendingWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingWith::Legal => write!(f, "Legal"),
            PendingWith::MiddleOffice => write!(f, "Middle Office"),
            PendingWith::Client => write!(f, "Client"),
            PendingWith::FrontOffice => write!(f, "Front Office"),
            PendingWith::TradingSales => write!(f, "Trading Sales"),
        }
    }
}

impl FromStr for PendingWith {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "legal" => Ok(PendingWith::Legal),
            "middleoffice" => Ok(PendingWith::MiddleOffice),
            "client" => Ok(PendingWith::Client),
            "frontoffice" => Ok(PendingWith::FrontOffice),
            "tradingsales" => Ok(PendingWith::TradingSales),
            _ => Err(format!("Unknown pending-with party: {s}")),
        }
    }
}
