use crate::domain::entities::trade::{Enrichment, EquityTrade, FxTrade, Trade};
use crate::domain::ports::random_source::RandomSource;
use crate::domain::values::break_type::BreakType;
use crate::domain::values::confirmation_status::ConfirmationStatus;
use crate::domain::values::pending_with::PendingWith;
use crate::domain::values::queue_status::QueueStatus;
use crate::domain::values::risk_level::RiskLevel;

pub const POLICY_VERSION: u32 = 1;
pub const DEFAULT_ECONOMIC_BREAK_WEIGHT: f64 = 0.4;

const MAJOR_PAIRS: [&str; 7] = [
    "EUR/USD", "GBP/USD", "USD/JPY", "USD/CHF", "AUD/USD", "USD/CAD", "NZD/USD",
];

/// Rules that turn a freshly ingested trade into its derived attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentPolicy {
    pub version: u32,
    /// Probability that a break is Economic rather than Non-Economic.
    pub economic_break_weight: f64,
}

impl Default for EnrichmentPolicy {
    fn default() -> Self {
        Self {
            version: POLICY_VERSION,
            economic_break_weight: DEFAULT_ECONOMIC_BREAK_WEIGHT,
        }
    }
}

impl EnrichmentPolicy {
    pub fn with_break_weight(economic_break_weight: f64) -> Self {
        Self {
            economic_break_weight: economic_break_weight.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    /// Derives the enrichment for `trade`. Break fields are only drawn for Failed or
    /// Disputed trades; `failure_reason` is filled in later from the failure analysis.
    pub fn enrich(&self, trade: &Trade, rng: &mut dyn RandomSource) -> Enrichment {
        let status = trade.confirmation_status();
        let risk_level = match trade {
            Trade::Equity(t) => equity_risk(t),
            Trade::Fx(t) => fx_risk(t),
        };

        let (break_type, pending_with) = if status.is_break() {
            let (break_type, pending_with) = self.draw_break(rng);
            (Some(break_type), Some(pending_with))
        } else {
            (None, None)
        };

        let next_action_owner = match pending_with {
            Some(p) => Some(p.next_action_owner().to_string()),
            None if status == ConfirmationStatus::Pending => Some("Confirmations Team".to_string()),
            None => None,
        };

        Enrichment {
            risk_level,
            break_type,
            pending_with,
            next_action_owner,
            break_classification: pending_with.map(|p| p.break_classification().to_string()),
            queue_status: weighted(queue_weights(status), rng),
            failure_reason: None,
            sent_to_settlements: false,
            settlements_sent_at: None,
        }
    }

    /// Break type by weighted draw, then a pending-with party uniform over that type's candidates.
    pub fn draw_break(&self, rng: &mut dyn RandomSource) -> (BreakType, PendingWith) {
        let break_type = if rng.next_f64() < self.economic_break_weight {
            BreakType::Economic
        } else {
            BreakType::NonEconomic
        };
        let candidates = PendingWith::candidates(break_type);
        (break_type, candidates[rng.pick_index(candidates.len())])
    }
}

/// Severity of a break, graded on trade value or FX notional.
pub fn classify_impact(value: f64) -> RiskLevel {
    if value > 5_000_000.0 {
        RiskLevel::Critical
    } else if value > 1_000_000.0 {
        RiskLevel::High
    } else if value > 500_000.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn equity_risk(trade: &EquityTrade) -> RiskLevel {
    if trade.confirmation_status == ConfirmationStatus::Failed {
        return classify_impact(trade.trade_value);
    }
    let value = trade.trade_value;
    if value > 5_000_000.0 {
        RiskLevel::Critical
    } else if value > 1_000_000.0 {
        RiskLevel::High
    } else if value > 100_000.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn fx_risk(trade: &FxTrade) -> RiskLevel {
    if trade.confirmation_status == ConfirmationStatus::Disputed {
        return classify_impact(trade.notional_amount);
    }
    if trade.exception_flag {
        return RiskLevel::High;
    }
    let pair = trade.currency_pair.trim().to_uppercase();
    let mut level = if MAJOR_PAIRS.contains(&pair.as_str()) {
        RiskLevel::Low
    } else {
        RiskLevel::Medium
    };
    if trade.is_forward() {
        level = level.bump(RiskLevel::High);
    }
    if trade.amendment_flag {
        level = level.bump(RiskLevel::High);
    }
    level
}

fn queue_weights(status: ConfirmationStatus) -> &'static [(QueueStatus, f64)] {
    match status {
        ConfirmationStatus::Settled => &[(QueueStatus::Ccnr, 1.0)],
        ConfirmationStatus::Confirmed => &[
            (QueueStatus::Ccnr, 0.6),
            (QueueStatus::PendingApproval, 0.4),
        ],
        ConfirmationStatus::Pending => &[
            (QueueStatus::Matching, 0.45),
            (QueueStatus::Drafting, 0.45),
            (QueueStatus::PendingApproval, 0.1),
        ],
        ConfirmationStatus::Failed | ConfirmationStatus::Disputed => &[
            (QueueStatus::Matching, 0.5),
            (QueueStatus::Drafting, 0.3),
            (QueueStatus::PendingApproval, 0.2),
        ],
    }
}

/// Draws one value from a weighted table. Weights need not sum to one.
pub fn weighted<T: Copy>(table: &[(T, f64)], rng: &mut dyn RandomSource) -> T {
    let total: f64 = table.iter().map(|(_, w)| w).sum();
    let mut target = rng.next_f64() * total;
    for (value, weight) in table {
        if target < *weight {
            return *value;
        }
        target -= weight;
    }
    table[table.len() - 1].0
}
