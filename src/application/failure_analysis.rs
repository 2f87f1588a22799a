use crate::application::enrichment::{classify_impact, EnrichmentPolicy};
use crate::domain::entities::failure_analysis::{FailureAnalysis, FailureStatus};
use crate::domain::entities::trade::Trade;
use crate::domain::ports::random_source::RandomSource;
use crate::domain::values::break_type::BreakType;
use crate::domain::values::pending_with::PendingWith;
use chrono::Utc;
use uuid::Uuid;

struct Scenario {
    break_type: BreakType,
    pending_with: PendingWith,
    reason: &'static str,
    solution: &'static str,
    estimated_resolution_time: &'static str,
    assigned_to: &'static str,
    action_fields: &'static [&'static str],
}

const CATALOG: [Scenario; 7] = [
    Scenario {
        break_type: BreakType::Economic,
        pending_with: PendingWith::MiddleOffice,
        reason: "Price mismatch between booked trade and counterparty confirmation",
        solution: "Compare execution records with the counterparty and amend the booking or request a corrected confirmation",
        estimated_resolution_time: "4 hours",
        assigned_to: "Middle Office",
        action_fields: &["price", "tradeValue"],
    },
    Scenario {
        break_type: BreakType::Economic,
        pending_with: PendingWith::FrontOffice,
        reason: "Quantity or notional mismatch with counterparty records",
        solution: "Front office to verify the executed amount against the order and rebook if required",
        estimated_resolution_time: "1 day",
        assigned_to: "Front Office",
        action_fields: &["quantity", "notionalAmount"],
    },
    Scenario {
        break_type: BreakType::Economic,
        pending_with: PendingWith::MiddleOffice,
        reason: "Settlement date mismatch with counterparty confirmation",
        solution: "Agree the settlement date with the counterparty and update the trade",
        estimated_resolution_time: "1 day",
        assigned_to: "Middle Office",
        action_fields: &["settlementDate", "valueDate"],
    },
    Scenario {
        break_type: BreakType::NonEconomic,
        pending_with: PendingWith::Legal,
        reason: "Missing or non-standard legal terms in the confirmation",
        solution: "Legal to review the confirmation wording and issue an amended template",
        estimated_resolution_time: "3 days",
        assigned_to: "Legal",
        action_fields: &["legalEntity", "governingLaw"],
    },
    Scenario {
        break_type: BreakType::NonEconomic,
        pending_with: PendingWith::Client,
        reason: "Client has not responded to the confirmation request",
        solution: "Chase the client through the relationship manager and escalate after two reminders",
        estimated_resolution_time: "2 days",
        assigned_to: "Client Services",
        action_fields: &["counterparty", "confirmationMethod"],
    },
    Scenario {
        break_type: BreakType::NonEconomic,
        pending_with: PendingWith::TradingSales,
        reason: "Standing settlement instructions do not match",
        solution: "Obtain updated SSIs from the client and refresh static data",
        estimated_resolution_time: "1 day",
        assigned_to: "Trading Sales",
        action_fields: &["settlementMethod", "bookingLocation"],
    },
    Scenario {
        break_type: BreakType::NonEconomic,
        pending_with: PendingWith::Legal,
        reason: "Master agreement not signed with the counterparty",
        solution: "Legal to finalise and execute the master agreement before confirmation",
        estimated_resolution_time: "5 days",
        assigned_to: "Legal",
        action_fields: &["legalEntity", "clientId"],
    },
];

/// Builds the break analysis for a Failed or Disputed trade, and `None` for any other
/// status.
///
/// Break type and pending-with come from the trade's enrichment; a trade without them
/// gets a fresh draw from `policy`. The scenario is drawn from those matching both,
/// falling back to break type alone, then to the whole catalog.
pub fn generate(
    trade: &Trade,
    policy: &EnrichmentPolicy,
    rng: &mut dyn RandomSource,
) -> Option<FailureAnalysis> {
    if !trade.confirmation_status().is_break() {
        return None;
    }
    let enriched = trade
        .enrichment()
        .and_then(|e| e.break_type.zip(e.pending_with));
    let (break_type, pending_with) = match enriched {
        Some(fields) => fields,
        None => policy.draw_break(rng),
    };

    let exact: Vec<&Scenario> = CATALOG
        .iter()
        .filter(|s| s.break_type == break_type && s.pending_with == pending_with)
        .collect();
    let candidates = if !exact.is_empty() {
        exact
    } else {
        let by_type: Vec<&Scenario> = CATALOG.iter().filter(|s| s.break_type == break_type).collect();
        if by_type.is_empty() {
            CATALOG.iter().collect()
        } else {
            by_type
        }
    };
    let scenario = candidates[rng.pick_index(candidates.len())];

    Some(FailureAnalysis {
        id: Uuid::new_v4().to_string(),
        trade_id: trade.trade_id().to_string(),
        trade_kind: trade.kind(),
        break_type,
        reason: scenario.reason.to_string(),
        solution: scenario.solution.to_string(),
        estimated_resolution_time: scenario.estimated_resolution_time.to_string(),
        assigned_to: scenario.assigned_to.to_string(),
        pending_with,
        next_action_owner: pending_with.next_action_owner().to_string(),
        break_classification: pending_with.break_classification().to_string(),
        action_fields: scenario.action_fields.iter().map(|f| f.to_string()).collect(),
        impact: classify_impact(trade.value()),
        status: FailureStatus::Open,
        created_at: Utc::now(),
        resolved_at: None,
        escalated_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::enrichment::tests::{equity, ScriptedRandom};
    use crate::domain::values::confirmation_status::ConfirmationStatus;
    use crate::domain::values::risk_level::RiskLevel;

    fn enriched(status: ConfirmationStatus, value: f64, draws: &[f64]) -> Trade {
        let mut trade = Trade::Equity(equity("T1", status, value));
        let e = EnrichmentPolicy::default().enrich(&trade, &mut ScriptedRandom::new(draws));
        trade.set_enrichment(e);
        trade
    }

    #[test]
    fn only_breaks_get_an_analysis() {
        let policy = EnrichmentPolicy::default();
        let mut rng = ScriptedRandom::new(&[0.2]);
        for status in [ConfirmationStatus::Confirmed, ConfirmationStatus::Pending, ConfirmationStatus::Settled] {
            assert!(generate(&enriched(status, 1.0, &[0.2]), &policy, &mut rng).is_none());
        }
        assert!(generate(&enriched(ConfirmationStatus::Failed, 1.0, &[0.2]), &policy, &mut rng).is_some());
    }

    #[test]
    fn scenario_matches_enrichment() {
        // Non-Economic, pending with Client
        let trade = enriched(ConfirmationStatus::Failed, 6_000_000.0, &[0.9, 0.5, 0.1]);
        let analysis = generate(&trade, &EnrichmentPolicy::default(), &mut ScriptedRandom::new(&[0.0])).unwrap();
        assert_eq!(analysis.break_type, BreakType::NonEconomic);
        assert_eq!(analysis.pending_with, PendingWith::Client);
        assert_eq!(analysis.assigned_to, "Client Services");
        assert_eq!(analysis.impact, RiskLevel::Critical);
        assert_eq!(analysis.status, FailureStatus::Open);
        assert_eq!(analysis.trade_id, "T1");
    }

    #[test]
    fn legal_breaks_draw_between_two_scenarios() {
        // Non-Economic, pending with Legal
        let trade = enriched(ConfirmationStatus::Failed, 10.0, &[0.9, 0.0, 0.1]);
        let first = generate(&trade, &EnrichmentPolicy::default(), &mut ScriptedRandom::new(&[0.0])).unwrap();
        let second = generate(&trade, &EnrichmentPolicy::default(), &mut ScriptedRandom::new(&[0.99])).unwrap();
        assert_ne!(first.reason, second.reason);
        assert!(first.pending_with == PendingWith::Legal && second.pending_with == PendingWith::Legal);
    }

    #[test]
    fn unenriched_break_draws_its_own_fields() {
        let policy = EnrichmentPolicy::default();
        // Economic, then Front Office of the two candidates, then the only matching scenario
        let trade = Trade::Equity(equity("T1", ConfirmationStatus::Failed, 10.0));
        let analysis = generate(&trade, &policy, &mut ScriptedRandom::new(&[0.1, 0.9, 0.0])).unwrap();
        assert_eq!(analysis.break_type, BreakType::Economic);
        assert_eq!(analysis.pending_with, PendingWith::FrontOffice);
        assert_eq!(analysis.assigned_to, "Front Office");

        let pending = Trade::Equity(equity("T2", ConfirmationStatus::Pending, 10.0));
        assert!(generate(&pending, &policy, &mut ScriptedRandom::new(&[0.0])).is_none());
    }
}
