use crate::application::store::ConfirmationStore;
use crate::domain::entities::trade::Trade;
use crate::domain::values::break_type::BreakType;
use crate::domain::values::confirmation_status::ConfirmationStatus;
use crate::domain::values::document_bucket::DocumentBucket;
use crate::domain::values::pending_with::PendingWith;
use crate::domain::values::queue_status::QueueStatus;
use crate::domain::values::risk_level::RiskLevel;
use crate::domain::values::trade_kind::TradeKind;
use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeTypeFilter {
    #[default]
    All,
    Equity,
    Fx,
}

impl TradeTypeFilter {
    pub fn accepts(&self, kind: TradeKind) -> bool {
        match self {
            TradeTypeFilter::All => true,
            TradeTypeFilter::Equity => kind == TradeKind::Equity,
            TradeTypeFilter::Fx => kind == TradeKind::Fx,
        }
    }
}

impl fmt::Display for TradeTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeTypeFilter::All => write!(f, "all"),
            TradeTypeFilter::Equity => write!(f, "equity"),
            TradeTypeFilter::Fx => write!(f, "fx"),
        }
    }
}

impl FromStr for TradeTypeFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TradeTypeFilter::All),
            "equity" => Ok(TradeTypeFilter::Equity),
            "fx" => Ok(TradeTypeFilter::Fx),
            _ => Err(format!("Unknown trade type: {s}")),
        }
    }
}

/// Dashboard filter. Every criterion that is set must match.
/// Dashboard filter. Unset and empty criteria (`?status=`) match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    #[serde(deserialize_with = "empty_as_default")]
    pub trade_type: TradeTypeFilter,
    #[serde(deserialize_with = "empty_as_none")]
    pub status: Option<ConfirmationStatus>,
    #[serde(deserialize_with = "empty_as_none")]
    pub counterparty: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(deserialize_with = "empty_as_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(deserialize_with = "empty_as_none")]
    pub currency: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub trader: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(deserialize_with = "empty_as_none")]
    pub document_status: Option<DocumentBucket>,
    #[serde(deserialize_with = "empty_as_none")]
    pub break_type: Option<BreakType>,
    #[serde(deserialize_with = "empty_as_none")]
    pub pending_with: Option<PendingWith>,
    #[serde(deserialize_with = "empty_as_none")]
    pub queue_status: Option<QueueStatus>,
}

/// Query values arrive as text; blank ones are treated as absent.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

fn empty_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    Ok(empty_as_none(deserializer)?.unwrap_or_default())
}

fn text_guard(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().map(str::trim).filter(|c| !c.is_empty())
}

impl FilterCriteria {
    pub fn matches(&self, trade: &Trade, bucket: DocumentBucket) -> bool {
        if !self.trade_type.accepts(trade.kind()) {
            return false;
        }
        if self.status.is_some_and(|s| s != trade.confirmation_status()) {
            return false;
        }
        if text_guard(&self.counterparty).is_some_and(|c| c != trade.counterparty()) {
            return false;
        }
        if self.date_from.is_some_and(|d| trade.trade_date() < d) {
            return false;
        }
        if self.date_to.is_some_and(|d| trade.trade_date() > d) {
            return false;
        }
        if let Some(currency) = text_guard(&self.currency) {
            if !trade.currencies().contains(&currency) {
                return false;
            }
        }
        if text_guard(&self.trader).is_some_and(|t| t != trade.trader()) {
            return false;
        }
        if self.document_status.is_some_and(|b| b != bucket) {
            return false;
        }

        let enrichment = trade.enrichment();
        if let Some(level) = self.risk_level {
            if enrichment.map(|e| e.risk_level) != Some(level) {
                return false;
            }
        }
        if let Some(bt) = self.break_type {
            if enrichment.and_then(|e| e.break_type) != Some(bt) {
                return false;
            }
        }
        if let Some(pw) = self.pending_with {
            if enrichment.and_then(|e| e.pending_with) != Some(pw) {
                return false;
            }
        }
        if let Some(qs) = self.queue_status {
            if enrichment.map(|e| e.queue_status) != Some(qs) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, store: &'a ConfirmationStore) -> Vec<&'a Trade> {
        store
            .trades()
            .iter()
            .filter(|t| self.matches(t, store.document_bucket(t.trade_id())))
            .collect()
    }
}

/// Distinct values offered as filter options.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub counterparties: Vec<String>,
    pub currencies: Vec<String>,
    pub traders: Vec<String>,
}

pub fn facets(trades: &[Trade]) -> Facets {
    let mut counterparties = BTreeSet::new();
    let mut currencies = BTreeSet::new();
    let mut traders = BTreeSet::new();
    for trade in trades {
        counterparties.insert(trade.counterparty().to_string());
        currencies.extend(trade.currencies().into_iter().map(str::to_string));
        traders.insert(trade.trader().to_string());
    }
    let clean = |set: BTreeSet<String>| set.into_iter().filter(|s| !s.is_empty()).collect();
    Facets {
        counterparties: clean(counterparties),
        currencies: clean(currencies),
        traders: clean(traders),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total: usize,
    pub equity: usize,
    pub fx: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_risk_level: BTreeMap<String, usize>,
    pub by_queue_status: BTreeMap<String, usize>,
    pub by_document_status: BTreeMap<String, usize>,
    pub open_failures: usize,
}

pub fn summarize(store: &ConfirmationStore, criteria: &FilterCriteria) -> DashboardSummary {
    let mut summary = DashboardSummary::default();
    for trade in criteria.apply(store) {
        summary.total += 1;
        match trade.kind() {
            TradeKind::Equity => summary.equity += 1,
            TradeKind::Fx => summary.fx += 1,
        }
        *summary
            .by_status
            .entry(trade.confirmation_status().to_string())
            .or_default() += 1;
        *summary
            .by_document_status
            .entry(store.document_bucket(trade.trade_id()).to_string())
            .or_default() += 1;
        if let Some(e) = trade.enrichment() {
            *summary.by_risk_level.entry(e.risk_level.to_string()).or_default() += 1;
            *summary.by_queue_status.entry(e.queue_status.to_string()).or_default() += 1;
        }
        if store.failure(trade.trade_id()).is_some_and(|f| f.is_open()) {
            summary.open_failures += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::enrichment::tests::{equity, fx, ScriptedRandom};
    use crate::application::enrichment::EnrichmentPolicy;

    fn loaded_store() -> ConfirmationStore {
        let mut store = ConfirmationStore::new(EnrichmentPolicy::default(), Box::new(ScriptedRandom::new(&[0.3])));
        let mut e2 = equity("E2", ConfirmationStatus::Failed, 2_000_000.0);
        e2.counterparty = "Morgan Stanley".into();
        e2.currency = "GBP".into();
        e2.trade_date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        store.import(vec![
            Trade::Equity(equity("E1", ConfirmationStatus::Failed, 200.0)),
            Trade::Equity(e2),
            Trade::Equity(equity("E3", ConfirmationStatus::Settled, 200.0)),
            Trade::Fx(fx("F1", ConfirmationStatus::Pending, "USD/JPY", "SWIFT")),
        ]);
        store
    }

    fn ids(trades: Vec<&Trade>) -> Vec<&str> {
        trades.into_iter().map(|t| t.trade_id()).collect()
    }

    #[test]
    fn empty_criteria_matches_everything() {
        let store = loaded_store();
        assert_eq!(FilterCriteria::default().apply(&store).len(), 4);
    }

    #[test]
    fn blank_criteria_are_ignored() {
        let store = loaded_store();
        let blank: FilterCriteria = serde_json::from_value(serde_json::json!({
            "tradeType": "",
            "status": "",
            "counterparty": "",
            "dateFrom": " ",
            "riskLevel": "",
            "queueStatus": ""
        }))
        .unwrap();
        assert_eq!(blank, FilterCriteria::default());

        let spaces = FilterCriteria {
            counterparty: Some("  ".into()),
            currency: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(spaces.apply(&store).len(), 4);

        let parsed: FilterCriteria = serde_json::from_value(serde_json::json!({
            "status": "failed",
            "breakType": "Non-Economic"
        }))
        .unwrap();
        assert_eq!(parsed.status, Some(ConfirmationStatus::Failed));
        assert_eq!(parsed.break_type, Some(BreakType::NonEconomic));
    }

    #[test]
    fn criteria_are_conjunctive() {
        let store = loaded_store();
        let criteria = FilterCriteria {
            status: Some(ConfirmationStatus::Failed),
            counterparty: Some("Goldman Sachs".into()),
            ..Default::default()
        };
        assert_eq!(ids(criteria.apply(&store)), vec!["E1"]);
    }

    #[test]
    fn trade_type_and_currency() {
        let store = loaded_store();
        let fx_only = FilterCriteria {
            trade_type: TradeTypeFilter::Fx,
            ..Default::default()
        };
        assert_eq!(ids(fx_only.apply(&store)), vec!["F1"]);

        let jpy = FilterCriteria {
            currency: Some("JPY".into()),
            ..Default::default()
        };
        assert_eq!(ids(jpy.apply(&store)), vec!["F1"]);

        let usd_equity = FilterCriteria {
            trade_type: TradeTypeFilter::Equity,
            currency: Some("USD".into()),
            ..Default::default()
        };
        assert_eq!(ids(usd_equity.apply(&store)), vec!["E1", "E3"]);
    }

    #[test]
    fn inclusive_date_range() {
        let store = loaded_store();
        let criteria = FilterCriteria {
            date_from: NaiveDate::from_ymd_opt(2024, 4, 1),
            date_to: NaiveDate::from_ymd_opt(2024, 4, 1),
            ..Default::default()
        };
        assert_eq!(ids(criteria.apply(&store)), vec!["E2"]);
    }

    #[test]
    fn document_bucket_and_risk() {
        let store = loaded_store();
        let complete = FilterCriteria {
            document_status: Some(DocumentBucket::Complete),
            ..Default::default()
        };
        assert_eq!(ids(complete.apply(&store)), vec!["E3"]);

        let high = FilterCriteria {
            risk_level: Some(RiskLevel::High),
            ..Default::default()
        };
        assert_eq!(ids(high.apply(&store)), vec!["E2"]);
    }

    #[test]
    fn break_filters_exclude_clean_trades() {
        let store = loaded_store();
        let economic = FilterCriteria {
            break_type: Some(BreakType::Economic),
            ..Default::default()
        };
        assert_eq!(ids(economic.apply(&store)), vec!["E1", "E2"]);
    }

    #[test]
    fn deserializes_from_query_keys() {
        let criteria: FilterCriteria = serde_json::from_str(
            r#"{"tradeType":"equity","status":"Failed","documentStatus":"pending","dateFrom":"2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(criteria.trade_type, TradeTypeFilter::Equity);
        assert_eq!(criteria.status, Some(ConfirmationStatus::Failed));
        assert_eq!(criteria.document_status, Some(DocumentBucket::Pending));
        assert_eq!(criteria.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn facets_are_sorted_and_distinct() {
        let store = loaded_store();
        let f = facets(store.trades());
        assert_eq!(f.counterparties, vec!["Deutsche Bank", "Goldman Sachs", "Morgan Stanley"]);
        assert_eq!(f.currencies, vec!["GBP", "JPY", "USD"]);
        assert_eq!(f.traders, vec!["Alice", "TR-7"]);
    }

    #[test]
    fn summary_counts_filtered_view() {
        let store = loaded_store();
        let summary = summarize(&store, &FilterCriteria::default());
        assert_eq!(summary.total, 4);
        assert_eq!(summary.equity, 3);
        assert_eq!(summary.by_status.get("Failed"), Some(&2));
        assert_eq!(summary.open_failures, 2);
    }
}
