use crate::domain::values::break_type::BreakType;
use crate::domain::values::confirmation_status::ConfirmationStatus;
use crate::domain::values::fx_trade_status::FxTradeStatus;
use crate::domain::values::pending_with::PendingWith;
use crate::domain::values::queue_status::QueueStatus;
use crate::domain::values::risk_level::RiskLevel;
use crate::domain::values::side::Side;
use crate::domain::values::trade_kind::TradeKind;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Confirmation methods that match automatically on an electronic platform.
const ELECTRONIC_METHODS: [&str; 4] = ["swift", "electronic", "platform", "markitwire"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityTrade {
    pub trade_id: String,
    pub order_id: String,
    pub client_id: String,
    pub isin: String,
    pub symbol: String,
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
    pub trade_value: f64,
    pub currency: String,
    pub trade_date: NaiveDate,
    pub settlement_date: Option<NaiveDate>,
    pub settlement_status: String,
    pub counterparty: String,
    pub trading_venue: String,
    pub trader_name: String,
    pub kyc_status: String,
    pub reference_data_validated: bool,
    pub commission: f64,
    pub taxes: f64,
    pub total_cost: f64,
    pub confirmation_status: ConfirmationStatus,
    pub country_of_trade: String,
    pub ops_team_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxTrade {
    pub trade_id: String,
    pub trade_date: NaiveDate,
    pub value_date: Option<NaiveDate>,
    pub trading_party: String,
    pub counterparty: String,
    pub currency_pair: String,
    pub buy_sell: Side,
    pub dealt_currency: String,
    pub base_currency: String,
    pub term_currency: String,
    pub notional_amount: f64,
    pub price: f64,
    pub trade_status: FxTradeStatus,
    pub product_type: String,
    pub maturity_date: Option<NaiveDate>,
    pub confirmation_timestamp: String,
    pub settlement_date: Option<NaiveDate>,
    pub amendment_flag: bool,
    pub confirmation_method: String,
    pub confirmation_status: ConfirmationStatus,
    pub trader_id: String,
    pub kyc_check: String,
    pub sanctions_screening: String,
    pub exception_flag: bool,
    pub audit_trail_ref: String,
    pub legal_entity: String,
    pub booking_location: String,
    pub portfolio: String,
    pub trade_version: u32,
    pub cancellation_flag: bool,
    pub settlement_method: String,
    pub comments: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
}

impl FxTrade {
    pub fn is_electronic_confirmation(&self) -> bool {
        let method = self.confirmation_method.trim().to_lowercase();
        ELECTRONIC_METHODS.contains(&method.as_str())
    }

    pub fn is_forward(&self) -> bool {
        self.product_type.trim().eq_ignore_ascii_case("forward")
    }
}

/// Attributes derived after ingestion. The only part of a trade that changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    pub risk_level: RiskLevel,
    pub break_type: Option<BreakType>,
    pub pending_with: Option<PendingWith>,
    pub next_action_owner: Option<String>,
    pub break_classification: Option<String>,
    pub queue_status: QueueStatus,
    pub failure_reason: Option<String>,
    pub sent_to_settlements: bool,
    pub settlements_sent_at: Option<DateTime<Utc>>,
}

impl Enrichment {
    /// Break fields must be present exactly when the trade is Failed or Disputed.
    pub fn is_consistent_with(&self, status: ConfirmationStatus) -> bool {
        let has_break = self.break_type.is_some()
            && self.pending_with.is_some()
            && self.break_classification.is_some();
        let no_break = self.break_type.is_none()
            && self.pending_with.is_none()
            && self.break_classification.is_none();
        if status.is_break() {
            has_break
        } else {
            no_break
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tradeType", rename_all = "lowercase")]
pub enum Trade {
    Equity(EquityTrade),
    Fx(FxTrade),
}

impl Trade {
    pub fn trade_id(&self) -> &str {
        match self {
            Trade::Equity(t) => &t.trade_id,
            Trade::Fx(t) => &t.trade_id,
        }
    }

    pub fn kind(&self) -> TradeKind {
        match self {
            Trade::Equity(_) => TradeKind::Equity,
            Trade::Fx(_) => TradeKind::Fx,
        }
    }

    pub fn confirmation_status(&self) -> ConfirmationStatus {
        match self {
            Trade::Equity(t) => t.confirmation_status,
            Trade::Fx(t) => t.confirmation_status,
        }
    }

    pub fn counterparty(&self) -> &str {
        match self {
            Trade::Equity(t) => &t.counterparty,
            Trade::Fx(t) => &t.counterparty,
        }
    }

    pub fn trade_date(&self) -> NaiveDate {
        match self {
            Trade::Equity(t) => t.trade_date,
            Trade::Fx(t) => t.trade_date,
        }
    }

    /// Trade value for equities, notional for FX.
    pub fn value(&self) -> f64 {
        match self {
            Trade::Equity(t) => t.trade_value,
            Trade::Fx(t) => t.notional_amount,
        }
    }

    pub fn currencies(&self) -> Vec<&str> {
        match self {
            Trade::Equity(t) => vec![t.currency.as_str()],
            Trade::Fx(t) => vec![t.base_currency.as_str(), t.term_currency.as_str()],
        }
    }

    /// Trader name for equities, trader id for FX.
    pub fn trader(&self) -> &str {
        match self {
            Trade::Equity(t) => &t.trader_name,
            Trade::Fx(t) => &t.trader_id,
        }
    }

    pub fn enrichment(&self) -> Option<&Enrichment> {
        match self {
            Trade::Equity(t) => t.enrichment.as_ref(),
            Trade::Fx(t) => t.enrichment.as_ref(),
        }
    }

    pub fn enrichment_mut(&mut self) -> Option<&mut Enrichment> {
        match self {
            Trade::Equity(t) => t.enrichment.as_mut(),
            Trade::Fx(t) => t.enrichment.as_mut(),
        }
    }

    pub fn set_enrichment(&mut self, enrichment: Enrichment) {
        match self {
            Trade::Equity(t) => t.enrichment = Some(enrichment),
            Trade::Fx(t) => t.enrichment = Some(enrichment),
        }
    }

    pub fn sent_to_settlements(&self) -> bool {
        self.enrichment().is_some_and(|e| e.sent_to_settlements)
    }
}

impl From<EquityTrade> for Trade {
    fn from(t: EquityTrade) -> Self {
        Trade::Equity(t)
    }
}

impl From<FxTrade> for Trade {
    fn from(t: FxTrade) -> Self {
        Trade::Fx(t)
    }
}
