//! Shared test helpers.
#![allow(dead_code)]

use confirmdesk::application::enrichment::EnrichmentPolicy;
use confirmdesk::domain::ports::random_source::RandomSource;
use confirmdesk::infrastructure::sources::inline::InlineSource;
use confirmdesk::ConfirmDesk;
use std::collections::VecDeque;
use std::sync::Arc;

pub const EQUITY_HEADER: &str = "trade_id,order_id,client_id,isin,symbol,trade_type,quantity,price,trade_value,currency,trade_date,settlement_date,settlement_status,counterparty,trading_venue,trader_name,kyc_status,reference_data_validated,commission,taxes,total_cost,confirmation_status,country_of_trade,ops_team_notes";

pub const FX_HEADER: &str = "trade_id,trade_date,value_date,trading_party,counterparty,currency_pair,buy_sell,dealt_currency,base_currency,term_currency,notional_amount,price,trade_status,product_type,maturity_date,confirmation_timestamp,settlement_date,amendment_flag,confirmation_method,confirmation_status,trader_id,kyc_check,sanctions_screening,exception_flag,audit_trail_ref,legal_entity,booking_location,portfolio,trade_version,cancellation_flag,settlement_method,comments";

/// Replays fixed draws, then keeps returning the last one.
pub struct ScriptedRandom {
    draws: VecDeque<f64>,
    last: f64,
}

impl ScriptedRandom {
    pub fn new(draws: &[f64]) -> Self {
        Self {
            draws: draws.iter().copied().collect(),
            last: 0.0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if let Some(x) = self.draws.pop_front() {
            self.last = x;
        }
        self.last
    }
}

pub fn equity_row(id: &str, status: &str, value: f64, counterparty: &str, date: &str) -> String {
    format!(
        "{id},O-{id},CL-1,US0378331005,AAPL,Buy,100,{price},{value},USD,{date},,Pending,{counterparty},NASDAQ,Alice Smith,Verified,Yes,10,2,{value},{status},US,",
        price = value / 100.0,
    )
}

pub fn fx_row(id: &str, status: &str, pair: &str, method: &str) -> String {
    let (base, term) = pair.split_once('/').unwrap();
    format!(
        "{id},2024-03-15,2024-03-19,Bank A,Citi,{pair},Sell,{base},{base},{term},2500000,1.0850,Booked,Spot,,2024-03-15T10:00:00Z,2024-03-19,No,{method},{status},TRD042,Passed,Clear,No,AUD-1,Bank A London,London,Macro,1,No,CLS,"
    )
}

pub fn equity_csv(rows: &[String]) -> String {
    format!("{EQUITY_HEADER}\n{}\n", rows.join("\n"))
}

pub fn fx_csv(rows: &[String]) -> String {
    format!("{FX_HEADER}\n{}\n", rows.join("\n"))
}

/// Desk over an in-memory database, fed from the given CSV text.
pub fn setup_with(equity: String, fx: String, draws: &[f64]) -> ConfirmDesk {
    ConfirmDesk::with_parts(
        ":memory:",
        EnrichmentPolicy::default(),
        Box::new(ScriptedRandom::new(draws)),
        Arc::new(InlineSource::new("equity", equity)),
        Arc::new(InlineSource::new("fx", fx)),
    )
    .unwrap()
}

pub fn setup() -> ConfirmDesk {
    setup_with(String::new(), String::new(), &[0.5])
}
