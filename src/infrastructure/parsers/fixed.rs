//! Position-based parsing of the two lifecycle datasets.
//!
//! Column order is fixed by the dataset schema, so fields are read by index and the
//! header row is only skipped. Rows shorter than the schema minimum are dropped.

use super::{parse_amount, parse_date, parse_flag, read_sheet};
use crate::domain::entities::trade::{EquityTrade, FxTrade};
use crate::domain::error::DomainError;
use crate::domain::values::confirmation_status::ConfirmationStatus;
use crate::domain::values::fx_trade_status::FxTradeStatus;
use crate::domain::values::side::Side;
use crate::domain::values::trade_kind::TradeKind;
use csv::StringRecord;
use tracing::{debug, warn};

pub const EQUITY_MIN_COLUMNS: usize = 24;
pub const FX_MIN_COLUMNS: usize = 32;

mod equity_col {
    pub const TRADE_ID: usize = 0;
    pub const ORDER_ID: usize = 1;
    pub const CLIENT_ID: usize = 2;
    pub const ISIN: usize = 3;
    pub const SYMBOL: usize = 4;
    pub const SIDE: usize = 5;
    pub const QUANTITY: usize = 6;
    pub const PRICE: usize = 7;
    pub const TRADE_VALUE: usize = 8;
    pub const CURRENCY: usize = 9;
    pub const TRADE_DATE: usize = 10;
    pub const SETTLEMENT_DATE: usize = 11;
    pub const SETTLEMENT_STATUS: usize = 12;
    pub const COUNTERPARTY: usize = 13;
    pub const TRADING_VENUE: usize = 14;
    pub const TRADER_NAME: usize = 15;
    pub const KYC_STATUS: usize = 16;
    pub const REFERENCE_DATA_VALIDATED: usize = 17;
    pub const COMMISSION: usize = 18;
    pub const TAXES: usize = 19;
    pub const TOTAL_COST: usize = 20;
    pub const CONFIRMATION_STATUS: usize = 21;
    pub const COUNTRY_OF_TRADE: usize = 22;
    pub const OPS_TEAM_NOTES: usize = 23;
}

mod fx_col {
    pub const TRADE_ID: usize = 0;
    pub const TRADE_DATE: usize = 1;
    pub const VALUE_DATE: usize = 2;
    pub const TRADING_PARTY: usize = 3;
    pub const COUNTERPARTY: usize = 4;
    pub const CURRENCY_PAIR: usize = 5;
    pub const BUY_SELL: usize = 6;
    pub const DEALT_CURRENCY: usize = 7;
    pub const BASE_CURRENCY: usize = 8;
    pub const TERM_CURRENCY: usize = 9;
    pub const NOTIONAL_AMOUNT: usize = 10;
    pub const PRICE: usize = 11;
    pub const TRADE_STATUS: usize = 12;
    pub const PRODUCT_TYPE: usize = 13;
    pub const MATURITY_DATE: usize = 14;
    pub const CONFIRMATION_TIMESTAMP: usize = 15;
    pub const SETTLEMENT_DATE: usize = 16;
    pub const AMENDMENT_FLAG: usize = 17;
    pub const CONFIRMATION_METHOD: usize = 18;
    pub const CONFIRMATION_STATUS: usize = 19;
    pub const TRADER_ID: usize = 20;
    pub const KYC_CHECK: usize = 21;
    pub const SANCTIONS_SCREENING: usize = 22;
    pub const EXCEPTION_FLAG: usize = 23;
    pub const AUDIT_TRAIL_REF: usize = 24;
    pub const LEGAL_ENTITY: usize = 25;
    pub const BOOKING_LOCATION: usize = 26;
    pub const PORTFOLIO: usize = 27;
    pub const TRADE_VERSION: usize = 28;
    pub const CANCELLATION_FLAG: usize = 29;
    pub const SETTLEMENT_METHOD: usize = 30;
    pub const COMMENTS: usize = 31;
}

/// Row view that knows its line number and trade id for diagnostics.
struct Row<'a> {
    record: &'a StringRecord,
    line: usize,
    trade_id: &'a str,
}

impl<'a> Row<'a> {
    fn text(&self, idx: usize) -> String {
        self.record.get(idx).unwrap_or("").to_string()
    }

    fn amount(&self, idx: usize, field: &str) -> f64 {
        let raw = self.record.get(idx).unwrap_or("");
        parse_amount(raw).unwrap_or_else(|| {
            warn!(line = self.line, trade_id = self.trade_id, field, raw, "unparseable amount, using 0");
            0.0
        })
    }

    fn flag(&self, idx: usize) -> bool {
        parse_flag(self.record.get(idx).unwrap_or(""))
    }

    fn side(&self, idx: usize) -> Side {
        let raw = self.record.get(idx).unwrap_or("");
        raw.parse().unwrap_or_else(|_| {
            warn!(line = self.line, trade_id = self.trade_id, raw, "unknown side, using Buy");
            Side::Buy
        })
    }

    fn status(&self, idx: usize, kind: TradeKind) -> Option<ConfirmationStatus> {
        let raw = self.record.get(idx).unwrap_or("");
        match raw.parse::<ConfirmationStatus>() {
            Ok(status) if status.allowed_for(kind) => Some(status),
            _ => {
                warn!(line = self.line, trade_id = self.trade_id, raw, %kind, "invalid confirmation status, skipping row");
                None
            }
        }
    }
}

/// Opens a row for reading if it is wide enough and carries a trade id.
fn open_row(record: &StringRecord, line: usize, min_columns: usize, kind: TradeKind) -> Option<Row<'_>> {
    if record.len() < min_columns {
        debug!(line, columns = record.len(), min_columns, %kind, "skipping short row");
        return None;
    }
    let trade_id = record.get(0).unwrap_or("");
    if trade_id.is_empty() {
        warn!(line, %kind, "skipping row without a trade id");
        return None;
    }
    Some(Row { record, line, trade_id })
}

pub fn parse_equity(text: &str) -> Result<Vec<EquityTrade>, DomainError> {
    let (_, rows) = read_sheet(text)?;
    let trades: Vec<EquityTrade> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, record)| equity_from_record(record, i + 2))
        .collect();
    debug!(rows = rows.len(), parsed = trades.len(), "parsed equity dataset");
    Ok(trades)
}

pub fn parse_fx(text: &str) -> Result<Vec<FxTrade>, DomainError> {
    let (_, rows) = read_sheet(text)?;
    let trades: Vec<FxTrade> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, record)| fx_from_record(record, i + 2))
        .collect();
    debug!(rows = rows.len(), parsed = trades.len(), "parsed FX dataset");
    Ok(trades)
}

fn equity_from_record(record: &StringRecord, line: usize) -> Option<EquityTrade> {
    use equity_col::*;

    let row = open_row(record, line, EQUITY_MIN_COLUMNS, TradeKind::Equity)?;
    let confirmation_status = row.status(CONFIRMATION_STATUS, TradeKind::Equity)?;
    let Some(trade_date) = parse_date(&row.text(TRADE_DATE)) else {
        warn!(line, trade_id = row.trade_id, "invalid trade date, skipping row");
        return None;
    };

    Some(EquityTrade {
        trade_id: row.text(TRADE_ID),
        order_id: row.text(ORDER_ID),
        client_id: row.text(CLIENT_ID),
        isin: row.text(ISIN),
        symbol: row.text(SYMBOL),
        side: row.side(SIDE),
        quantity: row.amount(QUANTITY, "quantity"),
        price: row.amount(PRICE, "price"),
        trade_value: row.amount(TRADE_VALUE, "trade_value"),
        currency: row.text(CURRENCY),
        trade_date,
        settlement_date: parse_date(&row.text(SETTLEMENT_DATE)),
        settlement_status: row.text(SETTLEMENT_STATUS),
        counterparty: row.text(COUNTERPARTY),
        trading_venue: row.text(TRADING_VENUE),
        trader_name: row.text(TRADER_NAME),
        kyc_status: row.text(KYC_STATUS),
        reference_data_validated: row.flag(REFERENCE_DATA_VALIDATED),
        commission: row.amount(COMMISSION, "commission"),
        taxes: row.amount(TAXES, "taxes"),
        total_cost: row.amount(TOTAL_COST, "total_cost"),
        confirmation_status,
        country_of_trade: row.text(COUNTRY_OF_TRADE),
        ops_team_notes: row.text(OPS_TEAM_NOTES),
        enrichment: None,
    })
}

fn fx_from_record(record: &StringRecord, line: usize) -> Option<FxTrade> {
    use fx_col::*;

    let row = open_row(record, line, FX_MIN_COLUMNS, TradeKind::Fx)?;
    let confirmation_status = row.status(CONFIRMATION_STATUS, TradeKind::Fx)?;
    let Some(trade_date) = parse_date(&row.text(TRADE_DATE)) else {
        warn!(line, trade_id = row.trade_id, "invalid trade date, skipping row");
        return None;
    };
    let trade_status = row.text(TRADE_STATUS).parse().unwrap_or_else(|_| {
        warn!(line, trade_id = row.trade_id, "unknown FX trade status, using Booked");
        FxTradeStatus::Booked
    });

    Some(FxTrade {
        trade_id: row.text(TRADE_ID),
        trade_date,
        value_date: parse_date(&row.text(VALUE_DATE)),
        trading_party: row.text(TRADING_PARTY),
        counterparty: row.text(COUNTERPARTY),
        currency_pair: row.text(CURRENCY_PAIR),
        buy_sell: row.side(BUY_SELL),
        dealt_currency: row.text(DEALT_CURRENCY),
        base_currency: row.text(BASE_CURRENCY),
        term_currency: row.text(TERM_CURRENCY),
        notional_amount: row.amount(NOTIONAL_AMOUNT, "notional_amount"),
        price: row.amount(PRICE, "price"),
        trade_status,
        product_type: row.text(PRODUCT_TYPE),
        maturity_date: parse_date(&row.text(MATURITY_DATE)),
        confirmation_timestamp: row.text(CONFIRMATION_TIMESTAMP),
        settlement_date: parse_date(&row.text(SETTLEMENT_DATE)),
        amendment_flag: row.flag(AMENDMENT_FLAG),
        confirmation_method: row.text(CONFIRMATION_METHOD),
        confirmation_status,
        trader_id: row.text(TRADER_ID),
        kyc_check: row.text(KYC_CHECK),
        sanctions_screening: row.text(SANCTIONS_SCREENING),
        exception_flag: row.flag(EXCEPTION_FLAG),
        audit_trail_ref: row.text(AUDIT_TRAIL_REF),
        legal_entity: row.text(LEGAL_ENTITY),
        booking_location: row.text(BOOKING_LOCATION),
        portfolio: row.text(PORTFOLIO),
        trade_version: row.text(TRADE_VERSION).trim().parse().unwrap_or(1),
        cancellation_flag: row.flag(CANCELLATION_FLAG),
        settlement_method: row.text(SETTLEMENT_METHOD),
        comments: row.text(COMMENTS),
        enrichment: None,
    })
}
