//! Header-matched parsing for user-uploaded sheets.
//!
//! Headers are normalised (lowercase, alphanumerics only) and each target field is
//! located by trying its synonyms in priority order: the first synonym contained in
//! any header wins. Fields without a matching column get a default.

use super::{parse_amount, parse_date, parse_flag, read_sheet};
use crate::domain::entities::trade::{EquityTrade, FxTrade, Trade};
use crate::domain::error::DomainError;
use crate::domain::values::confirmation_status::ConfirmationStatus;
use crate::domain::values::fx_trade_status::FxTradeStatus;
use crate::domain::values::side::Side;
use crate::domain::values::trade_kind::TradeKind;
use chrono::{NaiveDate, Utc};
use csv::StringRecord;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Headers that only appear on FX sheets.
const FX_MARKERS: [&str; 5] = [
    "currencypair",
    "basecurrency",
    "termcurrency",
    "dealtcurrency",
    "notional",
];

const TRADE_ID: &[&str] = &["tradeid", "traderef", "tradereference", "dealid"];
const TRADE_DATE: &[&str] = &["tradedate", "date"];
const SETTLEMENT_DATE: &[&str] = &["settlementdate", "settledate"];
const COUNTERPARTY: &[&str] = &["counterparty", "cpty", "broker"];
const CONFIRMATION_STATUS: &[&str] = &["confirmationstatus", "status"];
const PRICE: &[&str] = &["price", "rate"];

const QUANTITY: &[&str] = &["quantity", "qty", "shares", "units"];
const SYMBOL: &[&str] = &["symbol", "ticker", "instrument"];
const ISIN: &[&str] = &["isin"];
const SIDE: &[&str] = &["tradetype", "side", "buysell", "direction"];
const TRADE_VALUE: &[&str] = &["tradevalue", "grossvalue", "amount", "value"];
const CURRENCY: &[&str] = &["currency", "ccy"];
const VENUE: &[&str] = &["tradingvenue", "venue", "exchange"];
const TRADER_NAME: &[&str] = &["tradername", "trader"];

const VALUE_DATE: &[&str] = &["valuedate"];
const TRADING_PARTY: &[&str] = &["tradingparty", "entity"];
const CURRENCY_PAIR: &[&str] = &["currencypair", "ccypair", "pair"];
const BUY_SELL: &[&str] = &["buysell", "side", "direction"];
const BASE_CURRENCY: &[&str] = &["basecurrency", "baseccy"];
const TERM_CURRENCY: &[&str] = &["termcurrency", "termccy", "quotecurrency"];
const DEALT_CURRENCY: &[&str] = &["dealtcurrency", "dealtccy"];
const NOTIONAL: &[&str] = &["notionalamount", "notional", "amount"];
const FX_TRADE_STATUS: &[&str] = &["tradestatus"];
const PRODUCT_TYPE: &[&str] = &["producttype", "product"];
const CONFIRMATION_METHOD: &[&str] = &["confirmationmethod", "method"];
const TRADER_ID: &[&str] = &["traderid", "trader"];
const AMENDMENT_FLAG: &[&str] = &["amendmentflag", "amended", "amendment"];
const EXCEPTION_FLAG: &[&str] = &["exceptionflag", "exception"];

/// Target fields of an uploaded sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    TradeId,
    TradeDate,
    SettlementDate,
    Counterparty,
    ConfirmationStatus,
    Price,
    Quantity,
    Symbol,
    Isin,
    Side,
    TradeValue,
    Currency,
    Venue,
    TraderName,
    ValueDate,
    TradingParty,
    CurrencyPair,
    BuySell,
    BaseCurrency,
    TermCurrency,
    DealtCurrency,
    Notional,
    FxTradeStatus,
    ProductType,
    ConfirmationMethod,
    TraderId,
    AmendmentFlag,
    ExceptionFlag,
}

impl Field {
    const ALL: [Field; 28] = [
        Field::TradeId,
        Field::TradeDate,
        Field::SettlementDate,
        Field::Counterparty,
        Field::ConfirmationStatus,
        Field::Price,
        Field::Quantity,
        Field::Symbol,
        Field::Isin,
        Field::Side,
        Field::TradeValue,
        Field::Currency,
        Field::Venue,
        Field::TraderName,
        Field::ValueDate,
        Field::TradingParty,
        Field::CurrencyPair,
        Field::BuySell,
        Field::BaseCurrency,
        Field::TermCurrency,
        Field::DealtCurrency,
        Field::Notional,
        Field::FxTradeStatus,
        Field::ProductType,
        Field::ConfirmationMethod,
        Field::TraderId,
        Field::AmendmentFlag,
        Field::ExceptionFlag,
    ];

    /// Header synonyms in priority order.
    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Field::TradeId => TRADE_ID,
            Field::TradeDate => TRADE_DATE,
            Field::SettlementDate => SETTLEMENT_DATE,
            Field::Counterparty => COUNTERPARTY,
            Field::ConfirmationStatus => CONFIRMATION_STATUS,
            Field::Price => PRICE,
            Field::Quantity => QUANTITY,
            Field::Symbol => SYMBOL,
            Field::Isin => ISIN,
            Field::Side => SIDE,
            Field::TradeValue => TRADE_VALUE,
            Field::Currency => CURRENCY,
            Field::Venue => VENUE,
            Field::TraderName => TRADER_NAME,
            Field::ValueDate => VALUE_DATE,
            Field::TradingParty => TRADING_PARTY,
            Field::CurrencyPair => CURRENCY_PAIR,
            Field::BuySell => BUY_SELL,
            Field::BaseCurrency => BASE_CURRENCY,
            Field::TermCurrency => TERM_CURRENCY,
            Field::DealtCurrency => DEALT_CURRENCY,
            Field::Notional => NOTIONAL,
            Field::FxTradeStatus => FX_TRADE_STATUS,
            Field::ProductType => PRODUCT_TYPE,
            Field::ConfirmationMethod => CONFIRMATION_METHOD,
            Field::TraderId => TRADER_ID,
            Field::AmendmentFlag => AMENDMENT_FLAG,
            Field::ExceptionFlag => EXCEPTION_FLAG,
        }
    }
}

const DEFAULT_QUANTITY: f64 = 100.0;
const DEFAULT_NOTIONAL: f64 = 1_000_000.0;
const DEFAULT_PAIR: &str = "EUR/USD";

fn normalise(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Equity-like unless an FX-only header is present.
pub fn classify(headers: &[String]) -> TradeKind {
    let normalised: Vec<String> = headers.iter().map(|h| normalise(h)).collect();
    let is_fx = FX_MARKERS
        .iter()
        .any(|marker| normalised.iter().any(|h| h.contains(marker)));
    if is_fx {
        TradeKind::Fx
    } else {
        TradeKind::Equity
    }
}

/// Column of each field for one sheet, resolved once from the headers.
struct ColumnMap {
    columns: HashMap<Field, usize>,
}

impl ColumnMap {
    fn new(headers: &StringRecord) -> Self {
        let normalised: Vec<String> = headers.iter().map(normalise).collect();
        let columns = Field::ALL
            .into_iter()
            .filter_map(|field| {
                field
                    .synonyms()
                    .iter()
                    .find_map(|syn| normalised.iter().position(|h| h.contains(syn)))
                    .map(|idx| (field, idx))
            })
            .collect();
        Self { columns }
    }

    fn column(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }
}

/// One data row read through the sheet's column map.
struct Cells<'a> {
    columns: &'a ColumnMap,
    record: &'a StringRecord,
}

impl<'a> Cells<'a> {
    fn get(&self, field: Field) -> Option<&'a str> {
        self.columns
            .column(field)
            .and_then(|idx| self.record.get(idx))
            .filter(|v| !v.is_empty())
    }

    fn text(&self, field: Field, default: &str) -> String {
        self.get(field).unwrap_or(default).to_string()
    }

    fn amount(&self, field: Field) -> Option<f64> {
        self.get(field).and_then(parse_amount)
    }

    fn date(&self, field: Field) -> Option<NaiveDate> {
        self.get(field).and_then(parse_date)
    }

    fn flag(&self, field: Field) -> bool {
        self.get(field).is_some_and(parse_flag)
    }

    fn side(&self, field: Field) -> Side {
        self.get(field)
            .and_then(|v| v.parse().ok())
            .unwrap_or(Side::Buy)
    }

    fn status(&self, kind: TradeKind) -> ConfirmationStatus {
        match self.get(Field::ConfirmationStatus).map(str::parse::<ConfirmationStatus>) {
            Some(Ok(status)) if status.allowed_for(kind) => status,
            Some(_) => {
                warn!(%kind, "unsupported confirmation status in upload, using Pending");
                ConfirmationStatus::Pending
            }
            None => ConfirmationStatus::Pending,
        }
    }
}

/// Parses an uploaded sheet into trades of whichever kind its headers indicate.
pub fn parse_upload(text: &str) -> Result<Vec<Trade>, DomainError> {
    let (headers, rows) = read_sheet(text)?;
    let header_names: Vec<String> = headers.iter().map(String::from).collect();
    let kind = classify(&header_names);
    let columns = ColumnMap::new(&headers);
    let today = Utc::now().date_naive();

    let mut trades = Vec::with_capacity(rows.len());
    for (i, record) in rows.iter().enumerate() {
        let row_number = i + 1;
        if record.len() < headers.len() {
            warn!(row = row_number, columns = record.len(), expected = headers.len(), "dropping short upload row");
            continue;
        }
        let cells = Cells {
            columns: &columns,
            record,
        };
        let trade = match kind {
            TradeKind::Equity => Trade::Equity(equity_from_cells(&cells, row_number, today)),
            TradeKind::Fx => Trade::Fx(fx_from_cells(&cells, row_number, today)),
        };
        trades.push(trade);
    }

    info!(%kind, rows = rows.len(), parsed = trades.len(), "parsed uploaded sheet");
    Ok(trades)
}

fn equity_from_cells(cells: &Cells<'_>, row_number: usize, today: NaiveDate) -> EquityTrade {
    let quantity = cells.amount(Field::Quantity).unwrap_or(DEFAULT_QUANTITY);
    let price = cells.amount(Field::Price).unwrap_or(0.0);
    let trade_value = cells.amount(Field::TradeValue).unwrap_or(quantity * price);
    let trade_id = cells.text(Field::TradeId, &format!("TRADE_{row_number}"));
    debug!(trade_id = %trade_id, quantity, price, trade_value, "mapped equity upload row");

    EquityTrade {
        trade_id,
        order_id: String::new(),
        client_id: String::new(),
        isin: cells.text(Field::Isin, ""),
        symbol: cells.text(Field::Symbol, ""),
        side: cells.side(Field::Side),
        quantity,
        price,
        trade_value,
        currency: cells.text(Field::Currency, "USD"),
        trade_date: cells.date(Field::TradeDate).unwrap_or(today),
        settlement_date: cells.date(Field::SettlementDate),
        settlement_status: "Pending".into(),
        counterparty: cells.text(Field::Counterparty, "Unknown"),
        trading_venue: cells.text(Field::Venue, "Unknown"),
        trader_name: cells.text(Field::TraderName, "Unknown"),
        kyc_status: "Pending".into(),
        reference_data_validated: false,
        commission: 0.0,
        taxes: 0.0,
        total_cost: trade_value,
        confirmation_status: cells.status(TradeKind::Equity),
        country_of_trade: String::new(),
        ops_team_notes: String::new(),
        enrichment: None,
    }
}

fn fx_from_cells(cells: &Cells<'_>, row_number: usize, today: NaiveDate) -> FxTrade {
    let currency_pair = cells.text(Field::CurrencyPair, DEFAULT_PAIR);
    let (pair_base, pair_term) = split_pair(&currency_pair);
    let base_currency = cells.text(Field::BaseCurrency, &pair_base);
    let term_currency = cells.text(Field::TermCurrency, &pair_term);
    let trade_date = cells.date(Field::TradeDate).unwrap_or(today);

    FxTrade {
        trade_id: cells.text(Field::TradeId, &format!("TRADE_{row_number}")),
        trade_date,
        value_date: cells.date(Field::ValueDate),
        trading_party: cells.text(Field::TradingParty, "Unknown"),
        counterparty: cells.text(Field::Counterparty, "Unknown"),
        buy_sell: cells.side(Field::BuySell),
        dealt_currency: cells.text(Field::DealtCurrency, &base_currency),
        base_currency,
        term_currency,
        currency_pair,
        notional_amount: cells.amount(Field::Notional).unwrap_or(DEFAULT_NOTIONAL),
        price: cells.amount(Field::Price).unwrap_or(0.0),
        trade_status: cells
            .get(Field::FxTradeStatus)
            .and_then(|v| v.parse().ok())
            .unwrap_or(FxTradeStatus::Booked),
        product_type: cells.text(Field::ProductType, "Spot"),
        maturity_date: None,
        confirmation_timestamp: String::new(),
        settlement_date: cells.date(Field::SettlementDate),
        amendment_flag: cells.flag(Field::AmendmentFlag),
        confirmation_method: cells.text(Field::ConfirmationMethod, "Electronic"),
        confirmation_status: cells.status(TradeKind::Fx),
        trader_id: cells.text(Field::TraderId, "Unknown"),
        kyc_check: "Pending".into(),
        sanctions_screening: "Pending".into(),
        exception_flag: cells.flag(Field::ExceptionFlag),
        audit_trail_ref: String::new(),
        legal_entity: String::new(),
        booking_location: String::new(),
        portfolio: String::new(),
        trade_version: 1,
        cancellation_flag: false,
        settlement_method: String::new(),
        comments: String::new(),
        enrichment: None,
    }
}

/// "EUR/USD", "EUR-USD" or "EURUSD" into its two legs.
fn split_pair(pair: &str) -> (String, String) {
    let pair = pair.trim().to_uppercase();
    if let Some((base, term)) = pair.split_once(['/', '-']) {
        return (base.trim().to_string(), term.trim().to_string());
    }
    if pair.len() == 6 && pair.is_ascii() {
        return (pair[..3].to_string(), pair[3..].to_string());
    }
    split_pair(DEFAULT_PAIR)
}
