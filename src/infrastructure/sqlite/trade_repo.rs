use super::{lock, SharedConnection};
use crate::domain::entities::trade::{EquityTrade, FxTrade, Trade};
use crate::domain::error::DomainError;
use crate::domain::ports::trade_repository::{StatusCount, TradeRepository};
use crate::domain::values::confirmation_status::ConfirmationStatus;
use crate::domain::values::fx_trade_status::FxTradeStatus;
use crate::domain::values::side::Side;
use crate::domain::values::trade_kind::TradeKind;
use chrono::NaiveDate;
use rusqlite::{params, Row};
use std::str::FromStr;
use tracing::warn;

const EQUITY_COLS: &str = "trade_id, order_id, client_id, isin, symbol, side, quantity, price, trade_value, currency, trade_date, settlement_date, settlement_status, counterparty, trading_venue, trader_name, kyc_status, reference_data_validated, commission, taxes, total_cost, confirmation_status, country_of_trade, ops_team_notes";

const FX_COLS: &str = "trade_id, trade_date, value_date, trading_party, counterparty, currency_pair, buy_sell, dealt_currency, base_currency, term_currency, notional_amount, price, trade_status, product_type, maturity_date, confirmation_timestamp, settlement_date, amendment_flag, confirmation_method, confirmation_status, trader_id, kyc_check, sanctions_screening, exception_flag, audit_trail_ref, legal_entity, booking_location, portfolio, trade_version, cancellation_flag, settlement_method, comments";

pub struct SqliteTradeRepo {
    conn: SharedConnection,
}

impl SqliteTradeRepo {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn row_to_equity(row: &Row) -> Result<EquityTrade, rusqlite::Error> {
        let trade_id: String = row.get("trade_id")?;
        Ok(EquityTrade {
            side: parse_or(&row.get::<_, String>("side")?, Side::Buy, &trade_id),
            trade_date: date_or_epoch(&row.get::<_, String>("trade_date")?, &trade_id),
            settlement_date: optional_date(row.get("settlement_date")?),
            confirmation_status: parse_or(
                &row.get::<_, String>("confirmation_status")?,
                ConfirmationStatus::Pending,
                &trade_id,
            ),
            order_id: row.get("order_id")?,
            client_id: row.get("client_id")?,
            isin: row.get("isin")?,
            symbol: row.get("symbol")?,
            quantity: row.get("quantity")?,
            price: row.get("price")?,
            trade_value: row.get("trade_value")?,
            currency: row.get("currency")?,
            settlement_status: row.get("settlement_status")?,
            counterparty: row.get("counterparty")?,
            trading_venue: row.get("trading_venue")?,
            trader_name: row.get("trader_name")?,
            kyc_status: row.get("kyc_status")?,
            reference_data_validated: row.get("reference_data_validated")?,
            commission: row.get("commission")?,
            taxes: row.get("taxes")?,
            total_cost: row.get("total_cost")?,
            country_of_trade: row.get("country_of_trade")?,
            ops_team_notes: row.get("ops_team_notes")?,
            enrichment: None,
            trade_id,
        })
    }

    fn row_to_fx(row: &Row) -> Result<FxTrade, rusqlite::Error> {
        let trade_id: String = row.get("trade_id")?;
        Ok(FxTrade {
            trade_date: date_or_epoch(&row.get::<_, String>("trade_date")?, &trade_id),
            value_date: optional_date(row.get("value_date")?),
            maturity_date: optional_date(row.get("maturity_date")?),
            settlement_date: optional_date(row.get("settlement_date")?),
            buy_sell: parse_or(&row.get::<_, String>("buy_sell")?, Side::Buy, &trade_id),
            trade_status: parse_or(
                &row.get::<_, String>("trade_status")?,
                FxTradeStatus::Booked,
                &trade_id,
            ),
            confirmation_status: parse_or(
                &row.get::<_, String>("confirmation_status")?,
                ConfirmationStatus::Pending,
                &trade_id,
            ),
            trading_party: row.get("trading_party")?,
            counterparty: row.get("counterparty")?,
            currency_pair: row.get("currency_pair")?,
            dealt_currency: row.get("dealt_currency")?,
            base_currency: row.get("base_currency")?,
            term_currency: row.get("term_currency")?,
            notional_amount: row.get("notional_amount")?,
            price: row.get("price")?,
            product_type: row.get("product_type")?,
            confirmation_timestamp: row.get("confirmation_timestamp")?,
            amendment_flag: row.get("amendment_flag")?,
            confirmation_method: row.get("confirmation_method")?,
            trader_id: row.get("trader_id")?,
            kyc_check: row.get("kyc_check")?,
            sanctions_screening: row.get("sanctions_screening")?,
            exception_flag: row.get("exception_flag")?,
            audit_trail_ref: row.get("audit_trail_ref")?,
            legal_entity: row.get("legal_entity")?,
            booking_location: row.get("booking_location")?,
            portfolio: row.get("portfolio")?,
            trade_version: row.get("trade_version")?,
            cancellation_flag: row.get("cancellation_flag")?,
            settlement_method: row.get("settlement_method")?,
            comments: row.get("comments")?,
            enrichment: None,
            trade_id,
        })
    }
}

fn parse_or<T: FromStr>(raw: &str, fallback: T, trade_id: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        warn!(trade_id, raw, "invalid enum value in stored trade, using fallback");
        fallback
    })
}

fn date_or_epoch(raw: &str, trade_id: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|_| {
        warn!(trade_id, raw, "invalid stored trade date");
        NaiveDate::default()
    })
}

fn optional_date(raw: Option<String>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

fn fmt_date(date: &Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

impl TradeRepository for SqliteTradeRepo {
    fn add_equity(&self, trade: &EquityTrade) -> Result<(), DomainError> {
        let conn = lock(&self.conn)?;
        conn.execute(
            &format!(
                "INSERT INTO equity_trades ({EQUITY_COLS}, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25)"
            ),
            params![
                trade.trade_id,
                trade.order_id,
                trade.client_id,
                trade.isin,
                trade.symbol,
                trade.side.to_string(),
                trade.quantity,
                trade.price,
                trade.trade_value,
                trade.currency,
                trade.trade_date.format("%Y-%m-%d").to_string(),
                fmt_date(&trade.settlement_date),
                trade.settlement_status,
                trade.counterparty,
                trade.trading_venue,
                trade.trader_name,
                trade.kyc_status,
                trade.reference_data_validated,
                trade.commission,
                trade.taxes,
                trade.total_cost,
                trade.confirmation_status.to_string(),
                trade.country_of_trade,
                trade.ops_team_notes,
                chrono::Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to add equity trade {}: {e}", trade.trade_id)))?;
        Ok(())
    }

    fn add_fx(&self, trade: &FxTrade) -> Result<(), DomainError> {
        let conn = lock(&self.conn)?;
        conn.execute(
            &format!(
                "INSERT INTO fx_trades ({FX_COLS}, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32, ?33)"
            ),
            params![
                trade.trade_id,
                trade.trade_date.format("%Y-%m-%d").to_string(),
                fmt_date(&trade.value_date),
                trade.trading_party,
                trade.counterparty,
                trade.currency_pair,
                trade.buy_sell.to_string(),
                trade.dealt_currency,
                trade.base_currency,
                trade.term_currency,
                trade.notional_amount,
                trade.price,
                trade.trade_status.to_string(),
                trade.product_type,
                fmt_date(&trade.maturity_date),
                trade.confirmation_timestamp,
                fmt_date(&trade.settlement_date),
                trade.amendment_flag,
                trade.confirmation_method,
                trade.confirmation_status.to_string(),
                trade.trader_id,
                trade.kyc_check,
                trade.sanctions_screening,
                trade.exception_flag,
                trade.audit_trail_ref,
                trade.legal_entity,
                trade.booking_location,
                trade.portfolio,
                trade.trade_version,
                trade.cancellation_flag,
                trade.settlement_method,
                trade.comments,
                chrono::Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to add FX trade {}: {e}", trade.trade_id)))?;
        Ok(())
    }

    fn list_equity(&self) -> Result<Vec<EquityTrade>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!("SELECT {EQUITY_COLS} FROM equity_trades ORDER BY id"))?;
        let trades = stmt
            .query_map([], Self::row_to_equity)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(trades)
    }

    fn list_fx(&self) -> Result<Vec<FxTrade>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!("SELECT {FX_COLS} FROM fx_trades ORDER BY id"))?;
        let trades = stmt
            .query_map([], Self::row_to_fx)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(trades)
    }

    fn get_trade(&self, trade_id: &str) -> Result<Option<Trade>, DomainError> {
        let conn = lock(&self.conn)?;

        let mut stmt = conn.prepare(&format!("SELECT {EQUITY_COLS} FROM equity_trades WHERE trade_id = ?1"))?;
        let mut rows = stmt.query_map(params![trade_id], Self::row_to_equity)?;
        if let Some(trade) = rows.next().and_then(|r| r.ok()) {
            return Ok(Some(Trade::Equity(trade)));
        }

        let mut stmt = conn.prepare(&format!("SELECT {FX_COLS} FROM fx_trades WHERE trade_id = ?1"))?;
        let mut rows = stmt.query_map(params![trade_id], Self::row_to_fx)?;
        Ok(rows.next().and_then(|r| r.ok()).map(Trade::Fx))
    }

    fn status_counts(&self) -> Result<Vec<StatusCount>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut counts = Vec::new();
        for (kind, table) in [(TradeKind::Equity, "equity_trades"), (TradeKind::Fx, "fx_trades")] {
            let mut stmt = conn.prepare(&format!(
                "SELECT confirmation_status, COUNT(*) FROM {table} GROUP BY confirmation_status"
            ))?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
                .filter_map(|r| r.ok());
            for (raw, count) in rows {
                match raw.parse::<ConfirmationStatus>() {
                    Ok(status) => counts.push(StatusCount {
                        kind,
                        status,
                        count: count as usize,
                    }),
                    Err(_) => warn!(%kind, raw = %raw, count, "ignoring unknown stored confirmation status"),
                }
            }
        }
        Ok(counts)
    }
}
