use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS equity_trades (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            trade_id TEXT NOT NULL UNIQUE,
            order_id TEXT NOT NULL,
            client_id TEXT NOT NULL,
            isin TEXT NOT NULL,
            symbol TEXT NOT NULL,
            side TEXT NOT NULL,
            quantity REAL NOT NULL,
            price REAL NOT NULL,
            trade_value REAL NOT NULL,
            currency TEXT NOT NULL,
            trade_date TEXT NOT NULL,
            settlement_date TEXT,
            settlement_status TEXT NOT NULL,
            counterparty TEXT NOT NULL,
            trading_venue TEXT NOT NULL,
            trader_name TEXT NOT NULL,
            kyc_status TEXT NOT NULL,
            reference_data_validated INTEGER NOT NULL DEFAULT 0,
            commission REAL NOT NULL DEFAULT 0,
            taxes REAL NOT NULL DEFAULT 0,
            total_cost REAL NOT NULL DEFAULT 0,
            confirmation_status TEXT NOT NULL,
            country_of_trade TEXT NOT NULL,
            ops_team_notes TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS fx_trades (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            trade_id TEXT NOT NULL UNIQUE,
            trade_date TEXT NOT NULL,
            value_date TEXT,
            trading_party TEXT NOT NULL,
            counterparty TEXT NOT NULL,
            currency_pair TEXT NOT NULL,
            buy_sell TEXT NOT NULL,
            dealt_currency TEXT NOT NULL,
            base_currency TEXT NOT NULL,
            term_currency TEXT NOT NULL,
            notional_amount REAL NOT NULL,
            price REAL NOT NULL,
            trade_status TEXT NOT NULL,
            product_type TEXT NOT NULL,
            maturity_date TEXT,
            confirmation_timestamp TEXT NOT NULL,
            settlement_date TEXT,
            amendment_flag INTEGER NOT NULL DEFAULT 0,
            confirmation_method TEXT NOT NULL,
            confirmation_status TEXT NOT NULL,
            trader_id TEXT NOT NULL,
            kyc_check TEXT NOT NULL,
            sanctions_screening TEXT NOT NULL,
            exception_flag INTEGER NOT NULL DEFAULT 0,
            audit_trail_ref TEXT NOT NULL,
            legal_entity TEXT NOT NULL,
            booking_location TEXT NOT NULL,
            portfolio TEXT NOT NULL,
            trade_version INTEGER NOT NULL DEFAULT 1,
            cancellation_flag INTEGER NOT NULL DEFAULT 0,
            settlement_method TEXT NOT NULL,
            comments TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS trade_workflows (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            trade_id TEXT NOT NULL,
            trade_type TEXT NOT NULL,
            current_step TEXT NOT NULL,
            priority TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS workflow_steps (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            workflow_id INTEGER NOT NULL REFERENCES trade_workflows(id),
            step_id TEXT NOT NULL,
            trade_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            status TEXT NOT NULL,
            assigned_to TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_equity_status ON equity_trades(confirmation_status);
        CREATE INDEX IF NOT EXISTS idx_fx_status ON fx_trades(confirmation_status);
        CREATE INDEX IF NOT EXISTS idx_workflows_trade ON trade_workflows(trade_id);
        CREATE INDEX IF NOT EXISTS idx_steps_workflow ON workflow_steps(workflow_id, position);
        ",
    )
    .map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
