pub mod migrations;
pub mod trade_repo;
pub mod workflow_repo;

use crate::domain::error::DomainError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// One connection shared by every repository, so `:memory:` databases see the same tables.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Opens a connection in WAL mode and runs migrations.
pub fn open(db_path: &str) -> Result<SharedConnection, DomainError> {
    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
    migrations::run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub(crate) fn lock(conn: &SharedConnection) -> Result<std::sync::MutexGuard<'_, Connection>, DomainError> {
    conn.lock().map_err(|e| DomainError::Database(e.to_string()))
}
