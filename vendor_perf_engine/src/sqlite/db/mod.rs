//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! Every interaction is a plain function taking a `&mut SqliteConnection` argument. Callers can obtain a connection
//! from a pool, or open a transaction and pass `&mut tx` through when several calls have to succeed or fail together.
use std::{env, str::FromStr, time::Duration};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod performance;
pub mod purchase_orders;
pub mod users;
pub mod vendors;

const SQLITE_DB_URL: &str = "sqlite://data/vendor_perf.db";

pub fn db_url() -> String {
    let result = env::var("VPM_DATABASE_URL").unwrap_or_else(|_| {
        info!("🗃️ VPM_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("🗃️ Using database URL: {result}");
    result
}

const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Creates a connection pool. The database file is created if it does not exist, and foreign key enforcement is
/// switched on for every connection so that deleting a vendor removes its orders and history.
///
/// Writers queue on the database lock for up to [`BUSY_TIMEOUT`] before giving up with `SQLITE_BUSY`.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

/// Returns the first row of a fully drained statement.
///
/// Single-row statements are read with `fetch_all`. SQLite only ends the statement's implicit transaction once it has
/// been stepped past its last row, and `fetch_one`/`fetch_optional` stop early. A `RETURNING` write read that way stays
/// uncommitted, and a `SELECT` pins its connection to a stale snapshot.
pub(crate) fn first_row<T>(rows: Vec<T>) -> Option<T> {
    rows.into_iter().next()
}

/// True if the error is a violation of a `UNIQUE` constraint.
pub(crate) fn is_unique_violation(e: &SqlxError) -> bool {
    e.as_database_error().map(|e| e.is_unique_violation()).unwrap_or(false)
}

/// True if the error is a violation of a `REFERENCES` constraint.
pub(crate) fn is_foreign_key_violation(e: &SqlxError) -> bool {
    e.as_database_error().map(|e| e.is_foreign_key_violation()).unwrap_or(false)
}
