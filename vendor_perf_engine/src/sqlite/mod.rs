//! SQLite backend for the vendor performance engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
