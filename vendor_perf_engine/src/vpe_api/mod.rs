//! # Vendor performance engine public API
//!
//! The `vpe_api` module exposes the programmatic API for the engine. Clients pick the pieces they need:
//!
//! * [`vendor_api`] manages vendors and gives read access to their performance history.
//! * [`purchase_order_api`] manages purchase orders. Every save of an existing order runs the metrics engine.
//! * [`auth_api`] stores and looks up user accounts.
//!
//! # API usage
//!
//! Each API is created by supplying a database backend that implements the backend traits that API needs.
//!
//! ```rust,ignore
//! use vendor_perf_engine::{SqliteDatabase, VendorApi};
//! let db = SqliteDatabase::new_with_url("sqlite://data/vendor_perf.db", 5).await?;
//! let api = VendorApi::new(db);
//! let vendors = api.fetch_vendors().await?;
//! ```
pub mod auth_api;
pub mod order_objects;
pub mod purchase_order_api;
pub mod validation;
pub mod vendor_api;
