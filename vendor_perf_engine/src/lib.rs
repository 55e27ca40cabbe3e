//! Vendor Performance Engine
//!
//! The engine tracks vendors and their purchase orders, and keeps four rolling performance metrics per vendor
//! (on-time delivery rate, quality rating average, average response time and fulfillment rate) up to date as orders
//! move through their lifecycle.
//!
//! The library is divided into these main sections:
//! 1. The metrics engine ([`mod@metrics`]). Pure functions that decide, for a single purchase order save, which
//!    metrics need recomputing and how the vendor's performance history should change.
//! 2. Storage traits and the SQLite backend. You should never need to access the database directly; use the public
//!    APIs instead. The exception is the data types stored in the database, which are public in [`mod@db_types`].
//! 3. The public API ([`VendorApi`], [`PurchaseOrderApi`], [`AuthApi`]). Backends implement the traits in this crate
//!    to act as storage for the APIs.
pub mod db_types;
pub mod metrics;
mod traits;
mod vpe_api;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    AuthApiError,
    AuthManagement,
    OrderManagement,
    PerformanceHistory,
    PurchaseOrderApiError,
    VendorApiError,
    VendorManagement,
    VendorPerformanceDatabase,
};
pub use vpe_api::{
    auth_api::AuthApi,
    order_objects,
    purchase_order_api::PurchaseOrderApi,
    validation,
    vendor_api::VendorApi,
};
