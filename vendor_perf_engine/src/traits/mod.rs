//! # Storage backend contracts
//!
//! The engine does not talk to a database directly. Instead, backends implement the traits in this module and the
//! public APIs ([`crate::VendorApi`], [`crate::PurchaseOrderApi`], [`crate::AuthApi`]) are generic over them.
//!
//! * [`VendorManagement`] is the vendor store: CRUD for vendors and their cached metrics.
//! * [`PerformanceHistory`] is the read side of the history store.
//! * [`OrderManagement`] is the order store: create, fetch, filter and delete purchase orders.
//! * [`VendorPerformanceDatabase`] ties the three together and owns the one non-trivial write path: saving an
//!   existing purchase order and running the metrics engine against the previous and new versions of it.
//! * [`AuthManagement`] stores user accounts for the login endpoints.
mod auth_management;
mod order_management;
mod vendor_management;
mod vendor_performance_database;

pub use auth_management::{AuthApiError, AuthManagement};
pub use order_management::{OrderManagement, PurchaseOrderApiError};
pub use vendor_management::{PerformanceHistory, VendorApiError, VendorManagement};
pub use vendor_performance_database::VendorPerformanceDatabase;
