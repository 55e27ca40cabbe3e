use thiserror::Error;

use crate::{
    db_types::{NewPurchaseOrder, PurchaseOrder},
    order_objects::OrderQueryFilter,
    traits::VendorApiError,
    validation::ValidationErrors,
};

/// The purchase order store.
///
/// Note that there is no plain "update" here. Saving an existing order has side effects on the vendor's metrics, so
/// it lives on [`super::VendorPerformanceDatabase`].
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores a brand-new purchase order. Creating an order never triggers a metrics recalculation.
    async fn insert_purchase_order(&self, order: NewPurchaseOrder) -> Result<PurchaseOrder, PurchaseOrderApiError>;

    async fn fetch_purchase_order(&self, id: i64) -> Result<Option<PurchaseOrder>, PurchaseOrderApiError>;

    /// Fetches orders matching the filter, ordered by id.
    async fn search_purchase_orders(&self, query: OrderQueryFilter)
        -> Result<Vec<PurchaseOrder>, PurchaseOrderApiError>;

    /// Deletes the order. The vendor's cached metrics are left as they are.
    /// Returns `false` if there was no such order.
    async fn delete_purchase_order(&self, id: i64) -> Result<bool, PurchaseOrderApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum PurchaseOrderApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A purchase order with number {0} already exists")]
    PoNumberAlreadyExists(String),
    #[error("The requested purchase order (id {0}) does not exist")]
    OrderNotFound(i64),
    #[error("The vendor (id {0}) for this purchase order does not exist")]
    VendorNotFound(i64),
    #[error("Invalid purchase order. {0}")]
    ValidationFailed(ValidationErrors),
    #[error("{0}")]
    VendorError(#[from] VendorApiError),
}

impl From<sqlx::Error> for PurchaseOrderApiError {
    fn from(e: sqlx::Error) -> Self {
        PurchaseOrderApiError::DatabaseError(e.to_string())
    }
}
