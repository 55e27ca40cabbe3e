use chrono::{DateTime, Utc};

use crate::{
    db_types::PurchaseOrderUpdate,
    order_objects::{AcknowledgeResult, PurchaseOrderSaved},
    traits::{OrderManagement, PerformanceHistory, PurchaseOrderApiError, VendorManagement},
};

/// This trait defines the highest level of behaviour for backends supporting the vendor performance engine.
///
/// Implementations must make each save a single unit of work:
/// 1. read the previous version of the order,
/// 2. write the new version,
/// 3. select a [`crate::metrics::RecalculationRule`] from the previous and new versions,
/// 4. recompute the affected metrics over all the vendor's orders and write the vendor,
/// 5. create or update the vendor's snapshot, per the rule's [`crate::metrics::SnapshotPolicy`].
///
/// If step 4 fails, step 5 must not happen.
#[allow(async_fn_in_trait)]
pub trait VendorPerformanceDatabase: Clone + VendorManagement + OrderManagement + PerformanceHistory {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Saves a partial update to an existing purchase order and runs the metrics engine.
    ///
    /// The metrics of the vendor the order belongs to *after* the update are recalculated.
    async fn update_purchase_order(
        &self,
        id: i64,
        update: PurchaseOrderUpdate,
    ) -> Result<PurchaseOrderSaved, PurchaseOrderApiError>;

    /// Sets the acknowledgment date of the order to `timestamp` and runs the metrics engine.
    ///
    /// An order is only ever acknowledged once. If it already has an acknowledgment date, nothing is changed and
    /// [`AcknowledgeResult::AlreadyAcknowledged`] is returned.
    async fn acknowledge_purchase_order(
        &self,
        id: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<AcknowledgeResult, PurchaseOrderApiError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), PurchaseOrderApiError> {
        Ok(())
    }
}
