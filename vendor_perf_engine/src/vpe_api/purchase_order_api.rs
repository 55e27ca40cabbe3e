use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    db_types::{NewPurchaseOrder, PurchaseOrder, PurchaseOrderUpdate},
    order_objects::{AcknowledgeResult, OrderQueryFilter, PurchaseOrderSaved},
    traits::{PurchaseOrderApiError, VendorPerformanceDatabase},
    validation::{validate_new_purchase_order, validate_purchase_order_update},
};

/// `PurchaseOrderApi` is the entry point for everything that happens to purchase orders.
///
/// Creating an order simply stores it. Every subsequent save (a generic update or an acknowledgment) goes through
/// the backend's single-transaction save path, which runs the metrics engine against the previous and new versions of
/// the order. See [`crate::metrics`] for the rules.
pub struct PurchaseOrderApi<B> {
    db: B,
}

impl<B: Debug> Debug for PurchaseOrderApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PurchaseOrderApi ({:?})", self.db)
    }
}

impl<B> PurchaseOrderApi<B>
where B: VendorPerformanceDatabase
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Stores a new purchase order. The vendor's metrics are not touched, whatever the initial status.
    pub async fn create_purchase_order(&self, order: NewPurchaseOrder) -> Result<PurchaseOrder, PurchaseOrderApiError> {
        validate_new_purchase_order(&order).map_err(PurchaseOrderApiError::ValidationFailed)?;
        let order = self.db.insert_purchase_order(order).await?;
        info!("🗃️ Purchase order {} created for vendor {}", order.po_number, order.vendor);
        Ok(order)
    }

    pub async fn fetch_purchase_order(&self, id: i64) -> Result<Option<PurchaseOrder>, PurchaseOrderApiError> {
        self.db.fetch_purchase_order(id).await
    }

    pub async fn search_purchase_orders(
        &self,
        query: OrderQueryFilter,
    ) -> Result<Vec<PurchaseOrder>, PurchaseOrderApiError> {
        trace!("🗃️ Searching purchase orders. {query}");
        self.db.search_purchase_orders(query).await
    }

    /// Saves a partial update to the order and runs the metrics engine.
    pub async fn update_purchase_order(
        &self,
        id: i64,
        update: PurchaseOrderUpdate,
    ) -> Result<PurchaseOrderSaved, PurchaseOrderApiError> {
        validate_purchase_order_update(&update).map_err(PurchaseOrderApiError::ValidationFailed)?;
        let saved = self.db.update_purchase_order(id, update).await?;
        log_outcome(&saved);
        Ok(saved)
    }

    /// Marks the order as acknowledged by the vendor at the current server time.
    ///
    /// Acknowledging an order twice is harmless: the original acknowledgment date is kept and nothing is recomputed.
    pub async fn acknowledge_purchase_order(&self, id: i64) -> Result<AcknowledgeResult, PurchaseOrderApiError> {
        let result = self.db.acknowledge_purchase_order(id, Utc::now()).await?;
        match &result {
            AcknowledgeResult::Acknowledged(saved) => log_outcome(saved),
            AcknowledgeResult::AlreadyAcknowledged(order) => {
                debug!("📈️ Purchase order {} was already acknowledged. No recalculation.", order.po_number)
            },
        }
        Ok(result)
    }

    /// Deletes the order. The vendor's cached metrics are not recomputed.
    pub async fn delete_purchase_order(&self, id: i64) -> Result<(), PurchaseOrderApiError> {
        if self.db.delete_purchase_order(id).await? {
            info!("🗃️ Purchase order {id} deleted");
            Ok(())
        } else {
            Err(PurchaseOrderApiError::OrderNotFound(id))
        }
    }
}

fn log_outcome(saved: &PurchaseOrderSaved) {
    let outcome = &saved.outcome;
    match outcome.rule {
        Some(rule) => info!(
            "📈️ Purchase order {} saved. Vendor {} metrics recalculated ({rule}): {:?}. Snapshot: {:?}",
            saved.order.po_number, outcome.vendor_id, outcome.metrics, outcome.snapshot
        ),
        None => debug!("📈️ Purchase order {} saved. No metrics affected.", saved.order.po_number),
    }
}
