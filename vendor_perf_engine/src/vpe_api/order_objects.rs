use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    db_types::{OrderStatusType, PurchaseOrder},
    metrics::RecalculationOutcome,
};

/// Criteria for listing purchase orders. Empty criteria match every order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQueryFilter {
    pub vendor_id: Option<i64>,
    pub status: Option<OrderStatusType>,
}

impl OrderQueryFilter {
    pub fn with_vendor_id(mut self, vendor_id: i64) -> Self {
        self.vendor_id = Some(vendor_id);
        self
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.vendor_id.is_none() && self.status.is_none()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "No filters.");
        }
        if let Some(vendor_id) = self.vendor_id {
            write!(f, "vendor_id: {vendor_id}. ")?;
        }
        if let Some(status) = self.status {
            write!(f, "status: {status}. ")?;
        }
        Ok(())
    }
}

/// The result of saving an existing purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderSaved {
    /// The order as it was before the save
    pub previous: PurchaseOrder,
    /// The order as it is now stored
    pub order: PurchaseOrder,
    pub outcome: RecalculationOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcknowledgeResult {
    Acknowledged(PurchaseOrderSaved),
    /// The order had already been acknowledged. It is returned as is.
    AlreadyAcknowledged(PurchaseOrder),
}

impl AcknowledgeResult {
    pub fn order(&self) -> &PurchaseOrder {
        match self {
            AcknowledgeResult::Acknowledged(saved) => &saved.order,
            AcknowledgeResult::AlreadyAcknowledged(order) => order,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, AcknowledgeResult::Acknowledged(_))
    }
}
