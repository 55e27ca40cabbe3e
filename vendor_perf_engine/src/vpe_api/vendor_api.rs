use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewVendor, PerformanceSnapshot, Vendor, VendorUpdate},
    traits::{PerformanceHistory, VendorApiError, VendorManagement},
    validation::{validate_new_vendor, validate_vendor_update},
};

/// Vendor CRUD plus the vendor's performance history.
///
/// The cached metrics on a vendor can only be read through this API. They are written by the metrics engine when
/// purchase orders are saved.
pub struct VendorApi<B> {
    db: B,
}

impl<B: Debug> Debug for VendorApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VendorApi ({:?})", self.db)
    }
}

impl<B> VendorApi<B>
where B: VendorManagement + PerformanceHistory
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn create_vendor(&self, vendor: NewVendor) -> Result<Vendor, VendorApiError> {
        validate_new_vendor(&vendor).map_err(VendorApiError::ValidationFailed)?;
        let vendor = self.db.create_vendor(vendor).await?;
        info!("🗃️ New vendor {} [{}] registered", vendor.name, vendor.vendor_code);
        Ok(vendor)
    }

    pub async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, VendorApiError> {
        self.db.fetch_vendor(vendor_id).await
    }

    pub async fn fetch_vendors(&self) -> Result<Vec<Vendor>, VendorApiError> {
        self.db.fetch_vendors().await
    }

    /// Updates the descriptive fields of a vendor. Returns [`VendorApiError::VendorNotFound`] if there is no such
    /// vendor.
    pub async fn update_vendor(&self, vendor_id: i64, update: VendorUpdate) -> Result<Vendor, VendorApiError> {
        validate_vendor_update(&update).map_err(VendorApiError::ValidationFailed)?;
        self.db.update_vendor(vendor_id, update).await?.ok_or(VendorApiError::VendorNotFound(vendor_id))
    }

    /// Deletes the vendor, its purchase orders, and its performance history.
    pub async fn delete_vendor(&self, vendor_id: i64) -> Result<(), VendorApiError> {
        if self.db.delete_vendor(vendor_id).await? {
            info!("🗃️ Vendor {vendor_id} deleted");
            Ok(())
        } else {
            Err(VendorApiError::VendorNotFound(vendor_id))
        }
    }

    /// The vendor's performance snapshots, oldest first. Returns [`VendorApiError::VendorNotFound`] for an unknown
    /// vendor, and an empty list for a vendor that has never had an order completed.
    pub async fn performance_history(&self, vendor_id: i64) -> Result<Vec<PerformanceSnapshot>, VendorApiError> {
        if self.db.fetch_vendor(vendor_id).await?.is_none() {
            return Err(VendorApiError::VendorNotFound(vendor_id));
        }
        let history = self.db.fetch_performance_history(vendor_id).await?;
        trace!("🗃️ Vendor {vendor_id} has {} performance snapshots", history.len());
        Ok(history)
    }

    pub async fn latest_snapshot(&self, vendor_id: i64) -> Result<Option<PerformanceSnapshot>, VendorApiError> {
        self.db.fetch_latest_snapshot(vendor_id).await
    }
}
