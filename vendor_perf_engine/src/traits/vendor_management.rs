use thiserror::Error;

use crate::{
    db_types::{NewVendor, PerformanceSnapshot, Vendor, VendorUpdate},
    validation::ValidationErrors,
};

/// The vendor store.
#[allow(async_fn_in_trait)]
pub trait VendorManagement {
    /// Creates a vendor with all four metrics set to zero.
    async fn create_vendor(&self, vendor: NewVendor) -> Result<Vendor, VendorApiError>;

    async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, VendorApiError>;

    /// Fetches all vendors, ordered by id.
    async fn fetch_vendors(&self) -> Result<Vec<Vendor>, VendorApiError>;

    /// Applies a partial update to the descriptive fields of a vendor. Metric fields cannot be changed this way.
    ///
    /// Returns `None` if the vendor does not exist. An empty update returns the vendor unchanged.
    async fn update_vendor(&self, vendor_id: i64, update: VendorUpdate) -> Result<Option<Vendor>, VendorApiError>;

    /// Deletes the vendor, along with its purchase orders and performance history.
    /// Returns `false` if there was no such vendor.
    async fn delete_vendor(&self, vendor_id: i64) -> Result<bool, VendorApiError>;
}

/// Read access to the vendor performance history.
#[allow(async_fn_in_trait)]
pub trait PerformanceHistory {
    /// All snapshots for the vendor, oldest first.
    async fn fetch_performance_history(&self, vendor_id: i64) -> Result<Vec<PerformanceSnapshot>, VendorApiError>;

    /// The most recently created snapshot for the vendor, if any.
    async fn fetch_latest_snapshot(&self, vendor_id: i64) -> Result<Option<PerformanceSnapshot>, VendorApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum VendorApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A vendor with code {0} already exists")]
    VendorCodeAlreadyExists(String),
    #[error("The requested vendor (id {0}) does not exist")]
    VendorNotFound(i64),
    #[error("Invalid vendor. {0}")]
    ValidationFailed(ValidationErrors),
}

impl From<sqlx::Error> for VendorApiError {
    fn from(e: sqlx::Error) -> Self {
        VendorApiError::DatabaseError(e.to_string())
    }
}
