//! `SqliteDatabase` is the SQLite implementation of a vendor performance engine backend.
//!
//! It implements all the traits defined in the [`crate::traits`] module.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{migrate::MigrateError, SqliteConnection, SqlitePool};

use super::db::{db_url, new_pool, performance, purchase_orders, users, vendors};
use crate::{
    db_types::{
        NewPurchaseOrder,
        NewUserAccount,
        NewVendor,
        PerformanceSnapshot,
        PurchaseOrder,
        PurchaseOrderUpdate,
        UserAccount,
        Vendor,
        VendorUpdate,
    },
    metrics::{self, RecalculationOutcome, RecalculationRule, SnapshotOutcome, SnapshotPolicy},
    order_objects::{AcknowledgeResult, OrderQueryFilter, PurchaseOrderSaved},
    traits::{
        AuthApiError,
        AuthManagement,
        OrderManagement,
        PerformanceHistory,
        PurchaseOrderApiError,
        VendorApiError,
        VendorManagement,
        VendorPerformanceDatabase,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the URL in `VPM_DATABASE_URL`, or the default.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Migrations are embedded in the binary.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        debug!("🗃️ Database migrations complete for {}", self.url);
        Ok(())
    }
}

/// Runs the metrics engine for a save that changed `previous` into `current`. Must be called on the same transaction
/// that wrote `current`.
///
/// The vendor record is written before the snapshot, so a failure writing the vendor leaves the history untouched.
async fn recalculate_for_save(
    previous: &PurchaseOrder,
    current: &PurchaseOrder,
    conn: &mut SqliteConnection,
) -> Result<RecalculationOutcome, PurchaseOrderApiError> {
    let vendor_id = current.vendor;
    let vendor = vendors::fetch_vendor(vendor_id, conn).await?.ok_or(PurchaseOrderApiError::VendorNotFound(vendor_id))?;
    let Some(rule) = RecalculationRule::select(previous, current) else {
        trace!("📈️ Purchase order {} saved with no tracked changes. Metrics untouched.", current.po_number);
        return Ok(RecalculationOutcome::unchanged(vendor_id, vendor.metrics()));
    };
    let orders = purchase_orders::fetch_orders_for_vendor(vendor_id, conn).await?;
    let metrics = metrics::recalculate(rule, &orders, &vendor.metrics());
    vendors::update_metrics(vendor_id, &metrics, conn).await?;
    trace!("📈️ Vendor {vendor_id} metrics after {rule}: {metrics:?}");
    let snapshot = match rule.snapshot_policy() {
        SnapshotPolicy::CreateNew => {
            let snapshot = performance::insert_snapshot(vendor_id, Utc::now(), &metrics, conn).await?;
            SnapshotOutcome::Created(snapshot.id)
        },
        SnapshotPolicy::UpdateLatest => match performance::fetch_latest_snapshot(vendor_id, conn).await? {
            Some(latest) => {
                let merged = metrics::merge_affected(rule, &metrics, &latest.metrics());
                performance::update_snapshot_metrics(latest.id, &merged, conn).await?;
                SnapshotOutcome::UpdatedLatest(latest.id)
            },
            None => SnapshotOutcome::NoSnapshot,
        },
    };
    debug!(
        "📈️ Purchase order {} triggered a {rule} recalculation for vendor {vendor_id}. Snapshot: {snapshot:?}",
        current.po_number
    );
    Ok(RecalculationOutcome { vendor_id, rule: Some(rule), metrics, snapshot })
}

async fn save_order_update(
    id: i64,
    update: PurchaseOrderUpdate,
    conn: &mut SqliteConnection,
) -> Result<PurchaseOrderSaved, PurchaseOrderApiError> {
    let previous =
        purchase_orders::fetch_purchase_order(id, conn).await?.ok_or(PurchaseOrderApiError::OrderNotFound(id))?;
    let order = purchase_orders::update_purchase_order(id, update, conn)
        .await?
        .ok_or(PurchaseOrderApiError::OrderNotFound(id))?;
    let outcome = recalculate_for_save(&previous, &order, conn).await?;
    Ok(PurchaseOrderSaved { previous, order, outcome })
}

async fn save_acknowledgment(
    id: i64,
    timestamp: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<AcknowledgeResult, PurchaseOrderApiError> {
    let previous =
        purchase_orders::fetch_purchase_order(id, conn).await?.ok_or(PurchaseOrderApiError::OrderNotFound(id))?;
    if previous.acknowledgment_date.is_some() {
        debug!("🗃️ Purchase order {} was already acknowledged. Nothing to do.", previous.po_number);
        return Ok(AcknowledgeResult::AlreadyAcknowledged(previous));
    }
    let order = purchase_orders::set_acknowledgment_date(id, timestamp, conn).await?;
    let outcome = recalculate_for_save(&previous, &order, conn).await?;
    Ok(AcknowledgeResult::Acknowledged(PurchaseOrderSaved { previous, order, outcome }))
}

/// Opens a transaction that holds the database write lock from the start, waiting for it if another save has it.
async fn begin_immediate(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("BEGIN IMMEDIATE").execute(conn).await?;
    Ok(())
}

/// Commits the transaction opened by [`begin_immediate`] if `result` is a success, and rolls it back otherwise.
async fn finish_transaction<T>(
    result: Result<T, PurchaseOrderApiError>,
    conn: &mut SqliteConnection,
) -> Result<T, PurchaseOrderApiError> {
    let result = match result {
        Ok(value) => match sqlx::query("COMMIT").execute(&mut *conn).await {
            Ok(_) => return Ok(value),
            Err(e) => Err(PurchaseOrderApiError::from(e)),
        },
        Err(e) => Err(e),
    };
    if let Err(rollback_err) = sqlx::query("ROLLBACK").execute(conn).await {
        error!("🗃️ Could not roll back failed purchase order save: {rollback_err}");
    }
    result
}

impl VendorPerformanceDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    /// In a single atomic transaction:
    /// * fetches the order as it is now,
    /// * writes the update,
    /// * runs the metrics engine against the two versions, updating the vendor and its history.
    ///
    /// Concurrent saves queue on the database write lock and run one at a time.
    async fn update_purchase_order(
        &self,
        id: i64,
        update: PurchaseOrderUpdate,
    ) -> Result<PurchaseOrderSaved, PurchaseOrderApiError> {
        let mut conn = self.pool.acquire().await?;
        begin_immediate(&mut conn).await?;
        let result = save_order_update(id, update, &mut conn).await;
        finish_transaction(result, &mut conn).await
    }

    async fn acknowledge_purchase_order(
        &self,
        id: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<AcknowledgeResult, PurchaseOrderApiError> {
        let mut conn = self.pool.acquire().await?;
        begin_immediate(&mut conn).await?;
        let result = save_acknowledgment(id, timestamp, &mut conn).await;
        finish_transaction(result, &mut conn).await
    }

    async fn close(&mut self) -> Result<(), PurchaseOrderApiError> {
        self.pool.close().await;
        Ok(())
    }
}

impl VendorManagement for SqliteDatabase {
    async fn create_vendor(&self, vendor: NewVendor) -> Result<Vendor, VendorApiError> {
        let mut conn = self.pool.acquire().await?;
        let vendor = vendors::insert_vendor(vendor, &mut conn).await?;
        debug!("🗃️ Vendor {} created with id {}", vendor.vendor_code, vendor.id);
        Ok(vendor)
    }

    async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, VendorApiError> {
        let mut conn = self.pool.acquire().await?;
        let vendor = vendors::fetch_vendor(vendor_id, &mut conn).await?;
        Ok(vendor)
    }

    async fn fetch_vendors(&self) -> Result<Vec<Vendor>, VendorApiError> {
        let mut conn = self.pool.acquire().await?;
        let vendors = vendors::fetch_vendors(&mut conn).await?;
        Ok(vendors)
    }

    async fn update_vendor(&self, vendor_id: i64, update: VendorUpdate) -> Result<Option<Vendor>, VendorApiError> {
        let mut conn = self.pool.acquire().await?;
        vendors::update_vendor(vendor_id, update, &mut conn).await
    }

    async fn delete_vendor(&self, vendor_id: i64) -> Result<bool, VendorApiError> {
        let mut conn = self.pool.acquire().await?;
        let deleted = vendors::delete_vendor(vendor_id, &mut conn).await?;
        if deleted {
            debug!("🗃️ Vendor {vendor_id} deleted, along with its purchase orders and history");
        }
        Ok(deleted)
    }
}

impl PerformanceHistory for SqliteDatabase {
    async fn fetch_performance_history(&self, vendor_id: i64) -> Result<Vec<PerformanceSnapshot>, VendorApiError> {
        let mut conn = self.pool.acquire().await?;
        let history = performance::fetch_history(vendor_id, &mut conn).await?;
        Ok(history)
    }

    async fn fetch_latest_snapshot(&self, vendor_id: i64) -> Result<Option<PerformanceSnapshot>, VendorApiError> {
        let mut conn = self.pool.acquire().await?;
        let snapshot = performance::fetch_latest_snapshot(vendor_id, &mut conn).await?;
        Ok(snapshot)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_purchase_order(&self, order: NewPurchaseOrder) -> Result<PurchaseOrder, PurchaseOrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = purchase_orders::insert_purchase_order(order, &mut conn).await?;
        debug!("🗃️ Purchase order {} has been saved in the DB with id {}", order.po_number, order.id);
        Ok(order)
    }

    async fn fetch_purchase_order(&self, id: i64) -> Result<Option<PurchaseOrder>, PurchaseOrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = purchase_orders::fetch_purchase_order(id, &mut conn).await?;
        Ok(order)
    }

    async fn search_purchase_orders(
        &self,
        query: OrderQueryFilter,
    ) -> Result<Vec<PurchaseOrder>, PurchaseOrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let orders = purchase_orders::search_purchase_orders(query, &mut conn).await?;
        Ok(orders)
    }

    async fn delete_purchase_order(&self, id: i64) -> Result<bool, PurchaseOrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let deleted = purchase_orders::delete_purchase_order(id, &mut conn).await?;
        Ok(deleted)
    }
}

impl AuthManagement for SqliteDatabase {
    async fn create_user(&self, user: NewUserAccount) -> Result<UserAccount, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::insert_user(user, &mut conn).await?;
        debug!("🗃️ User {} registered with id {}", user.username, user.id);
        Ok(user)
    }

    async fn fetch_user(&self, user_id: i64) -> Result<Option<UserAccount>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user_by_id(user_id, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<UserAccount>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user_by_username(username, &mut conn).await?;
        Ok(user)
    }
}
