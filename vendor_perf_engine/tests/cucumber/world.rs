use std::collections::HashMap;

use cucumber::World;
use log::*;
use vendor_perf_engine::{db_types::PurchaseOrder, PurchaseOrderApi, SqliteDatabase, VendorApi};

use crate::support::prepare_env::prepare_test_env;

#[derive(Default, Debug, World)]
pub struct VendorPerfWorld {
    pub system: Option<VendorPerfSystem>,
}

#[derive(Debug)]
pub struct VendorPerfSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub vendors: VendorApi<SqliteDatabase>,
    pub orders: PurchaseOrderApi<SqliteDatabase>,
    /// Vendor ids by vendor code
    pub vendor_ids: HashMap<String, i64>,
    /// Purchase order ids by PO number
    pub order_ids: HashMap<String, i64>,
}

impl VendorPerfWorld {
    pub async fn system(&mut self) -> &mut VendorPerfSystem {
        if self.system.is_none() {
            self.system = Some(VendorPerfSystem::new().await);
        }
        self.system.as_mut().expect("System not initialised")
    }
}

impl VendorPerfSystem {
    pub async fn new() -> Self {
        let (db_path, db) = prepare_test_env().await;
        debug!("🚀️ Created database: {db_path}");
        let vendors = VendorApi::new(db.clone());
        let orders = PurchaseOrderApi::new(db.clone());
        Self { db_path, db, vendors, orders, vendor_ids: HashMap::new(), order_ids: HashMap::new() }
    }

    pub fn vendor_id(&self, code: &str) -> i64 {
        *self.vendor_ids.get(code).unwrap_or_else(|| panic!("Unknown vendor {code}"))
    }

    pub fn order_id(&self, po_number: &str) -> i64 {
        *self.order_ids.get(po_number).unwrap_or_else(|| panic!("Unknown purchase order {po_number}"))
    }

    pub async fn order(&self, po_number: &str) -> PurchaseOrder {
        let id = self.order_id(po_number);
        self.orders.fetch_purchase_order(id).await.expect("Error fetching order").expect("Order does not exist")
    }
}
