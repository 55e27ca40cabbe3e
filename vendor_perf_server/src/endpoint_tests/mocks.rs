use chrono::{DateTime, Utc};
use mockall::mock;
use vendor_perf_engine::{
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
    order_objects::{AcknowledgeResult, OrderQueryFilter, PurchaseOrderSaved},
    AuthApiError,
    AuthManagement,
    OrderManagement,
    PerformanceHistory,
    PurchaseOrderApiError,
    VendorApiError,
    VendorManagement,
    VendorPerformanceDatabase,
};

mock! {
    pub VendorStore {}
    impl VendorManagement for VendorStore {
        async fn create_vendor(&self, vendor: NewVendor) -> Result<Vendor, VendorApiError>;
        async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, VendorApiError>;
        async fn fetch_vendors(&self) -> Result<Vec<Vendor>, VendorApiError>;
        async fn update_vendor(&self, vendor_id: i64, update: VendorUpdate) -> Result<Option<Vendor>, VendorApiError>;
        async fn delete_vendor(&self, vendor_id: i64) -> Result<bool, VendorApiError>;
    }
    impl PerformanceHistory for VendorStore {
        async fn fetch_performance_history(&self, vendor_id: i64) -> Result<Vec<PerformanceSnapshot>, VendorApiError>;
        async fn fetch_latest_snapshot(&self, vendor_id: i64) -> Result<Option<PerformanceSnapshot>, VendorApiError>;
    }
}

mock! {
    pub OrderStore {}
    impl Clone for OrderStore {
        fn clone(&self) -> Self;
    }
    impl VendorManagement for OrderStore {
        async fn create_vendor(&self, vendor: NewVendor) -> Result<Vendor, VendorApiError>;
        async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, VendorApiError>;
        async fn fetch_vendors(&self) -> Result<Vec<Vendor>, VendorApiError>;
        async fn update_vendor(&self, vendor_id: i64, update: VendorUpdate) -> Result<Option<Vendor>, VendorApiError>;
        async fn delete_vendor(&self, vendor_id: i64) -> Result<bool, VendorApiError>;
    }
    impl PerformanceHistory for OrderStore {
        async fn fetch_performance_history(&self, vendor_id: i64) -> Result<Vec<PerformanceSnapshot>, VendorApiError>;
        async fn fetch_latest_snapshot(&self, vendor_id: i64) -> Result<Option<PerformanceSnapshot>, VendorApiError>;
    }
    impl OrderManagement for OrderStore {
        async fn insert_purchase_order(&self, order: NewPurchaseOrder) -> Result<PurchaseOrder, PurchaseOrderApiError>;
        async fn fetch_purchase_order(&self, id: i64) -> Result<Option<PurchaseOrder>, PurchaseOrderApiError>;
        async fn search_purchase_orders(&self, query: OrderQueryFilter) -> Result<Vec<PurchaseOrder>, PurchaseOrderApiError>;
        async fn delete_purchase_order(&self, id: i64) -> Result<bool, PurchaseOrderApiError>;
    }
    impl VendorPerformanceDatabase for OrderStore {
        fn url(&self) -> &str;
        async fn update_purchase_order(&self, id: i64, update: PurchaseOrderUpdate) -> Result<PurchaseOrderSaved, PurchaseOrderApiError>;
        async fn acknowledge_purchase_order(&self, id: i64, timestamp: DateTime<Utc>) -> Result<AcknowledgeResult, PurchaseOrderApiError>;
    }
}

mock! {
    pub UserStore {}
    impl AuthManagement for UserStore {
        async fn create_user(&self, user: NewUserAccount) -> Result<UserAccount, AuthApiError>;
        async fn fetch_user(&self, user_id: i64) -> Result<Option<UserAccount>, AuthApiError>;
        async fn fetch_user_by_username(&self, username: &str) -> Result<Option<UserAccount>, AuthApiError>;
    }
}
