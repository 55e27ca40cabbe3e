use chrono::{Duration, TimeZone, Utc};
use cucumber::{given, then, when};
use vendor_perf_engine::{
    db_types::{NewPurchaseOrder, NewVendor, OrderStatusType, PurchaseOrderUpdate, Vendor},
    PerformanceHistory,
};

use crate::cucumber::{world::VendorPerfSystem, VendorPerfWorld};

const EPSILON: f64 = 1e-6;

#[given(expr = "a vendor {string} with code {string}")]
async fn create_vendor(world: &mut VendorPerfWorld, name: String, code: String) {
    let sys = world.system().await;
    let vendor = sys.vendors.create_vendor(NewVendor::new(name, code.clone())).await.expect("Error creating vendor");
    sys.vendor_ids.insert(code, vendor.id);
}

#[given(expr = "purchase order {string} for vendor {string} issued {int} day(s) before delivery")]
async fn order_issued_early(world: &mut VendorPerfWorld, po_number: String, code: String, days: i64) {
    insert_order(world.system().await, po_number, code, -days).await;
}

#[given(expr = "purchase order {string} for vendor {string} issued {int} day(s) after delivery")]
async fn order_issued_late(world: &mut VendorPerfWorld, po_number: String, code: String, days: i64) {
    insert_order(world.system().await, po_number, code, days).await;
}

#[given(expr = "purchase order {string} for vendor {string} issued on the delivery date")]
async fn order_issued_on_time(world: &mut VendorPerfWorld, po_number: String, code: String) {
    insert_order(world.system().await, po_number, code, 0).await;
}

async fn insert_order(sys: &mut VendorPerfSystem, po_number: String, code: String, days_late: i64) {
    let vendor_id = sys.vendor_id(&code);
    let delivery = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
    let order = NewPurchaseOrder::new(po_number.clone(), vendor_id, delivery)
        .with_issue_date(delivery + Duration::days(days_late))
        .with_items(serde_json::json!([{"sku": "widget", "qty": 10}]), 10);
    let order = sys.orders.create_purchase_order(order).await.expect("Error creating purchase order");
    sys.order_ids.insert(po_number, order.id);
}

async fn update_order(sys: &mut VendorPerfSystem, po_number: &str, update: PurchaseOrderUpdate) {
    let id = sys.order_id(po_number);
    sys.orders.update_purchase_order(id, update).await.expect("Error updating purchase order");
}

#[when(expr = "purchase order {string} is completed with quality rating {float}")]
async fn complete_with_rating(world: &mut VendorPerfWorld, po_number: String, rating: f64) {
    let update = PurchaseOrderUpdate::default().with_status(OrderStatusType::Completed).with_quality_rating(rating);
    update_order(world.system().await, &po_number, update).await;
}

#[when(expr = "purchase order {string} is completed without a rating")]
async fn complete_without_rating(world: &mut VendorPerfWorld, po_number: String) {
    let update = PurchaseOrderUpdate::default().with_status(OrderStatusType::Completed);
    update_order(world.system().await, &po_number, update).await;
}

#[when(expr = "purchase order {string} is canceled")]
async fn cancel(world: &mut VendorPerfWorld, po_number: String) {
    let update = PurchaseOrderUpdate::default().with_status(OrderStatusType::Canceled);
    update_order(world.system().await, &po_number, update).await;
}

#[when(expr = "the quality rating of purchase order {string} is changed to {float}")]
async fn change_rating(world: &mut VendorPerfWorld, po_number: String, rating: f64) {
    update_order(world.system().await, &po_number, PurchaseOrderUpdate::default().with_quality_rating(rating)).await;
}

#[when(expr = "the quantity of purchase order {string} is changed to {int}")]
async fn change_quantity(world: &mut VendorPerfWorld, po_number: String, quantity: i64) {
    update_order(world.system().await, &po_number, PurchaseOrderUpdate::default().with_quantity(quantity)).await;
}

#[when(expr = "purchase order {string} is acknowledged")]
async fn acknowledge(world: &mut VendorPerfWorld, po_number: String) {
    let sys = world.system().await;
    let id = sys.order_id(&po_number);
    sys.orders.acknowledge_purchase_order(id).await.expect("Error acknowledging purchase order");
}

async fn fetch_vendor(sys: &VendorPerfSystem, code: &str) -> Vendor {
    let id = sys.vendor_id(code);
    sys.vendors.fetch_vendor(id).await.expect("Error fetching vendor").expect("Vendor does not exist")
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!((actual - expected).abs() < EPSILON, "{what} was {actual}, expected {expected}");
}

#[then(expr = "vendor {string} has an on-time delivery rate of {float}")]
async fn check_on_time(world: &mut VendorPerfWorld, code: String, expected: f64) {
    let vendor = fetch_vendor(world.system().await, &code).await;
    assert_close(vendor.on_time_delivery_rate, expected, "On-time delivery rate");
}

#[then(expr = "vendor {string} has a quality rating average of {float}")]
async fn check_quality(world: &mut VendorPerfWorld, code: String, expected: f64) {
    let vendor = fetch_vendor(world.system().await, &code).await;
    assert_close(vendor.quality_rating_avg, expected, "Quality rating average");
}

#[then(expr = "vendor {string} has a fulfillment rate of {float}")]
async fn check_fulfillment(world: &mut VendorPerfWorld, code: String, expected: f64) {
    let vendor = fetch_vendor(world.system().await, &code).await;
    assert_close(vendor.fulfillment_rate, expected, "Fulfillment rate");
}

#[then(expr = "vendor {string} has an average response time of {float} seconds")]
async fn check_response_time(world: &mut VendorPerfWorld, code: String, expected: f64) {
    let vendor = fetch_vendor(world.system().await, &code).await;
    assert_close(vendor.average_response_time, expected, "Average response time");
}

#[then(expr = "vendor {string} has a positive average response time")]
async fn check_positive_response_time(world: &mut VendorPerfWorld, code: String) {
    let vendor = fetch_vendor(world.system().await, &code).await;
    assert!(vendor.average_response_time > 0.0, "Average response time was {}", vendor.average_response_time);
}

#[then(expr = "vendor {string} has {int} performance snapshot(s)")]
async fn check_snapshot_count(world: &mut VendorPerfWorld, code: String, count: usize) {
    let sys = world.system().await;
    let history = sys.vendors.performance_history(sys.vendor_id(&code)).await.expect("Error fetching history");
    assert_eq!(history.len(), count, "Unexpected number of snapshots");
}

#[then(expr = "the latest snapshot for vendor {string} has a quality rating average of {float}")]
async fn check_latest_quality(world: &mut VendorPerfWorld, code: String, expected: f64) {
    let sys = world.system().await;
    let snapshot = sys.db.fetch_latest_snapshot(sys.vendor_id(&code)).await.unwrap().expect("No snapshot");
    assert_close(snapshot.quality_rating_avg, expected, "Snapshot quality rating average");
}

#[then(expr = "the latest snapshot for vendor {string} has a fulfillment rate of {float}")]
async fn check_latest_fulfillment(world: &mut VendorPerfWorld, code: String, expected: f64) {
    let sys = world.system().await;
    let snapshot = sys.db.fetch_latest_snapshot(sys.vendor_id(&code)).await.unwrap().expect("No snapshot");
    assert_close(snapshot.fulfillment_rate, expected, "Snapshot fulfillment rate");
}

#[then(expr = "the latest snapshot for vendor {string} has an on-time delivery rate of {float}")]
async fn check_latest_on_time(world: &mut VendorPerfWorld, code: String, expected: f64) {
    let sys = world.system().await;
    let snapshot = sys.db.fetch_latest_snapshot(sys.vendor_id(&code)).await.unwrap().expect("No snapshot");
    assert_close(snapshot.on_time_delivery_rate, expected, "Snapshot on-time delivery rate");
}

#[then(expr = "purchase order {string} has been acknowledged")]
async fn check_acknowledged(world: &mut VendorPerfWorld, po_number: String) {
    let order = world.system().await.order(&po_number).await;
    assert!(order.acknowledgment_date.is_some(), "Purchase order {po_number} has not been acknowledged");
}
