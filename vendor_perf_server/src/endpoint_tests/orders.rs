use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use vendor_perf_engine::{
    db_types::{OrderStatusType, PurchaseOrder, PurchaseOrderUpdate, VendorMetrics},
    metrics::{RecalculationOutcome, RecalculationRule, SnapshotOutcome},
    order_objects::{AcknowledgeResult, PurchaseOrderSaved},
    PurchaseOrderApi,
    PurchaseOrderApiError,
};

use super::{
    helpers::{bearer, json, send_request},
    mocks::MockOrderStore,
};
use crate::{
    middleware::BearerAuthMiddlewareFactory,
    routes::{
        AcknowledgePurchaseOrderRoute,
        CreatePurchaseOrderRoute,
        DeletePurchaseOrderRoute,
        PurchaseOrderRoute,
        PurchaseOrdersRoute,
        UpdatePurchaseOrderRoute,
    },
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 2, 14, 30, 0).unwrap()
}

fn order(id: i64, vendor: i64) -> PurchaseOrder {
    PurchaseOrder {
        id,
        po_number: format!("PO-{id:03}"),
        vendor,
        order_date: t0(),
        delivery_date: t0() + Duration::days(5),
        items: json!([{"sku": "widget", "qty": 10}]),
        quantity: 10,
        status: OrderStatusType::Pending,
        quality_rating: None,
        issue_date: t0(),
        acknowledgment_date: None,
    }
}

fn saved(previous: PurchaseOrder, order: PurchaseOrder, rule: Option<RecalculationRule>) -> PurchaseOrderSaved {
    let outcome = match rule {
        Some(rule) => RecalculationOutcome {
            vendor_id: order.vendor,
            rule: Some(rule),
            metrics: VendorMetrics::default(),
            snapshot: SnapshotOutcome::NoSnapshot,
        },
        None => RecalculationOutcome::unchanged(order.vendor, VendorMetrics::default()),
    };
    PurchaseOrderSaved { previous, order, outcome }
}

fn configure(store: MockOrderStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(PurchaseOrderApi::new(store))).service(
            web::scope("/api")
                .wrap(BearerAuthMiddlewareFactory::new())
                .service(PurchaseOrdersRoute::<MockOrderStore>::new())
                .service(CreatePurchaseOrderRoute::<MockOrderStore>::new())
                .service(AcknowledgePurchaseOrderRoute::<MockOrderStore>::new())
                .service(PurchaseOrderRoute::<MockOrderStore>::new())
                .service(UpdatePurchaseOrderRoute::<MockOrderStore>::new())
                .service(DeletePurchaseOrderRoute::<MockOrderStore>::new()),
        );
    }
}

#[actix_web::test]
async fn orders_require_token() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::put().uri("/api/purchase_orders/1/acknowledge/");
    let (status, _) = send_request(req, configure(MockOrderStore::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn list_orders_for_vendor() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderStore::new();
    store
        .expect_search_purchase_orders()
        .withf(|q| q.vendor_id == Some(2) && q.status.is_none())
        .times(1)
        .returning(|_| Ok(vec![order(1, 2), order(3, 2)]));
    let req = TestRequest::get().uri("/api/purchase_orders/?vendor_id=2").insert_header(bearer());
    let (status, body) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[1]["po_number"], "PO-003");
    assert_eq!(body[0]["status"], "pending");
    assert_eq!(body[0]["acknowledgment_date"], serde_json::Value::Null);
}

#[actix_web::test]
async fn list_orders_by_status() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderStore::new();
    store
        .expect_search_purchase_orders()
        .withf(|q| q.vendor_id.is_none() && q.status == Some(OrderStatusType::Completed))
        .returning(|_| Ok(vec![]));
    let req = TestRequest::get().uri("/api/purchase_orders?status=completed").insert_header(bearer());
    let (status, body) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn list_orders_bad_query() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/purchase_orders?vendor_id=acme").insert_header(bearer());
    let (status, body) = send_request(req, configure(MockOrderStore::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].is_string());
}

#[actix_web::test]
async fn create_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderStore::new();
    store
        .expect_insert_purchase_order()
        .withf(|o| o.po_number == "PO-001" && o.status == OrderStatusType::Pending && o.quality_rating.is_none())
        .times(1)
        .returning(|o| Ok(PurchaseOrder { items: o.items, ..order(1, o.vendor) }));
    let req = TestRequest::post().uri("/api/purchase_orders/").insert_header(bearer()).set_json(json!({
        "po_number": "PO-001",
        "vendor": 2,
        "order_date": "2024-04-02T14:30:00Z",
        "delivery_date": "2024-04-07T14:30:00Z",
        "issue_date": "2024-04-02T14:30:00Z",
        "items": [{"sku": "widget", "qty": 10}],
        "quantity": 10
    }));
    let (status, body) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::CREATED);
    let body = json(&body);
    assert_eq!(body["id"], 1);
    assert_eq!(body["vendor"], 2);
    assert_eq!(body["delivery_date"], "2024-04-07T14:30:00Z");
}

#[actix_web::test]
async fn create_order_errors() {
    let _ = env_logger::try_init().ok();
    let payload = |po: &str, vendor: i64| {
        json!({
            "po_number": po,
            "vendor": vendor,
            "order_date": "2024-04-02T14:30:00Z",
            "delivery_date": "2024-04-07T14:30:00Z",
            "issue_date": "2024-04-02T14:30:00Z",
            "quantity": 1
        })
    };

    let mut store = MockOrderStore::new();
    store.expect_insert_purchase_order().returning(|o| Err(PurchaseOrderApiError::VendorNotFound(o.vendor)));
    let req = TestRequest::post().uri("/api/purchase_orders").insert_header(bearer()).set_json(payload("PO-9", 9));
    let (status, body) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body), json!({"vendor": ["Invalid pk \"9\" - object does not exist."]}));

    let mut store = MockOrderStore::new();
    store
        .expect_insert_purchase_order()
        .returning(|o| Err(PurchaseOrderApiError::PoNumberAlreadyExists(o.po_number)));
    let req = TestRequest::post().uri("/api/purchase_orders").insert_header(bearer()).set_json(payload("PO-1", 1));
    let (status, body) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body), json!({"po_number": ["purchase order with this po number already exists."]}));

    let mut store = MockOrderStore::new();
    store.expect_insert_purchase_order().never();
    let req = TestRequest::post().uri("/api/purchase_orders").insert_header(bearer()).set_json(payload(" ", 1));
    let (status, body) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body), json!({"po_number": ["This field may not be blank."]}));
}

#[actix_web::test]
async fn fetch_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderStore::new();
    store.expect_fetch_purchase_order().returning(|id| Ok((id == 1).then(|| order(1, 2))));
    let req = TestRequest::get().uri("/api/purchase_orders/1").insert_header(bearer());
    let (status, body) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["items"][0]["sku"], "widget");

    let mut store = MockOrderStore::new();
    store.expect_fetch_purchase_order().returning(|_| Ok(None));
    let req = TestRequest::get().uri("/api/purchase_orders/2/").insert_header(bearer());
    let (status, _) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn complete_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderStore::new();
    store
        .expect_update_purchase_order()
        .withf(|id, u| {
            *id == 1 &&
                *u == PurchaseOrderUpdate::default().with_status(OrderStatusType::Completed).with_quality_rating(4.0)
        })
        .times(1)
        .returning(|id, u| {
            let previous = order(id, 2);
            let current = u.apply_to(&previous);
            Ok(saved(previous, current, Some(RecalculationRule::Completion)))
        });
    let req = TestRequest::put()
        .uri("/api/purchase_orders/1/")
        .insert_header(bearer())
        .set_json(json!({"status": "completed", "quality_rating": 4.0}));
    let (status, body) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["quality_rating"], 4.0);
    assert!(body.get("outcome").is_none());
}

#[actix_web::test]
async fn acknowledgment_date_cannot_be_set_directly() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderStore::new();
    store
        .expect_update_purchase_order()
        .withf(|_, u| *u == PurchaseOrderUpdate::default().with_quantity(12))
        .returning(|id, u| {
            let previous = order(id, 2);
            Ok(saved(previous.clone(), u.apply_to(&previous), None))
        });
    let req = TestRequest::put()
        .uri("/api/purchase_orders/1")
        .insert_header(bearer())
        .set_json(json!({"quantity": 12, "acknowledgment_date": "2024-04-02T15:00:00Z"}));
    let (status, body) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["quantity"], 12);
    assert_eq!(body["acknowledgment_date"], serde_json::Value::Null);
}

#[actix_web::test]
async fn update_missing_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderStore::new();
    store.expect_update_purchase_order().returning(|id, _| Err(PurchaseOrderApiError::OrderNotFound(id)));
    let req = TestRequest::put().uri("/api/purchase_orders/77").insert_header(bearer()).set_json(json!({"quantity": 1}));
    let (status, body) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json(&body)["error"].as_str().is_some_and(|s| s.contains("id 77")));
}

#[actix_web::test]
async fn acknowledge_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderStore::new();
    store.expect_acknowledge_purchase_order().times(1).returning(|id, timestamp| {
        let previous = order(id, 2);
        let current = PurchaseOrder { acknowledgment_date: Some(timestamp), ..previous.clone() };
        Ok(AcknowledgeResult::Acknowledged(saved(previous, current, Some(RecalculationRule::Acknowledgment))))
    });
    let req = TestRequest::put().uri("/api/purchase_orders/1/acknowledge/").insert_header(bearer());
    let (status, body) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({"message": "Purchase order acknowledged successfully"}));
}

#[actix_web::test]
async fn acknowledge_order_twice() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderStore::new();
    store.expect_acknowledge_purchase_order().returning(|id, _| {
        let order = PurchaseOrder { acknowledgment_date: Some(t0() + Duration::minutes(3)), ..order(id, 2) };
        Ok(AcknowledgeResult::AlreadyAcknowledged(order))
    });
    let req = TestRequest::put().uri("/api/purchase_orders/1/acknowledge").insert_header(bearer());
    let (status, body) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({"message": "Purchase order was already acknowledged"}));
}

#[actix_web::test]
async fn acknowledge_missing_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderStore::new();
    store.expect_acknowledge_purchase_order().returning(|id, _| Err(PurchaseOrderApiError::OrderNotFound(id)));
    let req = TestRequest::put().uri("/api/purchase_orders/404/acknowledge").insert_header(bearer());
    let (status, _) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderStore::new();
    store.expect_delete_purchase_order().returning(|id| Ok(id == 1));
    let req = TestRequest::delete().uri("/api/purchase_orders/1/").insert_header(bearer());
    let (status, _) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let mut store = MockOrderStore::new();
    store.expect_delete_purchase_order().returning(|_| Ok(false));
    let req = TestRequest::delete().uri("/api/purchase_orders/2/").insert_header(bearer());
    let (status, _) = send_request(req, configure(store)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
