use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{types::Json, QueryBuilder, SqliteConnection};

use super::{first_row, is_foreign_key_violation, is_unique_violation};
use crate::{
    db_types::{NewPurchaseOrder, PurchaseOrder, PurchaseOrderUpdate},
    order_objects::OrderQueryFilter,
    traits::PurchaseOrderApiError,
};

/// Maps constraint violations on the `purchase_orders` table to their API errors.
fn map_constraint_error(e: sqlx::Error, po_number: Option<String>, vendor: Option<i64>) -> PurchaseOrderApiError {
    match (po_number, vendor) {
        (Some(po), _) if is_unique_violation(&e) => PurchaseOrderApiError::PoNumberAlreadyExists(po),
        (_, Some(vendor)) if is_foreign_key_violation(&e) => PurchaseOrderApiError::VendorNotFound(vendor),
        _ => e.into(),
    }
}

/// Inserts a new purchase order. This is not atomic. Embed the call in a transaction if you need it to be.
pub async fn insert_purchase_order(
    order: NewPurchaseOrder,
    conn: &mut SqliteConnection,
) -> Result<PurchaseOrder, PurchaseOrderApiError> {
    let po_number = order.po_number.clone();
    let vendor = order.vendor;
    let result: Result<Vec<PurchaseOrder>, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO purchase_orders (
                po_number,
                vendor,
                order_date,
                delivery_date,
                items,
                quantity,
                status,
                quality_rating,
                issue_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(order.po_number)
    .bind(order.vendor)
    .bind(order.order_date)
    .bind(order.delivery_date)
    .bind(Json(order.items))
    .bind(order.quantity)
    .bind(order.status.to_string())
    .bind(order.quality_rating)
    .bind(order.issue_date)
    .fetch_all(conn)
    .await;
    match result {
        Ok(rows) => {
            trace!("🗃️ Purchase order {po_number} inserted");
            first_row(rows).ok_or_else(|| sqlx::Error::RowNotFound.into())
        },
        Err(e) => Err(map_constraint_error(e, Some(po_number), Some(vendor))),
    }
}

pub async fn fetch_purchase_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<PurchaseOrder>, sqlx::Error> {
    let rows = sqlx::query_as("SELECT * FROM purchase_orders WHERE id = $1").bind(id).fetch_all(conn).await?;
    Ok(first_row(rows))
}

/// Fetches orders according to the criteria in the `OrderQueryFilter`, ordered by id.
pub async fn search_purchase_orders(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<PurchaseOrder>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM purchase_orders ");
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(vendor_id) = query.vendor_id {
        where_clause.push("vendor = ");
        where_clause.push_bind_unseparated(vendor_id);
    }
    if let Some(status) = query.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status.to_string());
    }
    builder.push(" ORDER BY id ASC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<PurchaseOrder>().fetch_all(conn).await?;
    trace!("🗃️ Result of search_purchase_orders: {}", orders.len());
    Ok(orders)
}

/// All orders placed with the vendor. This is the set the metrics are computed over.
pub async fn fetch_orders_for_vendor(
    vendor_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<PurchaseOrder>, sqlx::Error> {
    search_purchase_orders(OrderQueryFilter::default().with_vendor_id(vendor_id), conn).await
}

/// Writes a partial update. An empty update leaves the row untouched and returns it as is.
pub async fn update_purchase_order(
    id: i64,
    update: PurchaseOrderUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<PurchaseOrder>, PurchaseOrderApiError> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for purchase order {id}.");
        return Ok(fetch_purchase_order(id, conn).await?);
    }
    let po_number = update.po_number.clone();
    let vendor = update.vendor;
    let mut builder = QueryBuilder::new("UPDATE purchase_orders SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(po_number) = update.po_number {
        set_clause.push("po_number = ");
        set_clause.push_bind_unseparated(po_number);
    }
    if let Some(vendor) = update.vendor {
        set_clause.push("vendor = ");
        set_clause.push_bind_unseparated(vendor);
    }
    if let Some(order_date) = update.order_date {
        set_clause.push("order_date = ");
        set_clause.push_bind_unseparated(order_date);
    }
    if let Some(delivery_date) = update.delivery_date {
        set_clause.push("delivery_date = ");
        set_clause.push_bind_unseparated(delivery_date);
    }
    if let Some(items) = update.items {
        set_clause.push("items = ");
        set_clause.push_bind_unseparated(Json(items));
    }
    if let Some(quantity) = update.quantity {
        set_clause.push("quantity = ");
        set_clause.push_bind_unseparated(quantity);
    }
    if let Some(status) = update.status {
        set_clause.push("status = ");
        set_clause.push_bind_unseparated(status.to_string());
    }
    if let Some(rating) = update.quality_rating {
        set_clause.push("quality_rating = ");
        set_clause.push_bind_unseparated(rating);
    }
    if let Some(issue_date) = update.issue_date {
        set_clause.push("issue_date = ");
        set_clause.push_bind_unseparated(issue_date);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    builder
        .build_query_as::<PurchaseOrder>()
        .fetch_all(conn)
        .await
        .map(first_row)
        .map_err(|e| map_constraint_error(e, po_number, vendor))
}

pub async fn set_acknowledgment_date(
    id: i64,
    timestamp: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<PurchaseOrder, PurchaseOrderApiError> {
    let rows: Vec<PurchaseOrder> =
        sqlx::query_as("UPDATE purchase_orders SET acknowledgment_date = $1 WHERE id = $2 RETURNING *")
            .bind(timestamp)
            .bind(id)
            .fetch_all(conn)
            .await?;
    first_row(rows).ok_or(PurchaseOrderApiError::OrderNotFound(id))
}

pub async fn delete_purchase_order(id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM purchase_orders WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
