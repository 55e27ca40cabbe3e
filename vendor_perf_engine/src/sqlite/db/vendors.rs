use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use super::{first_row, is_unique_violation};
use crate::{
    db_types::{NewVendor, Vendor, VendorMetrics, VendorUpdate},
    traits::VendorApiError,
};

pub async fn insert_vendor(vendor: NewVendor, conn: &mut SqliteConnection) -> Result<Vendor, VendorApiError> {
    let code = vendor.vendor_code.clone();
    let result: Result<Vec<Vendor>, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO vendors (name, contact_details, address, vendor_code)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(vendor.name)
    .bind(vendor.contact_details)
    .bind(vendor.address)
    .bind(vendor.vendor_code)
    .fetch_all(conn)
    .await;
    match result {
        Ok(rows) => first_row(rows).ok_or_else(|| sqlx::Error::RowNotFound.into()),
        Err(e) if is_unique_violation(&e) => Err(VendorApiError::VendorCodeAlreadyExists(code)),
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_vendor(id: i64, conn: &mut SqliteConnection) -> Result<Option<Vendor>, sqlx::Error> {
    let rows = sqlx::query_as("SELECT * FROM vendors WHERE id = $1").bind(id).fetch_all(conn).await?;
    Ok(first_row(rows))
}

pub async fn fetch_vendors(conn: &mut SqliteConnection) -> Result<Vec<Vendor>, sqlx::Error> {
    let vendors = sqlx::query_as("SELECT * FROM vendors ORDER BY id").fetch_all(conn).await?;
    Ok(vendors)
}

pub async fn update_vendor(
    id: i64,
    update: VendorUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Vendor>, VendorApiError> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for vendor {id}. Returning the vendor unchanged.");
        return Ok(fetch_vendor(id, conn).await?);
    }
    let code = update.vendor_code.clone();
    let mut builder = QueryBuilder::new("UPDATE vendors SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(contact_details) = update.contact_details {
        set_clause.push("contact_details = ");
        set_clause.push_bind_unseparated(contact_details);
    }
    if let Some(address) = update.address {
        set_clause.push("address = ");
        set_clause.push_bind_unseparated(address);
    }
    if let Some(vendor_code) = update.vendor_code {
        set_clause.push("vendor_code = ");
        set_clause.push_bind_unseparated(vendor_code);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    match builder.build_query_as::<Vendor>().fetch_all(conn).await {
        Ok(rows) => Ok(first_row(rows)),
        Err(e) if is_unique_violation(&e) => Err(VendorApiError::VendorCodeAlreadyExists(code.unwrap_or_default())),
        Err(e) => Err(e.into()),
    }
}

/// Overwrites the cached metrics on the vendor record.
pub async fn update_metrics(
    id: i64,
    metrics: &VendorMetrics,
    conn: &mut SqliteConnection,
) -> Result<Vendor, VendorApiError> {
    let rows: Vec<Vendor> = sqlx::query_as(
        r#"
            UPDATE vendors SET
                on_time_delivery_rate = $1,
                quality_rating_avg = $2,
                average_response_time = $3,
                fulfillment_rate = $4
            WHERE id = $5
            RETURNING *;
        "#,
    )
    .bind(metrics.on_time_delivery_rate)
    .bind(metrics.quality_rating_avg)
    .bind(metrics.average_response_time)
    .bind(metrics.fulfillment_rate)
    .bind(id)
    .fetch_all(conn)
    .await?;
    first_row(rows).ok_or(VendorApiError::VendorNotFound(id))
}

pub async fn delete_vendor(id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM vendors WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
