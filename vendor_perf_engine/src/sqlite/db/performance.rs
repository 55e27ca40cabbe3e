use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use super::first_row;
use crate::db_types::{PerformanceSnapshot, VendorMetrics};

pub async fn insert_snapshot(
    vendor_id: i64,
    date: DateTime<Utc>,
    metrics: &VendorMetrics,
    conn: &mut SqliteConnection,
) -> Result<PerformanceSnapshot, sqlx::Error> {
    let rows: Vec<PerformanceSnapshot> = sqlx::query_as(
        r#"
            INSERT INTO historical_performance (
                vendor,
                date,
                on_time_delivery_rate,
                quality_rating_avg,
                average_response_time,
                fulfillment_rate
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(vendor_id)
    .bind(date)
    .bind(metrics.on_time_delivery_rate)
    .bind(metrics.quality_rating_avg)
    .bind(metrics.average_response_time)
    .bind(metrics.fulfillment_rate)
    .fetch_all(conn)
    .await?;
    first_row(rows).ok_or(sqlx::Error::RowNotFound)
}

/// The most recent snapshot for the vendor. Ties on `date` go to the snapshot inserted last.
pub async fn fetch_latest_snapshot(
    vendor_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<PerformanceSnapshot>, sqlx::Error> {
    let rows =
        sqlx::query_as("SELECT * FROM historical_performance WHERE vendor = $1 ORDER BY date DESC, id DESC LIMIT 1")
            .bind(vendor_id)
            .fetch_all(conn)
            .await?;
    Ok(first_row(rows))
}

pub async fn fetch_history(
    vendor_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<PerformanceSnapshot>, sqlx::Error> {
    let history = sqlx::query_as("SELECT * FROM historical_performance WHERE vendor = $1 ORDER BY date ASC, id ASC")
        .bind(vendor_id)
        .fetch_all(conn)
        .await?;
    Ok(history)
}

/// Overwrites the metric columns of an existing snapshot. The snapshot date is left alone.
pub async fn update_snapshot_metrics(
    snapshot_id: i64,
    metrics: &VendorMetrics,
    conn: &mut SqliteConnection,
) -> Result<PerformanceSnapshot, sqlx::Error> {
    let rows: Vec<PerformanceSnapshot> = sqlx::query_as(
        r#"
            UPDATE historical_performance SET
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
    .bind(snapshot_id)
    .fetch_all(conn)
    .await?;
    first_row(rows).ok_or(sqlx::Error::RowNotFound)
}
