//! # Metrics recalculation engine
//!
//! Vendors carry four cached metrics (see [`VendorMetrics`]). They are never edited directly. Instead, every time an
//! existing purchase order is saved, the previous and new versions of the order are compared and
//! [`RecalculationRule::select`] picks at most one rule to apply:
//!
//! 1. [`RecalculationRule::Completion`]: all four metrics are recomputed and a new history snapshot is created.
//! 2. [`RecalculationRule::QualityRatingEdit`]: only the quality rating average is recomputed.
//! 3. [`RecalculationRule::Acknowledgment`]: only the average response time is recomputed.
//! 4. [`RecalculationRule::StatusChange`]: only the fulfillment rate is recomputed.
//!
//! Rules 2-4 copy the recomputed value into the vendor's latest snapshot, if one exists.
//!
//! The functions here are pure. Storage backends call [`recalculate`] inside their own transaction, write the vendor
//! first and the snapshot second.
mod calculations;
mod rules;

pub use calculations::{average_response_time, fulfillment_rate, on_time_delivery_rate, quality_rating_avg};
pub use rules::{Metric, RecalculationRule, SnapshotPolicy};
use serde::{Deserialize, Serialize};

use crate::db_types::{PurchaseOrder, VendorMetrics};

/// Recomputes the metrics that `rule` affects from the vendor's full order set, leaving the others at their
/// `current` values.
///
/// `orders` must already reflect the save that triggered the recalculation.
pub fn recalculate(rule: RecalculationRule, orders: &[PurchaseOrder], current: &VendorMetrics) -> VendorMetrics {
    let mut result = *current;
    for metric in rule.affected_metrics() {
        match metric {
            Metric::OnTimeDeliveryRate => result.on_time_delivery_rate = on_time_delivery_rate(orders),
            Metric::QualityRatingAvg => {
                result.quality_rating_avg = quality_rating_avg(orders).unwrap_or(current.quality_rating_avg)
            },
            Metric::AverageResponseTime => result.average_response_time = average_response_time(orders),
            Metric::FulfillmentRate => result.fulfillment_rate = fulfillment_rate(orders),
        }
    }
    result
}

/// Copies the metrics that `rule` affects from `source` into `target`.
///
/// Used to bring the latest history snapshot in line with the vendor record without touching unrelated fields.
pub fn merge_affected(rule: RecalculationRule, source: &VendorMetrics, target: &VendorMetrics) -> VendorMetrics {
    let mut result = *target;
    for metric in rule.affected_metrics() {
        match metric {
            Metric::OnTimeDeliveryRate => result.on_time_delivery_rate = source.on_time_delivery_rate,
            Metric::QualityRatingAvg => result.quality_rating_avg = source.quality_rating_avg,
            Metric::AverageResponseTime => result.average_response_time = source.average_response_time,
            Metric::FulfillmentRate => result.fulfillment_rate = source.fulfillment_rate,
        }
    }
    result
}

/// What happened to the vendor's performance history as a result of a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "snapshot_id")]
pub enum SnapshotOutcome {
    /// No rule fired, so the history was not consulted.
    Untouched,
    /// A new snapshot with the given id was appended.
    Created(i64),
    /// The latest snapshot (with the given id) was updated in place.
    UpdatedLatest(i64),
    /// A rule wanted to update the latest snapshot, but the vendor has none yet.
    NoSnapshot,
}

/// The result of running the engine for one purchase order save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecalculationOutcome {
    pub vendor_id: i64,
    pub rule: Option<RecalculationRule>,
    pub metrics: VendorMetrics,
    pub snapshot: SnapshotOutcome,
}

impl RecalculationOutcome {
    pub fn unchanged(vendor_id: i64, metrics: VendorMetrics) -> Self {
        Self { vendor_id, rule: None, metrics, snapshot: SnapshotOutcome::Untouched }
    }

    pub fn recalculated(&self) -> bool {
        self.rule.is_some()
    }
}
