use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::db_types::{OrderStatusType, PurchaseOrder};

/// One of the four cached vendor metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    OnTimeDeliveryRate,
    QualityRatingAvg,
    AverageResponseTime,
    FulfillmentRate,
}

/// What happens to a vendor's performance history when a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotPolicy {
    /// Append a new snapshot holding all four metrics.
    CreateNew,
    /// Copy the recomputed metrics into the most recent snapshot, if there is one.
    UpdateLatest,
}

/// The recalculation rules, in priority order.
///
/// Only the first matching rule is applied on a save, so a single save never triggers more than one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecalculationRule {
    /// The order moved into `completed`.
    Completion,
    /// The quality rating on a completed order was set or changed.
    QualityRatingEdit,
    /// The acknowledgment date changed.
    Acknowledgment,
    /// Any other status change, e.g. `pending` to `canceled`.
    StatusChange,
}

impl RecalculationRule {
    pub const PRIORITY: [RecalculationRule; 4] = [
        RecalculationRule::Completion,
        RecalculationRule::QualityRatingEdit,
        RecalculationRule::Acknowledgment,
        RecalculationRule::StatusChange,
    ];

    /// Returns the first rule (in [`Self::PRIORITY`] order) that matches the transition from `previous` to `current`,
    /// or `None` if no tracked field changed.
    pub fn select(previous: &PurchaseOrder, current: &PurchaseOrder) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|rule| rule.matches(previous, current))
    }

    pub fn matches(&self, previous: &PurchaseOrder, current: &PurchaseOrder) -> bool {
        use OrderStatusType::Completed;
        match self {
            Self::Completion => previous.status != Completed && current.status == Completed,
            Self::QualityRatingEdit => {
                current.status == Completed
                    && current.quality_rating.is_some()
                    && current.quality_rating != previous.quality_rating
            },
            Self::Acknowledgment => current.acknowledgment_date != previous.acknowledgment_date,
            Self::StatusChange => current.status != previous.status,
        }
    }

    pub fn affected_metrics(&self) -> &'static [Metric] {
        match self {
            Self::Completion => &[
                Metric::QualityRatingAvg,
                Metric::OnTimeDeliveryRate,
                Metric::AverageResponseTime,
                Metric::FulfillmentRate,
            ],
            Self::QualityRatingEdit => &[Metric::QualityRatingAvg],
            Self::Acknowledgment => &[Metric::AverageResponseTime],
            Self::StatusChange => &[Metric::FulfillmentRate],
        }
    }

    pub fn snapshot_policy(&self) -> SnapshotPolicy {
        match self {
            Self::Completion => SnapshotPolicy::CreateNew,
            _ => SnapshotPolicy::UpdateLatest,
        }
    }
}

impl Display for RecalculationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completion => write!(f, "completion"),
            Self::QualityRatingEdit => write!(f, "quality rating edit"),
            Self::Acknowledgment => write!(f, "acknowledgment"),
            Self::StatusChange => write!(f, "status change"),
        }
    }
}
