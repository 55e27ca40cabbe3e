//! Metric formulas over a vendor's order set.
//!
//! Every function takes the *full* set of orders for a vendor and does its own filtering, so that the denominator
//! each metric uses is visible right next to its numerator:
//!
//! | Metric                  | Numerator                                      | Denominator           |
//! |-------------------------|------------------------------------------------|-----------------------|
//! | on-time delivery rate   | orders with `issue_date <= delivery_date`      | all orders            |
//! | quality rating average  | sum of ratings on completed, rated orders      | completed, rated orders |
//! | average response time   | seconds to acknowledge, acknowledged orders    | **all** orders        |
//! | fulfillment rate        | completed orders                               | all orders            |
//!
//! All four return zero for an empty order set.
use crate::db_types::PurchaseOrder;

#[allow(clippy::cast_precision_loss)]
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

pub fn on_time_delivery_rate(orders: &[PurchaseOrder]) -> f64 {
    let on_time = orders.iter().filter(|o| o.is_on_time()).count();
    percentage(on_time, orders.len())
}

/// The mean rating over completed orders that carry a rating, or `None` if no completed order has been rated.
#[allow(clippy::cast_precision_loss)]
pub fn quality_rating_avg(orders: &[PurchaseOrder]) -> Option<f64> {
    let ratings = orders.iter().filter(|o| o.is_completed()).filter_map(|o| o.quality_rating).collect::<Vec<f64>>();
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

/// Total acknowledgement delay in seconds, divided by the number of *all* orders, acknowledged or not.
#[allow(clippy::cast_precision_loss)]
pub fn average_response_time(orders: &[PurchaseOrder]) -> f64 {
    if orders.is_empty() {
        return 0.0;
    }
    let total: f64 = orders.iter().filter_map(PurchaseOrder::response_time).sum();
    total / orders.len() as f64
}

pub fn fulfillment_rate(orders: &[PurchaseOrder]) -> f64 {
    let completed = orders.iter().filter(|o| o.is_completed()).count();
    percentage(completed, orders.len())
}
