use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------     VendorMetrics     ---------------------------------------------------------
/// The four cached performance metrics carried on every vendor record and copied into every snapshot.
///
/// Rates are percentages in `[0, 100]`. `average_response_time` is in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorMetrics {
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
}

//--------------------------------------        Vendor         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    pub contact_details: String,
    pub address: String,
    pub vendor_code: String,
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
}

impl Vendor {
    pub fn metrics(&self) -> VendorMetrics {
        VendorMetrics {
            on_time_delivery_rate: self.on_time_delivery_rate,
            quality_rating_avg: self.quality_rating_avg,
            average_response_time: self.average_response_time,
            fulfillment_rate: self.fulfillment_rate,
        }
    }
}

//--------------------------------------       NewVendor       ---------------------------------------------------------
/// Payload for creating a vendor. Metric fields are not accepted here; new vendors start with all metrics at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVendor {
    pub name: String,
    #[serde(default)]
    pub contact_details: String,
    #[serde(default)]
    pub address: String,
    pub vendor_code: String,
}

impl NewVendor {
    pub fn new<S: Into<String>>(name: S, vendor_code: S) -> Self {
        Self {
            name: name.into(),
            contact_details: String::default(),
            address: String::default(),
            vendor_code: vendor_code.into(),
        }
    }

    pub fn with_contact_details<S: Into<String>>(mut self, contact_details: S) -> Self {
        self.contact_details = contact_details.into();
        self
    }

    pub fn with_address<S: Into<String>>(mut self, address: S) -> Self {
        self.address = address.into();
        self
    }
}

//--------------------------------------     VendorUpdate      ---------------------------------------------------------
/// A partial update for a vendor's descriptive fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorUpdate {
    pub name: Option<String>,
    pub contact_details: Option<String>,
    pub address: Option<String>,
    pub vendor_code: Option<String>,
}

impl VendorUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact_details.is_none() && self.address.is_none() && self.vendor_code.is_none()
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_vendor_code<S: Into<String>>(mut self, code: S) -> Self {
        self.vendor_code = Some(code.into());
        self
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The order has been placed with the vendor, but not yet delivered.
    #[default]
    Pending,
    /// The order was delivered.
    Completed,
    /// The order was called off.
    Canceled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Completed => write!(f, "completed"),
            OrderStatusType::Canceled => write!(f, "canceled"),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to pending");
            OrderStatusType::Pending
        })
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------     PurchaseOrder     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PurchaseOrder {
    pub id: i64,
    pub po_number: String,
    /// The id of the vendor this order was placed with
    pub vendor: i64,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    #[sqlx(json)]
    pub items: serde_json::Value,
    pub quantity: i64,
    pub status: OrderStatusType,
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

impl PurchaseOrder {
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatusType::Completed
    }

    /// An order is on time if it was issued no later than its delivery date.
    pub fn is_on_time(&self) -> bool {
        self.issue_date <= self.delivery_date
    }

    /// Seconds between issuing the order and the vendor acknowledging it, if it has been acknowledged.
    #[allow(clippy::cast_precision_loss)]
    pub fn response_time(&self) -> Option<f64> {
        self.acknowledgment_date.map(|ack| (ack - self.issue_date).num_milliseconds() as f64 / 1000.0)
    }
}

//--------------------------------------   NewPurchaseOrder    ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchaseOrder {
    pub po_number: String,
    pub vendor: i64,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    #[serde(default)]
    pub items: serde_json::Value,
    pub quantity: i64,
    #[serde(default)]
    pub status: OrderStatusType,
    #[serde(default)]
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
}

impl NewPurchaseOrder {
    /// Creates a pending order with a quantity of one, issued and ordered now and due on `delivery_date`.
    pub fn new<S: Into<String>>(po_number: S, vendor: i64, delivery_date: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            po_number: po_number.into(),
            vendor,
            order_date: now,
            delivery_date,
            items: serde_json::Value::Array(vec![]),
            quantity: 1,
            status: OrderStatusType::Pending,
            quality_rating: None,
            issue_date: now,
        }
    }

    pub fn with_issue_date(mut self, issue_date: DateTime<Utc>) -> Self {
        self.issue_date = issue_date;
        self
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = status;
        self
    }

    pub fn with_quality_rating(mut self, rating: f64) -> Self {
        self.quality_rating = Some(rating);
        self
    }

    pub fn with_items(mut self, items: serde_json::Value, quantity: i64) -> Self {
        self.items = items;
        self.quantity = quantity;
        self
    }
}

//--------------------------------------  PurchaseOrderUpdate  ---------------------------------------------------------
/// A partial update to a purchase order.
///
/// `acknowledgment_date` is deliberately absent: it is only ever set by the acknowledge flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderUpdate {
    pub po_number: Option<String>,
    pub vendor: Option<i64>,
    pub order_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub items: Option<serde_json::Value>,
    pub quantity: Option<i64>,
    pub status: Option<OrderStatusType>,
    pub quality_rating: Option<f64>,
    pub issue_date: Option<DateTime<Utc>>,
}

impl PurchaseOrderUpdate {
    pub fn is_empty(&self) -> bool {
        self.po_number.is_none()
            && self.vendor.is_none()
            && self.order_date.is_none()
            && self.delivery_date.is_none()
            && self.items.is_none()
            && self.quantity.is_none()
            && self.status.is_none()
            && self.quality_rating.is_none()
            && self.issue_date.is_none()
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_quality_rating(mut self, rating: f64) -> Self {
        self.quality_rating = Some(rating);
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_delivery_date(mut self, delivery_date: DateTime<Utc>) -> Self {
        self.delivery_date = Some(delivery_date);
        self
    }

    /// Applies this update to `order`, returning the order as it will look once saved.
    pub fn apply_to(&self, order: &PurchaseOrder) -> PurchaseOrder {
        let mut result = order.clone();
        if let Some(po_number) = &self.po_number {
            result.po_number = po_number.clone();
        }
        if let Some(vendor) = self.vendor {
            result.vendor = vendor;
        }
        if let Some(order_date) = self.order_date {
            result.order_date = order_date;
        }
        if let Some(delivery_date) = self.delivery_date {
            result.delivery_date = delivery_date;
        }
        if let Some(items) = &self.items {
            result.items = items.clone();
        }
        if let Some(quantity) = self.quantity {
            result.quantity = quantity;
        }
        if let Some(status) = self.status {
            result.status = status;
        }
        if let Some(rating) = self.quality_rating {
            result.quality_rating = Some(rating);
        }
        if let Some(issue_date) = self.issue_date {
            result.issue_date = issue_date;
        }
        result
    }
}

//--------------------------------------  PerformanceSnapshot  ---------------------------------------------------------
/// A point-in-time copy of a vendor's metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PerformanceSnapshot {
    pub id: i64,
    pub vendor: i64,
    pub date: DateTime<Utc>,
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
}

impl PerformanceSnapshot {
    pub fn metrics(&self) -> VendorMetrics {
        VendorMetrics {
            on_time_delivery_rate: self.on_time_delivery_rate,
            quality_rating_avg: self.quality_rating_avg,
            average_response_time: self.average_response_time,
            fulfillment_rate: self.fulfillment_rate,
        }
    }
}

//--------------------------------------      UserAccount      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    pub username: String,
    pub email: String,
    /// The bcrypt hash of the user's password. Plain-text passwords never reach the database layer.
    pub password_hash: String,
}
