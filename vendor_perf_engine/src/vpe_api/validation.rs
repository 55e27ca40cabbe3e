//! Field-level validation for incoming vendor and purchase order payloads.
//!
//! Validation happens before anything reaches the storage backend or the metrics engine. Failures are collected per
//! field rather than stopping at the first problem, so clients can fix everything in one go.
use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::db_types::{NewPurchaseOrder, NewVendor, PurchaseOrderUpdate, VendorUpdate};

pub const MAX_VENDOR_NAME_LEN: usize = 100;
pub const MAX_VENDOR_CODE_LEN: usize = 50;
pub const MAX_PO_NUMBER_LEN: usize = 100;
pub const MAX_USERNAME_LEN: usize = 150;

/// A map of field name to the problems found with that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set of errors holding a single message for a single field.
    pub fn single<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` if no errors were recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn check_text(&mut self, field: &str, value: &str, max_len: usize) {
        if value.trim().is_empty() {
            self.add(field, "This field may not be blank.");
        } else if value.chars().count() > max_len {
            self.add(field, format!("Ensure this field has no more than {max_len} characters."));
        }
    }

    fn check_rating(&mut self, rating: Option<f64>) {
        if rating.is_some_and(|r| !r.is_finite()) {
            self.add("quality_rating", "A valid number is required.");
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields =
            self.0.iter().map(|(field, messages)| format!("{field}: {}", messages.join(" "))).collect::<Vec<_>>();
        write!(f, "{}", fields.join("; "))
    }
}

pub fn validate_new_vendor(vendor: &NewVendor) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_text("name", &vendor.name, MAX_VENDOR_NAME_LEN);
    errors.check_text("vendor_code", &vendor.vendor_code, MAX_VENDOR_CODE_LEN);
    errors.into_result()
}

pub fn validate_vendor_update(update: &VendorUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(name) = &update.name {
        errors.check_text("name", name, MAX_VENDOR_NAME_LEN);
    }
    if let Some(code) = &update.vendor_code {
        errors.check_text("vendor_code", code, MAX_VENDOR_CODE_LEN);
    }
    errors.into_result()
}

pub fn validate_new_purchase_order(order: &NewPurchaseOrder) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_text("po_number", &order.po_number, MAX_PO_NUMBER_LEN);
    errors.check_rating(order.quality_rating);
    errors.into_result()
}

pub fn validate_purchase_order_update(update: &PurchaseOrderUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(po_number) = &update.po_number {
        errors.check_text("po_number", po_number, MAX_PO_NUMBER_LEN);
    }
    errors.check_rating(update.quality_rating);
    errors.into_result()
}

pub fn validate_registration(username: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_text("username", username, MAX_USERNAME_LEN);
    if password.is_empty() {
        errors.add("password", "This field may not be blank.");
    }
    errors.into_result()
}
