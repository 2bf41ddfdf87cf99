//! Types and utilities shared across the pricewatch crates.
//!
//! - [`Device`]: the normalized record produced by extraction and returned by the API
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! ```rust
//! use pricewatch_common::Device;
//!
//! let device = Device::new("LG", "OLED55C3", "01-03-2023", 1499.0);
//! assert!(device.status.is_none());
//! ```
use serde::Serialize;

pub mod observability;

/// Brand, model, release date, price and an optional caller-supplied status.
///
/// `release_date` is kept as scraped text ("DD-MM-YYYY"); interpretation is
/// left to the valuation crate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    pub brand: String,
    pub model: String,
    pub release_date: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Device {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        release_date: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            release_date: release_date.into(),
            price,
            status: None,
        }
    }

    /// Same device with the price replaced, status untouched.
    pub fn with_price(&self, price: f64) -> Self {
        Self {
            price,
            ..self.clone()
        }
    }
}
