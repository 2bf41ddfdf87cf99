//! Age and depreciation arithmetic for scraped devices.
//!
//! Both calculators are plain values configured at construction time, so
//! callers (and tests) pick the reference year and rate explicitly.
//!
//! ```
//! use pricewatch_valuation::{AgeCalculator, PriceCalculator};
//!
//! let age = AgeCalculator::new(2023).age("01-01-2021").unwrap();
//! assert_eq!(age, 2);
//!
//! let price = PriceCalculator::new(0.05).current_price(1000.0, age);
//! assert!((price - 900.0).abs() < 1e-9);
//! ```

pub mod age;
pub mod price;

pub use age::{AgeCalculator, AgeError};
pub use price::PriceCalculator;

/// Year treated as "now" unless configured otherwise.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2023;

/// Fraction of the original price lost per year since release.
pub const DEFAULT_DEPRECIATION_RATE: f64 = 0.05;
