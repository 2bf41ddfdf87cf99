//! Retailer page extraction.
//!
//! - Declarative per-retailer recipes (`recipe`) and the host lookup table (`table`)
//! - Selector-path evaluation over a parsed document (`select`)
//! - Page acquisition behind the [`PageSource`] trait (`source`)
//! - [`Extractor`]: table lookup, one fetch, then recipe evaluation
//!
//! ```
//! use pricewatch_scrape::RecipeTable;
//! use url::Url;
//!
//! let table = RecipeTable::builtin();
//! let url = Url::parse("https://www.lg.com/us/tvs/oled55c3").unwrap();
//! assert_eq!(table.lookup(&url).map(|r| r.name()), Some("lg"));
//! ```

pub mod error;
pub mod extractor;
pub mod recipe;
mod select;
pub mod source;
pub mod table;

pub use error::ScrapeError;
pub use extractor::Extractor;
pub use recipe::{FieldRule, HostMatcher, Recipe, RecipeSpec, Step};
pub use source::PageSource;
pub use table::RecipeTable;
