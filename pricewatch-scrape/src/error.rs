use pricewatch_http::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] HttpError),

    /// No recipe matches the URL's host (or the URL has no host).
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("invalid price {text:?} from {retailer}: {reason}")]
    PriceParse {
        retailer: String,
        text: String,
        reason: String,
    },

    #[error("invalid selector {selector:?} in recipe {recipe}: {reason}")]
    Selector {
        recipe: String,
        selector: String,
        reason: String,
    },
}
