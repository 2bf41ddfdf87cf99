use pricewatch_common::Device;
use pricewatch_scrape::Extractor;
use pricewatch_valuation::{AgeCalculator, PriceCalculator};
use url::Url;

use crate::error::ApiError;

/// Immutable per-process pipeline: extract → age → depreciate.
pub struct DeviceService {
    extractor: Extractor,
    age: AgeCalculator,
    price: PriceCalculator,
    target: Url,
}

impl DeviceService {
    pub fn new(
        extractor: Extractor,
        age: AgeCalculator,
        price: PriceCalculator,
        target: Url,
    ) -> Self {
        Self {
            extractor,
            age,
            price,
            target,
        }
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Scrape the target page and return the device with its depreciated price.
    /// Status is left unset.
    pub async fn appraise(&self) -> Result<Device, ApiError> {
        let scraped = self.extractor.extract(&self.target).await.map_err(|e| {
            tracing::warn!(target_url = %self.target, error = %e, "device.extract.failed");
            ApiError::DeviceInfo
        })?;

        let age = self.age.age(&scraped.release_date).map_err(|e| {
            tracing::warn!(
                release_date = %scraped.release_date,
                error = %e,
                "device.age.failed"
            );
            ApiError::DeviceAge
        })?;

        let current = self.price.current_price(scraped.price, age);
        tracing::debug!(
            original_price = scraped.price,
            age,
            rate = self.price.rate(),
            current_price = current,
            "device.appraised"
        );

        Ok(scraped.with_price(current))
    }
}
