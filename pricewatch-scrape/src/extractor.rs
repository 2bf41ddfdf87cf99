use std::sync::Arc;

use pricewatch_common::Device;
use url::Url;

use crate::error::ScrapeError;
use crate::source::PageSource;
use crate::table::RecipeTable;

/// Resolves a recipe for a URL, fetches the page once and extracts a [`Device`].
pub struct Extractor {
    source: Arc<dyn PageSource>,
    table: RecipeTable,
}

impl Extractor {
    pub fn new(source: Arc<dyn PageSource>, table: RecipeTable) -> Self {
        Self { source, table }
    }

    /// The recipe is resolved before any network I/O, so an unsupported host
    /// never triggers a fetch.
    pub async fn extract(&self, url: &Url) -> Result<Device, ScrapeError> {
        let recipe = self.table.lookup(url).ok_or_else(|| {
            ScrapeError::UnsupportedSource(url.host_str().unwrap_or(url.as_str()).to_string())
        })?;

        tracing::debug!(url = %url, recipe = recipe.name(), "scrape.recipe.matched");

        let html = self.source.fetch(url).await?;
        let device = recipe.extract(&html)?;

        tracing::debug!(
            recipe = recipe.name(),
            brand = %device.brand,
            model = %device.model,
            release_date = %device.release_date,
            price = device.price,
            "scrape.device.extracted"
        );
        Ok(device)
    }
}
