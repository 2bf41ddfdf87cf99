use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use pricewatch_api::DeviceService;
use pricewatch_config::PricewatchConfig;
use pricewatch_http::HttpClient;
use pricewatch_runtime::CancellationToken;
use pricewatch_scrape::{Extractor, RecipeTable};
use pricewatch_valuation::{AgeCalculator, PriceCalculator};
use tokio::net::TcpListener;

/// Wire the pipeline from config and serve until `cancel` fires.
pub async fn run(cfg: PricewatchConfig, cancel: Arc<CancellationToken>) -> Result<()> {
    let service = Arc::new(build_service(&cfg)?);
    let app = pricewatch_api::router(service);

    let listener = TcpListener::bind(&cfg.server.listen)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.listen))?;
    tracing::info!(listen = %cfg.server.listen, "pricewatch.listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    tracing::info!("pricewatch.stopped");
    Ok(())
}

fn build_service(cfg: &PricewatchConfig) -> Result<DeviceService> {
    let mut client = HttpClient::new(cfg.fetch.user_agent.as_deref())?;
    if let Some(secs) = cfg.fetch.timeout_secs {
        client = client.with_timeout(Duration::from_secs(secs));
    }

    let table = RecipeTable::with_configured(&cfg.retailers)?;
    let target = cfg.target.parsed_url()?;
    let recipe = table.lookup(&target).map(|r| r.name().to_string());
    tracing::info!(
        target_url = %target,
        recipe = ?recipe,
        retailers = ?table.names().collect::<Vec<_>>(),
        "pricewatch.configured"
    );
    if recipe.is_none() {
        tracing::warn!(target_url = %target, "pricewatch.target.unsupported");
    }

    let extractor = Extractor::new(Arc::new(client), table);
    let age = AgeCalculator::new(cfg.valuation.reference_year);
    let price = PriceCalculator::new(cfg.valuation.depreciation_rate)
        .with_floor_at_zero(cfg.valuation.floor_price_at_zero);

    Ok(DeviceService::new(extractor, age, price, target))
}
