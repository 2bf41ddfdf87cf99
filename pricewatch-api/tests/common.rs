use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use pricewatch_api::DeviceService;
use pricewatch_common::observability::{LogConfig, LogFormat, init_logging};
use pricewatch_http::HttpError;
use pricewatch_scrape::{Extractor, PageSource, RecipeTable};
use pricewatch_valuation::{AgeCalculator, PriceCalculator};
use url::Url;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "pricewatch-tests",
            log_dir: Some(std::env::temp_dir().join("pricewatch-tests")),
            emit_stderr: true,
            format: if std::env::var("PRICEWATCH_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".into(),
        };

        init_logging(config).unwrap_or_default()
    });
}

/// Serves the same HTML for every URL.
pub struct StaticPage(pub String);

#[async_trait]
impl PageSource for StaticPage {
    async fn fetch(&self, _url: &Url) -> Result<String, HttpError> {
        Ok(self.0.clone())
    }
}

/// Serves fixed HTML and counts how often it was asked to.
pub struct CountingPage {
    html: String,
    fetches: AtomicUsize,
}

impl CountingPage {
    pub fn new(html: String) -> Self {
        Self {
            html,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for CountingPage {
    async fn fetch(&self, _url: &Url) -> Result<String, HttpError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.html.clone())
    }
}

pub fn lg_page(release_date: &str, price: &str) -> String {
    format!(
        r#"<html><body>
             <h1 class="product-title">OLED55C3</h1>
             <div data-product-spec="releaseDate"><span class="item-value">{release_date}</span></div>
             <span class="price-value">{price}</span>
           </body></html>"#
    )
}

pub fn service(html: String, target: &str, floor: bool) -> Arc<DeviceService> {
    build(Arc::new(StaticPage(html)), target, floor)
}

pub fn service_with_source(source: Arc<dyn PageSource>, target: &str) -> Arc<DeviceService> {
    build(source, target, false)
}

fn build(source: Arc<dyn PageSource>, target: &str, floor: bool) -> Arc<DeviceService> {
    let extractor = Extractor::new(source, RecipeTable::builtin());
    Arc::new(DeviceService::new(
        extractor,
        AgeCalculator::new(2023),
        PriceCalculator::new(0.05).with_floor_at_zero(floor),
        Url::parse(target).unwrap(),
    ))
}
