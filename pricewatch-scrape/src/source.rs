use async_trait::async_trait;
use pricewatch_http::{HttpClient, HttpError, RequestOpts};
use url::Url;

/// Anything that can hand back the HTML behind a URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, HttpError>;
}

#[async_trait]
impl PageSource for HttpClient {
    async fn fetch(&self, url: &Url) -> Result<String, HttpError> {
        self.get_text(url, RequestOpts::default()).await
    }
}
