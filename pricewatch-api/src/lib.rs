//! HTTP surface: `GET /device` backed by [`DeviceService`].
//!
//! ```no_run
//! # async fn demo(service: std::sync::Arc<pricewatch_api::DeviceService>) -> std::io::Result<()> {
//! let app = pricewatch_api::router(service);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod service;

pub use error::ApiError;
pub use handlers::router;
pub use service::DeviceService;
