use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};
use pricewatch_common::Device;

use crate::error::ApiError;
use crate::service::DeviceService;

type AppState = Arc<DeviceService>;

/// `/device`: GET appraises the target device, every other method is a JSON 405.
///
/// HEAD is routed explicitly, otherwise axum would serve it with the GET handler.
pub fn router(service: AppState) -> Router {
    Router::new()
        .route(
            "/device",
            get(get_device)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .with_state(service)
}

async fn get_device(
    State(service): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Device>, ApiError> {
    let mut device = service.appraise().await?;
    device.status = status_param(query.as_deref());
    Ok(Json(device))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// First `status` value, upper-cased; absent or empty means no status.
fn status_param(query: Option<&str>) -> Option<String> {
    let (_, value) = url::form_urlencoded::parse(query?.as_bytes()).find(|(k, _)| k == "status")?;
    (!value.is_empty()).then(|| value.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_uppercased() {
        assert_eq!(status_param(Some("status=available")), Some("AVAILABLE".into()));
    }

    #[test]
    fn missing_or_empty_status_is_none() {
        assert_eq!(status_param(None), None);
        assert_eq!(status_param(Some("")), None);
        assert_eq!(status_param(Some("status=")), None);
        assert_eq!(status_param(Some("other=1")), None);
    }

    #[test]
    fn first_value_wins_and_is_decoded() {
        assert_eq!(
            status_param(Some("status=in%20stock&status=sold")),
            Some("IN STOCK".into())
        );
        assert_eq!(status_param(Some("status=pr%C3%AAt")), Some("PRÊT".into()));
    }
}
