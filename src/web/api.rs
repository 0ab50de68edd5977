use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    routing::post,
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

use page_display::{AutoScaler, Measurement, PageSnapshot, ScaleReport};

use crate::clock_ticker::{lock, SharedPage, SharedState};
use crate::health::HealthReport;

#[derive(Clone)]
pub struct AppState {
    pub page: SharedPage,
    pub state: SharedState,
    pub scaler: AutoScaler,
    pub health_tolerance: Duration,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "ok".to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(message),
        }
    }
}

/// 400 with a `{"message": ...}` body
pub fn bad_request(message: impl Into<String>) -> Response {
    let message = message.into();
    warn!(%message, "Rejecting request");
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
}

#[derive(Debug, Deserialize)]
pub struct AutoscaleRequest {
    pub elements: Vec<Measurement>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ScaledElement {
    pub id: String,
    /// None when the element could not be scaled
    pub font_size: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct AutoscaleResult {
    pub target_width: f64,
    pub elements: Vec<ScaledElement>,
    pub report: ScaleReport,
}

pub async fn get_display(State(state): State<AppState>) -> Json<ApiResponse<PageSnapshot>> {
    let page = lock(&state.page);
    if page.is_empty() {
        warn!("GET /api/display called on a page with no elements");
        return Json(ApiResponse::error("page has no elements".to_string()));
    }
    Json(ApiResponse::ok(page.snapshot()))
}

pub async fn post_autoscale(
    State(state): State<AppState>,
    payload: Result<Json<AutoscaleRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    info!(elements = request.elements.len(), "POST /api/autoscale called");

    if request.elements.is_empty() {
        return bad_request("'elements' must contain at least one measurement");
    }

    let mut measurements = request.elements;
    let mut report = ScaleReport::default();
    let elements = measurements
        .iter_mut()
        .map(|m| {
            let font_size = match state.scaler.scale(m) {
                Ok(px) => {
                    report.scaled += 1;
                    Some(px)
                }
                Err(e) => {
                    warn!(id = %m.id, error = %e, "Element not scaled");
                    report.skipped += 1;
                    None
                }
            };
            ScaledElement { id: m.id.clone(), font_size }
        })
        .collect();

    Json(ApiResponse::ok(AutoscaleResult {
        target_width: state.scaler.target_width(),
        elements,
        report,
    }))
    .into_response()
}

pub async fn get_healthcheck(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = {
        let app_state = lock(&state.state);
        HealthReport::from_state(&app_state, Utc::now(), state.health_tolerance)
    };
    let code = if report.is_healthy() {
        StatusCode::OK
    } else {
        warn!(?report, "Healthcheck failing");
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(report))
}

pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route("/display", get(get_display))
        .route("/autoscale", post(post_autoscale))
        .route("/healthcheck", get(get_healthcheck))
        .with_state(state)
}
