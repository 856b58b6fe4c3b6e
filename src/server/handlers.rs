//! Request handlers for the scrape service.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::config::ScrapeConfig;
use crate::scrape_engine::ScrapeError;
use crate::schema::{ApiCapture, Section, SessionStatus, SessionSummary};

pub const BUSY_DETAIL: &str = "A scrape is already in progress. Try again later.";

/// Body of `POST /scrape`; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScrapeRequest {
    pub url: Option<String>,
    pub output_dir: Option<String>,
    pub headless: Option<bool>,
}

impl ScrapeRequest {
    /// Apply the request on top of the service defaults
    fn into_config(self, defaults: &ScrapeConfig) -> anyhow::Result<ScrapeConfig> {
        let mut base = defaults.clone();
        if let Some(headless) = self.headless {
            base.headless = headless;
        }
        let url = self.url.unwrap_or_else(|| base.target_url.clone());
        // host of the previous target must not leak into a new one
        if url != base.target_url {
            base.api_host = None;
        }
        let output_dir = self
            .output_dir
            .map_or_else(|| base.output_dir.clone(), Into::into);

        let mut builder = ScrapeConfig::builder();
        builder.draft = base;
        builder.output_dir(output_dir).target_url(url).build()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub status: String,
    pub summary: SessionSummary,
    pub sections: Vec<Section>,
    pub api_responses: Vec<ApiCapture>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (status, Json(ErrorBody { detail: detail.into() })).into_response()
}

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `POST /scrape`
pub async fn scrape(State(state): State<AppState>, body: Option<Json<ScrapeRequest>>) -> Response {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let config = match request.into_config(&state.defaults) {
        Ok(config) => config,
        Err(e) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, format!("{e:#}")),
    };

    match state.runner.run(config).await {
        Ok(session) if session.status == SessionStatus::Failed => {
            let detail = session
                .errors
                .last()
                .cloned()
                .unwrap_or_else(|| "Scrape failed".to_string());
            error_response(StatusCode::INTERNAL_SERVER_ERROR, detail)
        }
        Ok(session) => {
            let summary = session.summary();
            Json(ScrapeResponse {
                status: "success".to_string(),
                summary,
                sections: session.sections,
                api_responses: session.api_captures,
            })
            .into_response()
        }
        Err(ScrapeError::Busy) => error_response(StatusCode::TOO_MANY_REQUESTS, BUSY_DETAIL),
        Err(e) => {
            tracing::error!("Scrape request failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
