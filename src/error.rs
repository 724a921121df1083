use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("no target with id {0}")]
    TargetNotFound(usize),
    #[error("request is missing a url")]
    MissingUrl,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{0:#}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl IntoResponse for MonitorError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            MonitorError::TargetNotFound(_) => StatusCode::NOT_FOUND,
            MonitorError::MissingUrl | MonitorError::Json(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "success": false, "error": self.to_string() }))).into_response()
    }
}
