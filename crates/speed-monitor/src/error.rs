//! Error types for the speed monitor

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::json;
use std::fmt;

/// Startup and runtime failures of the service itself
#[derive(Debug)]
pub enum MonitorError {
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Io(err) => write!(f, "IO error: {}", err),
            MonitorError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Io(err) => Some(err.as_ref()),
            MonitorError::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        MonitorError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for MonitorError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        MonitorError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;

/// Request rejection that converts to an HTTP response
#[derive(Debug, PartialEq)]
pub enum AppError {
    BadRequest(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => f.write_str(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (
            status,
            axum::Json(json!({
                "error": message,
                "updated_at": Utc::now().to_rfc3339(),
            })),
        )
            .into_response()
    }
}
