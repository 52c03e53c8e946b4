//! HTTP error mapping for sampler failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use wordcycle_core::CycleError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct AppError(pub CycleError);

impl From<CycleError> for AppError {
    fn from(err: CycleError) -> Self {
        Self(err)
    }
}

impl AppError {
    fn body(&self) -> ErrorBody {
        match &self.0 {
            CycleError::NoData => ErrorBody {
                error: "No data found".to_string(),
                message: Some("The vocabulary is empty or failed to load".to_string()),
            },
            CycleError::DataUnavailable { .. } => ErrorBody {
                error: "Vocabulary unavailable".to_string(),
                message: Some("The vocabulary dataset could not be loaded".to_string()),
            },
            _ => ErrorBody {
                error: "Internal server error".to_string(),
                message: Some("Failed to select a word".to_string()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.0.is_absorbed() {
            tracing::error!("Absorbable error reached the HTTP layer: {}", self.0);
        } else {
            tracing::warn!("Request failed: {}", self.0);
        }
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_body() {
        let body = AppError(CycleError::NoData).body();
        assert_eq!(body.error, "No data found");
        assert!(body.message.is_some());
    }

    #[test]
    fn internal_body_hides_details() {
        let body = AppError(CycleError::Internal("lock poisoned at 0xdeadbeef".into())).body();
        assert_eq!(body.error, "Internal server error");
        assert!(!body.message.unwrap().contains("0xdeadbeef"));
    }

    #[test]
    fn status_is_server_error() {
        let resp = AppError(CycleError::NoData).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
