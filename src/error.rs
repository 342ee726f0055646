use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

/// Failures of a single provider call. These stay inside the repository
/// layer, where they are logged and turned into an empty page.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider answered with HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("provider response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("provider reported an error: {message}")]
    Reported { message: String },
}

/// Errors surfaced to the caller of an HTTP endpoint.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing `{param}` parameter. Example: /restaurants?{param}=New York")]
    MissingParameter { param: &'static str },

    #[error("Invalid `{param}` parameter: {reason}")]
    InvalidParameter {
        param: &'static str,
        reason: &'static str,
    },

    #[error("Error fetching data: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::MissingParameter { param } => {
                warn!("Rejected request without `{}` parameter", param);
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            AppError::InvalidParameter { param, .. } => {
                warn!("Rejected request with invalid `{}` parameter", param);
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            AppError::Internal(e) => {
                error!("Something went wrong handling request due to: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Error fetching data: {:#}", e))
                    .into_response()
            }
        }
    }
}
