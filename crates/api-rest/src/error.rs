//! Error responses for the REST surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use draft_core::DraftError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error("not logged in")]
    Unauthenticated,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Draft(e) if e.is_store_failure() => StatusCode::BAD_GATEWAY,
            ApiError::Draft(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match status {
            StatusCode::UNAUTHORIZED => (status, "Not logged in").into_response(),
            StatusCode::BAD_GATEWAY => {
                tracing::error!("Draft store error: {:?}", self);
                (status, "Draft store unavailable").into_response()
            }
            _ => {
                tracing::error!("Draft resolution error: {:?}", self);
                (status, "Internal error").into_response()
            }
        }
    }
}
