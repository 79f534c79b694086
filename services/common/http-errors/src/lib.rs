use axum::{http::{StatusCode, HeaderValue}, response::{IntoResponse, Response}, Json};
use serde::Serialize;

mod metrics;

pub use metrics::{http_error_metrics_layer, MAX_ERROR_CODES, OVERFLOW_CODE};
#[cfg(any(test, feature = "test-helpers"))]
pub use metrics::test_helpers;

pub const NOT_FOUND_MESSAGE: &str = "Not Found";
pub const BAD_REQUEST_MESSAGE: &str = "Bad Request";
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Wire shape of every error response: `{"message": "..."}`.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: &'static str, message: Option<String> },
    NotFound { code: &'static str },
    Internal { message: Option<String> },
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(e: E) -> Self { Self::Internal { message: Some(e.to_string()) } }
    pub fn not_found(code: &'static str) -> Self { Self::NotFound { code } }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (body, error_code) = match self {
            ApiError::BadRequest { code, message } => (
                ErrorBody { message: message.unwrap_or_else(|| BAD_REQUEST_MESSAGE.into()) },
                code
            ),
            ApiError::NotFound { code } => (
                ErrorBody { message: NOT_FOUND_MESSAGE.into() },
                code
            ),
            // Detail is for the caller to log; clients only see the generic message.
            ApiError::Internal { .. } => (
                ErrorBody { message: INTERNAL_MESSAGE.into() },
                "internal_error"
            ),
        };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert("X-Error-Code", val);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
