//! HTTP mapping for the core error taxonomy.
//!
//! The wizard surfaces error messages verbatim as transient notices, so the
//! JSON body carries the taxonomy message unchanged.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use telepost_core::TelepostError;

/// Newtype making TelepostError an actix response.
#[derive(Debug)]
pub struct ApiError(pub TelepostError);

impl From<TelepostError> for ApiError {
    fn from(err: TelepostError) -> Self {
        ApiError(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            TelepostError::Validation(_) => StatusCode::BAD_REQUEST,
            TelepostError::NotFound(_) => StatusCode::NOT_FOUND,
            TelepostError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            TelepostError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            TelepostError::Conflict(_) => StatusCode::CONFLICT,
            TelepostError::Generation(_) | TelepostError::Delivery(_) => StatusCode::BAD_GATEWAY,
            TelepostError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.0, TelepostError::Storage(_)) {
            tracing::error!("Internal error: {}", self.0);
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.0.to_string() }))
    }
}
