//! Mapping from domain errors to HTTP responses.
//!
//! Every failure leaves as `{success: false, message, error}`. The `error`
//! string is a fixed description; upstream bodies and model text stay in the
//! logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::common::ApiErrorBody;
use crate::domains::companies::CompanyError;
use crate::domains::prospects::ProspectError;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again in a few moments.";

#[derive(Debug)]
pub enum ApiError {
    Company(CompanyError),
    Prospect(ProspectError),
    BadRequest(String),
}

impl From<CompanyError> for ApiError {
    fn from(err: CompanyError) -> Self {
        Self::Company(err)
    }
}

impl From<ProspectError> for ApiError {
    fn from(err: ProspectError) -> Self {
        Self::Prospect(err)
    }
}

impl ApiError {
    /// Status, caller-facing message, and fixed error description.
    fn parts(&self) -> (StatusCode, String, Option<&'static str>) {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone(), None),
            Self::Company(err) => match err {
                CompanyError::QueryParse(message) => {
                    (StatusCode::BAD_REQUEST, message.clone(), None)
                }
                CompanyError::MalformedResponse { .. } => (
                    StatusCode::BAD_GATEWAY,
                    "Failed to parse search query".into(),
                    Some("Invalid response format from language model"),
                ),
                CompanyError::UpstreamUnavailable {
                    rate_limited: true,
                    ..
                } => (
                    StatusCode::TOO_MANY_REQUESTS,
                    RATE_LIMIT_MESSAGE.into(),
                    Some("Language model rate limit"),
                ),
                CompanyError::UpstreamUnavailable { .. } => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Search service temporarily unavailable".into(),
                    Some("Language model unavailable"),
                ),
                CompanyError::Configuration(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Invalid API key configuration".into(),
                    Some("Language model credentials rejected"),
                ),
                CompanyError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "Company not found".into(), None)
                }
                CompanyError::Scrape(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Could not fetch company website".into(),
                    Some("Website unreachable or invalid"),
                ),
                CompanyError::UpstreamExhausted { .. } => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    RATE_LIMIT_MESSAGE.into(),
                    Some("Summary rate limit exceeded after retries"),
                ),
                CompanyError::Upstream(_) => (
                    StatusCode::BAD_GATEWAY,
                    "Failed to generate company summary".into(),
                    Some("Language model request failed"),
                ),
                CompanyError::Storage(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".into(),
                    None,
                ),
            },
            Self::Prospect(err) => match err {
                ProspectError::CompanyNotFound(_) => {
                    (StatusCode::NOT_FOUND, "Company not found".into(), None)
                }
                ProspectError::AlreadySaved(_) => (
                    StatusCode::BAD_REQUEST,
                    "Company already saved as prospect".into(),
                    None,
                ),
                ProspectError::NotSaved(_) => {
                    (StatusCode::NOT_FOUND, "Prospect not found".into(), None)
                }
                ProspectError::Storage(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".into(),
                    None,
                ),
            },
        }
    }

    fn log(&self, status: StatusCode) {
        match self {
            Self::Company(CompanyError::MalformedResponse {
                original,
                extracted,
            }) => warn!(
                original = %original,
                extracted = extracted.as_deref().unwrap_or(""),
                "Rejected model response"
            ),
            Self::Company(CompanyError::Storage(e)) | Self::Prospect(ProspectError::Storage(e)) => {
                error!(error = ?e, "Storage failure")
            }
            Self::Company(e) if status.is_server_error() => {
                error!(error = %e, status = status.as_u16(), "Request failed")
            }
            Self::Company(e) => warn!(error = %e, status = status.as_u16(), "Request rejected"),
            Self::Prospect(e) => warn!(error = %e, status = status.as_u16(), "Request rejected"),
            Self::BadRequest(message) => warn!(message = %message, "Bad request"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, error) = self.parts();
        self.log(status);

        (
            status,
            Json(ApiErrorBody::new(message, error.map(String::from))),
        )
            .into_response()
    }
}
