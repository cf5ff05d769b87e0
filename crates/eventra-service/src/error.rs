//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden - valid credentials but insufficient permissions.
    #[error("forbidden")]
    Forbidden,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict - resource already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Requested tickets exceed the event's remaining capacity.
    #[error("capacity exceeded: available={available}, requested={requested}")]
    CapacityExceeded {
        /// Tickets still available.
        available: u32,
        /// Tickets requested.
        requested: u32,
    },

    /// No completed payment exists for the booking.
    #[error("payment required")]
    PaymentRequired,

    /// Not enough behavioral data to compute recommendations.
    #[error("not enough user data for recommendations")]
    InsufficientData,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string(), None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            Self::CapacityExceeded {
                available,
                requested,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "capacity_exceeded",
                self.to_string(),
                Some(serde_json::json!({
                    "available": available,
                    "requested": requested
                })),
            ),
            Self::PaymentRequired => (
                StatusCode::PAYMENT_REQUIRED,
                "payment_required",
                "No completed payment found for this event".to_string(),
                None,
            ),
            Self::InsufficientData => (
                StatusCode::NOT_FOUND,
                "insufficient_data",
                "Not enough user data to compute recommendations".to_string(),
                None,
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<eventra_store::StoreError> for ApiError {
    fn from(err: eventra_store::StoreError) -> Self {
        match err {
            eventra_store::StoreError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} not found: {id}"))
            }
            eventra_store::StoreError::AlreadyBooked { event_id, .. } => {
                Self::Conflict(format!("event {event_id} already booked"))
            }
            eventra_store::StoreError::AlreadyBookmarked { event_id, .. } => {
                Self::Conflict(format!("event {event_id} already bookmarked"))
            }
            eventra_store::StoreError::CapacityExceeded {
                available,
                requested,
            } => Self::CapacityExceeded {
                available,
                requested,
            },
            eventra_store::StoreError::PaymentRequired { .. } => Self::PaymentRequired,
            eventra_store::StoreError::Database(msg)
            | eventra_store::StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}
