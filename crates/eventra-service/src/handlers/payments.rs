//! Payment ledger handlers.
//!
//! Provider settlement is out of scope; a recorded payment defaults to
//! `completed`, which is what the booking workflow checks for.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventra_core::{EventId, Payment, PaymentId, PaymentStatus};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::events::parse_event_id;
use crate::state::AppState;

/// Payment creation request.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// The event paid for.
    pub event_id: String,
    /// Amount in cents (non-negative).
    pub amount_cents: i64,
    /// Payment method label.
    #[serde(default = "default_method")]
    pub method: String,
    /// Settlement status (defaults to `completed`).
    pub status: Option<PaymentStatus>,
}

fn default_method() -> String {
    "card".into()
}

/// Payment record response.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// The payment ID.
    pub id: PaymentId,
    /// The event paid for.
    pub event_id: EventId,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Payment method label.
    pub method: String,
    /// Settlement status.
    pub status: PaymentStatus,
    /// When the payment was recorded.
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            event_id: payment.event_id,
            amount_cents: payment.amount_cents,
            method: payment.method,
            status: payment.status,
            created_at: payment.created_at,
        }
    }
}

/// Record a payment for an event.
pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    let event_id = parse_event_id(&body.event_id)?;

    if body.amount_cents < 0 {
        return Err(ApiError::BadRequest("Amount must not be negative".into()));
    }

    if state.store.get_event(&event_id)?.is_none() {
        return Err(ApiError::NotFound(format!("event not found: {event_id}")));
    }

    let payment = Payment::new(
        auth.user_id,
        event_id,
        body.amount_cents,
        body.method,
        body.status.unwrap_or(PaymentStatus::Completed),
    );

    state.store.put_payment(&payment)?;

    tracing::info!(
        payment_id = %payment.id,
        user_id = %auth.user_id,
        event_id = %event_id,
        amount_cents = payment.amount_cents,
        status = ?payment.status,
        "Payment recorded"
    );

    Ok((StatusCode::CREATED, Json(payment.into())))
}

/// Payment list response.
#[derive(Debug, Serialize)]
pub struct PaymentListResponse {
    /// The caller's payments, newest first.
    pub payments: Vec<PaymentResponse>,
}

/// List the caller's payments, newest first.
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<PaymentListResponse>, ApiError> {
    let payments = state
        .store
        .list_payments_by_user(&auth.user_id)?
        .into_iter()
        .map(PaymentResponse::from)
        .collect();

    Ok(Json(PaymentListResponse { payments }))
}
