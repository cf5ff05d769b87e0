//! Payment records.
//!
//! Payments are recorded against a (user, event) pair before booking. The
//! booking workflow only checks for a completed payment; settlement with the
//! payment provider happens outside this system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EventId, PaymentId, UserId};

/// A payment made by a user towards an event.
///
/// Multiple payment rows per (user, event) pair are allowed; only a row with
/// [`PaymentStatus::Completed`] satisfies the booking precondition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique payment ID (ULID for time-ordering).
    pub id: PaymentId,

    /// The paying user.
    pub user_id: UserId,

    /// The event paid for.
    pub event_id: EventId,

    /// Amount in cents.
    pub amount_cents: i64,

    /// Payment method label (e.g. "card", "cash").
    pub method: String,

    /// Settlement status.
    pub status: PaymentStatus,

    /// When the payment was recorded.
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Create a payment record with a fresh ID and creation timestamp.
    #[must_use]
    pub fn new(
        user_id: UserId,
        event_id: EventId,
        amount_cents: i64,
        method: String,
        status: PaymentStatus,
    ) -> Self {
        Self {
            id: PaymentId::generate(),
            user_id,
            event_id,
            amount_cents,
            method,
            status,
            created_at: Utc::now(),
        }
    }
}

/// Settlement status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting provider settlement.
    Pending,

    /// Settled; enables booking.
    Completed,

    /// Settlement failed.
    Failed,
}

impl PaymentStatus {
    /// Whether this status satisfies the booking payment precondition.
    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}
