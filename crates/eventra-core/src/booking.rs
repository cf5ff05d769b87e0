//! Booking records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BookingId, EventId, UserId};

/// A confirmed ticket booking for an event.
///
/// At most one booking exists per (user, event) pair. The ticket quantity is
/// fixed at creation; changing it means cancelling and booking again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking ID (ULID for time-ordering).
    pub id: BookingId,

    /// The user who booked.
    pub user_id: UserId,

    /// The event booked.
    pub event_id: EventId,

    /// Number of tickets held by this booking. Always at least 1.
    pub quantity: u32,

    /// When the booking was created (server-assigned).
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Create a booking with a fresh time-ordered ID and creation timestamp.
    #[must_use]
    pub fn new(user_id: UserId, event_id: EventId, quantity: u32) -> Self {
        Self {
            id: BookingId::generate(),
            user_id,
            event_id,
            quantity,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_booking_stamps_id_and_timestamp() {
        let user_id = UserId::generate();
        let event_id = EventId::generate();
        let booking = Booking::new(user_id, event_id, 2);

        assert_eq!(booking.user_id, user_id);
        assert_eq!(booking.event_id, event_id);
        assert_eq!(booking.quantity, 2);
        assert!(booking.created_at <= Utc::now());
    }
}
