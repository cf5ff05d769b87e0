//! Error types for eventra storage.

use eventra_core::{EventId, UserId};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: &'static str,
        /// The identifier that missed.
        id: String,
    },

    /// A booking for this (user, event) pair already exists.
    #[error("user {user_id} already booked event {event_id}")]
    AlreadyBooked {
        /// The booking user.
        user_id: UserId,
        /// The booked event.
        event_id: EventId,
    },

    /// A bookmark for this (user, event) pair already exists.
    #[error("user {user_id} already bookmarked event {event_id}")]
    AlreadyBookmarked {
        /// The bookmarking user.
        user_id: UserId,
        /// The bookmarked event.
        event_id: EventId,
    },

    /// The requested quantity exceeds the event's remaining capacity.
    #[error("capacity exceeded: available={available}, requested={requested}")]
    CapacityExceeded {
        /// Tickets still available for the event.
        available: u32,
        /// Tickets the caller asked for.
        requested: u32,
    },

    /// No completed payment exists for the (user, event) pair.
    #[error("no completed payment for user {user_id} on event {event_id}")]
    PaymentRequired {
        /// The booking user.
        user_id: UserId,
        /// The event being booked.
        event_id: EventId,
    },
}

impl StoreError {
    /// Build a `NotFound` error for the given entity and id.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
