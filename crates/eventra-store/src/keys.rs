//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families. UUIDs and ULIDs both encode to 16 bytes, so composite
//! keys are fixed-width concatenations and prefix iteration works without
//! separators.

use eventra_core::{BookingId, EventId, PaymentId, ReviewId, SearchId, UserId};

/// Create an event key from an event ID.
#[must_use]
pub fn event_key(event_id: &EventId) -> Vec<u8> {
    event_id.as_bytes().to_vec()
}

/// Create a booking key from a booking ID.
#[must_use]
pub fn booking_key(booking_id: &BookingId) -> Vec<u8> {
    booking_id.to_bytes().to_vec()
}

/// Create a user-booking index key.
///
/// Format: `user_id (16 bytes) || booking_id (16 bytes)`
///
/// Since ULIDs are time-ordered, a user's bookings sort chronologically.
#[must_use]
pub fn user_booking_key(user_id: &UserId, booking_id: &BookingId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&booking_id.to_bytes());
    key
}

/// Create an event-booking index key.
///
/// Format: `event_id (16 bytes) || booking_id (16 bytes)`
#[must_use]
pub fn event_booking_key(event_id: &EventId, booking_id: &BookingId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(event_id.as_bytes());
    key.extend_from_slice(&booking_id.to_bytes());
    key
}

/// Create the duplicate-guard key for a (user, event) pair.
///
/// Format: `user_id (16 bytes) || event_id (16 bytes)`
#[must_use]
pub fn booking_pair_key(user_id: &UserId, event_id: &EventId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(event_id.as_bytes());
    key
}

/// Create a payment key.
///
/// Format: `user_id (16 bytes) || event_id (16 bytes) || payment_id (16 bytes)`
#[must_use]
pub fn payment_key(user_id: &UserId, event_id: &EventId, payment_id: &PaymentId) -> Vec<u8> {
    let mut key = Vec::with_capacity(48);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(event_id.as_bytes());
    key.extend_from_slice(&payment_id.to_bytes());
    key
}

/// Create a review key from a review ID.
#[must_use]
pub fn review_key(review_id: &ReviewId) -> Vec<u8> {
    review_id.to_bytes().to_vec()
}

/// Create an event-review index key.
///
/// Format: `event_id (16 bytes) || review_id (16 bytes)`
#[must_use]
pub fn event_review_key(event_id: &EventId, review_id: &ReviewId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(event_id.as_bytes());
    key.extend_from_slice(&review_id.to_bytes());
    key
}

/// Create a user-review index key.
///
/// Format: `user_id (16 bytes) || review_id (16 bytes)`
#[must_use]
pub fn user_review_key(user_id: &UserId, review_id: &ReviewId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&review_id.to_bytes());
    key
}

/// Create a search-history key.
///
/// Format: `user_id (16 bytes) || search_id (16 bytes)`
#[must_use]
pub fn search_key(user_id: &UserId, search_id: &SearchId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&search_id.to_bytes());
    key
}

/// Create a bookmark key for a (user, event) pair.
///
/// Format: `user_id (16 bytes) || event_id (16 bytes)`
#[must_use]
pub fn bookmark_key(user_id: &UserId, event_id: &EventId) -> Vec<u8> {
    booking_pair_key(user_id, event_id)
}

/// Create a 16-byte prefix for iterating a user's records.
#[must_use]
pub fn user_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a 16-byte prefix for iterating an event's records.
#[must_use]
pub fn event_prefix(event_id: &EventId) -> Vec<u8> {
    event_id.as_bytes().to_vec()
}

/// Create a 32-byte prefix for iterating a (user, event) pair's payments.
#[must_use]
pub fn payment_pair_prefix(user_id: &UserId, event_id: &EventId) -> Vec<u8> {
    booking_pair_key(user_id, event_id)
}

/// Extract the booking ID from the trailing 16 bytes of an index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_booking_id(key: &[u8]) -> BookingId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[key.len() - 16..]);
    BookingId::from_bytes(bytes).expect("valid ULID bytes")
}

/// Extract the review ID from the trailing 16 bytes of an index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_review_id(key: &[u8]) -> ReviewId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[key.len() - 16..]);
    ReviewId::from_bytes(bytes).expect("valid ULID bytes")
}
