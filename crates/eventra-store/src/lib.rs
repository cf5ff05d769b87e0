//! Storage layer for eventra.
//!
//! This crate provides persistent storage for events, bookings, payments,
//! reviews, search history, and bookmarks using `RocksDB` with column
//! families for efficient indexing, plus an in-memory backend for tests.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `events`: Primary event records, keyed by `event_id`
//! - `bookings`: Primary booking records, keyed by `booking_id` (ULID)
//! - `bookings_by_user` / `bookings_by_event`: Index entries for listings
//! - `booking_pairs`: Duplicate guard keyed by `user_id || event_id`
//! - `payments`: Keyed by `user_id || event_id || payment_id`
//! - `reviews` + `reviews_by_event` / `reviews_by_user`: Reviews and indexes
//! - `search_history`: Append-only, keyed by `user_id || search_id`
//! - `bookmarks`: Keyed by `user_id || event_id`
//!
//! # Atomicity
//!
//! The booking mutations (`create_booking`, `cancel_booking`,
//! `delete_event`) are the operations with a cross-record invariant: the sum
//! of booked tickets must never exceed an event's capacity. Each backend
//! serializes these against each other, so the capacity check and the write
//! commit as one unit.
//!
//! # Example
//!
//! ```no_run
//! use eventra_store::{RocksStore, Store};
//! use eventra_core::{Event, EventFilter};
//!
//! let store = RocksStore::open("/tmp/eventra-db").unwrap();
//! let upcoming = store.list_events(&EventFilter::upcoming(chrono::Utc::now())).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use rocks::RocksStore;

use eventra_core::{
    Booking, Bookmark, Event, EventFilter, EventId, Payment, Review, SearchRecord, UserId,
};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (`RocksDB` for production, in-memory for testing). It is
/// also the seam handlers and the recommender see: they never touch a
/// database driver directly.
pub trait Store: Send + Sync {
    // =========================================================================
    // Event Operations
    // =========================================================================

    /// Insert or update an event record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_event(&self, event: &Event) -> Result<()>;

    /// Get an event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_event(&self, event_id: &EventId) -> Result<Option<Event>>;

    /// List events matching a filter, ordered by start time ascending with
    /// ties broken by event ID ascending. Each event appears at most once.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>>;

    /// Delete an event, cascading its bookings.
    ///
    /// Serialized with booking mutations so released capacity is observed
    /// consistently.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the event doesn't exist.
    fn delete_event(&self, event_id: &EventId) -> Result<()>;

    // =========================================================================
    // Booking Operations
    // =========================================================================

    /// Total tickets held by live bookings for an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn booked_quantity(&self, event_id: &EventId) -> Result<u32>;

    /// Tickets still available for an event. `None` means unlimited.
    ///
    /// This is the single counting formula shared by the availability read
    /// and the booking-time capacity check.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the event doesn't exist.
    fn remaining_capacity(&self, event_id: &EventId) -> Result<Option<u32>> {
        let event = self
            .get_event(event_id)?
            .ok_or_else(|| StoreError::not_found("event", event_id))?;

        match event.capacity {
            None => Ok(None),
            Some(capacity) => {
                let booked = self.booked_quantity(event_id)?;
                Ok(Some(capacity.saturating_sub(booked)))
            }
        }
    }

    /// Create a booking, enforcing the workflow preconditions atomically
    /// with respect to all other booking mutations.
    ///
    /// Checks run in order: event existence, duplicate pair, capacity,
    /// payment.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the event doesn't exist.
    /// - `StoreError::AlreadyBooked` if the (user, event) pair has a booking.
    /// - `StoreError::CapacityExceeded` if the quantity exceeds the remaining
    ///   capacity; carries the exact remainder.
    /// - `StoreError::PaymentRequired` if no completed payment exists for the
    ///   pair.
    fn create_booking(&self, booking: &Booking) -> Result<()>;

    /// Cancel a user's booking for an event, releasing its tickets.
    ///
    /// Returns the removed booking. Serialized with concurrent bookings.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such booking exists.
    fn cancel_booking(&self, user_id: &UserId, event_id: &EventId) -> Result<Booking>;

    /// Get a user's booking for an event, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_booking(&self, user_id: &UserId, event_id: &EventId) -> Result<Option<Booking>>;

    /// List a user's bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_bookings_by_user(&self, user_id: &UserId) -> Result<Vec<Booking>>;

    /// List an event's bookings, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_bookings_by_event(&self, event_id: &EventId) -> Result<Vec<Booking>>;

    // =========================================================================
    // Payment Operations
    // =========================================================================

    /// Insert a payment record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_payment(&self, payment: &Payment) -> Result<()>;

    /// List a user's payments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_payments_by_user(&self, user_id: &UserId) -> Result<Vec<Payment>>;

    /// Whether a completed payment exists for the (user, event) pair.
    ///
    /// Pending and failed payments never count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn has_completed_payment(&self, user_id: &UserId, event_id: &EventId) -> Result<bool>;

    // =========================================================================
    // Review Operations
    // =========================================================================

    /// Insert a review. Maintains the event and user indexes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_review(&self, review: &Review) -> Result<()>;

    /// List an event's reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_reviews_by_event(&self, event_id: &EventId) -> Result<Vec<Review>>;

    /// List a user's reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_reviews_by_user(&self, user_id: &UserId) -> Result<Vec<Review>>;

    // =========================================================================
    // Search History Operations
    // =========================================================================

    /// Append a search record. Records are never mutated or deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_search_record(&self, record: &SearchRecord) -> Result<()>;

    /// List a user's search history, newest first, up to `limit` records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_search_by_user(&self, user_id: &UserId, limit: usize) -> Result<Vec<SearchRecord>>;

    // =========================================================================
    // Bookmark Operations
    // =========================================================================

    /// Create a bookmark for a (user, event) pair.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyBookmarked` if the pair already has one.
    fn create_bookmark(&self, bookmark: &Bookmark) -> Result<()>;

    /// List a user's bookmarks, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_bookmarks_by_user(&self, user_id: &UserId) -> Result<Vec<Bookmark>>;
}
