//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary event records, keyed by `event_id`.
    pub const EVENTS: &str = "events";

    /// Primary booking records, keyed by `booking_id` (ULID).
    pub const BOOKINGS: &str = "bookings";

    /// Index: bookings by user, keyed by `user_id || booking_id`.
    /// Value is empty (index only).
    pub const BOOKINGS_BY_USER: &str = "bookings_by_user";

    /// Index: bookings by event, keyed by `event_id || booking_id`.
    /// Value is empty (index only).
    pub const BOOKINGS_BY_EVENT: &str = "bookings_by_event";

    /// Duplicate guard, keyed by `user_id || event_id`.
    /// Value is the `booking_id` bytes, giving O(1) pair lookup.
    pub const BOOKING_PAIRS: &str = "booking_pairs";

    /// Payment records, keyed by `user_id || event_id || payment_id`.
    ///
    /// The 16-byte prefix serves per-user listings; the 32-byte prefix
    /// serves the completed-payment check for a (user, event) pair.
    pub const PAYMENTS: &str = "payments";

    /// Primary review records, keyed by `review_id` (ULID).
    pub const REVIEWS: &str = "reviews";

    /// Index: reviews by event, keyed by `event_id || review_id`.
    pub const REVIEWS_BY_EVENT: &str = "reviews_by_event";

    /// Index: reviews by user, keyed by `user_id || review_id`.
    pub const REVIEWS_BY_USER: &str = "reviews_by_user";

    /// Search history, keyed by `user_id || search_id`. Append-only.
    pub const SEARCH_HISTORY: &str = "search_history";

    /// Bookmarks, keyed by `user_id || event_id`.
    pub const BOOKMARKS: &str = "bookmarks";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::EVENTS,
        cf::BOOKINGS,
        cf::BOOKINGS_BY_USER,
        cf::BOOKINGS_BY_EVENT,
        cf::BOOKING_PAIRS,
        cf::PAYMENTS,
        cf::REVIEWS,
        cf::REVIEWS_BY_EVENT,
        cf::REVIEWS_BY_USER,
        cf::SEARCH_HISTORY,
        cf::BOOKMARKS,
    ]
}
