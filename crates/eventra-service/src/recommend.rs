//! Behavioral recommendation orchestration.
//!
//! Derives a user's signals from their activity history and ranks upcoming
//! events against them. All reads go through the `Store` trait; the logic is
//! idempotent and needs no locking.

use std::collections::BTreeSet;

use chrono::Utc;

use eventra_core::{
    recent_distinct, top_categories, Event, EventFilter, UserId, UserSignals, RECENT_SEARCH_COUNT,
};
use eventra_store::{Store, StoreError};

/// Maximum events returned by the ranker.
pub const MAX_RECOMMENDATIONS: usize = 10;

/// How much search history to scan when deriving the location signal.
const SEARCH_HISTORY_SCAN: usize = 50;

/// Errors from the recommendation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    /// The user has no bookings, reviews, or search history to rank from.
    #[error("not enough user data for recommendations")]
    InsufficientData,

    /// Underlying storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Derive a user's behavioral signals.
///
/// The category signal unions the top categories across the user's bookings
/// with the top categories across their reviews; the location signal is the
/// most recent distinct search strings, newest first. Either or both may be
/// empty.
///
/// # Errors
///
/// Returns an error if a storage read fails.
pub fn derive_signals(store: &dyn Store, user_id: UserId) -> Result<UserSignals, StoreError> {
    let mut booked_labels = Vec::new();
    for booking in store.list_bookings_by_user(&user_id)? {
        if let Some(event) = store.get_event(&booking.event_id)? {
            booked_labels.extend(event.categories.iter().cloned());
        }
    }

    let mut reviewed_labels = Vec::new();
    for review in store.list_reviews_by_user(&user_id)? {
        if let Some(event) = store.get_event(&review.event_id)? {
            reviewed_labels.extend(event.categories.iter().cloned());
        }
    }

    let mut categories: BTreeSet<String> = top_categories(booked_labels).into_iter().collect();
    categories.extend(top_categories(reviewed_labels));

    let history = store.list_search_by_user(&user_id, SEARCH_HISTORY_SCAN)?;
    let locations = recent_distinct(
        history.into_iter().map(|record| record.query),
        RECENT_SEARCH_COUNT,
    );

    Ok(UserSignals {
        categories,
        locations,
    })
}

/// Rank upcoming events against a user's behavioral signals.
///
/// Candidates are future events sharing a signal category or whose location
/// contains a searched term (the predicate groups are alternatives). The
/// result is deduplicated, ordered by start time then event ID, and capped
/// at [`MAX_RECOMMENDATIONS`].
///
/// # Errors
///
/// - `RecommendError::InsufficientData` if both signal sets are empty.
/// - `RecommendError::Store` if a storage read fails.
pub fn behavioral_recommendations(
    store: &dyn Store,
    user_id: UserId,
) -> Result<Vec<Event>, RecommendError> {
    let signals = derive_signals(store, user_id)?;
    if signals.is_empty() {
        return Err(RecommendError::InsufficientData);
    }

    tracing::debug!(
        user_id = %user_id,
        categories = ?signals.categories,
        locations = ?signals.locations,
        "Derived recommendation signals"
    );

    let filter = EventFilter {
        starts_after: Some(Utc::now()),
        categories: signals.categories,
        location_terms: signals.locations,
        text: None,
    };

    let mut events = store.list_events(&filter)?;
    events.truncate(MAX_RECOMMENDATIONS);

    Ok(events)
}
