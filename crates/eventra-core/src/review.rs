//! Review records and rating aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EventId, ReviewId, UserId};

/// Minimum allowed rating.
pub const MIN_RATING: u8 = 1;

/// Maximum allowed rating.
pub const MAX_RATING: u8 = 5;

/// A user's review of an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Unique review ID (ULID for time-ordering).
    pub id: ReviewId,

    /// The reviewing user.
    pub user_id: UserId,

    /// The reviewed event.
    pub event_id: EventId,

    /// Star rating in `MIN_RATING..=MAX_RATING`.
    pub rating: u8,

    /// Free-form comment text.
    pub comment: String,

    /// When the review was submitted.
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Create a review with a fresh ID and creation timestamp.
    #[must_use]
    pub fn new(user_id: UserId, event_id: EventId, rating: u8, comment: String) -> Self {
        Self {
            id: ReviewId::generate(),
            user_id,
            event_id,
            rating,
            comment,
            created_at: Utc::now(),
        }
    }
}

/// Arithmetic mean of ratings, or `None` when there are no reviews.
///
/// This is the single definition of the aggregate rating used wherever an
/// event is returned hydrated.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
    Some(total as f64 / reviews.len() as f64)
}
