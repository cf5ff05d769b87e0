//! Bookmark records (explicit user-created recommendations).
//!
//! Bookmarks are distinct from behavioral recommendations: a bookmark is a
//! deliberate save by the user, unique per (user, event) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EventId, UserId};

/// An event bookmarked by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    /// The bookmarking user.
    pub user_id: UserId,

    /// The bookmarked event.
    pub event_id: EventId,

    /// When the bookmark was created.
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    /// Create a bookmark with a fresh creation timestamp.
    #[must_use]
    pub fn new(user_id: UserId, event_id: EventId) -> Self {
        Self {
            user_id,
            event_id,
            created_at: Utc::now(),
        }
    }
}
