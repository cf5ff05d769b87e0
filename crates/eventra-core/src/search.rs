//! Search history records.
//!
//! Search queries are logged append-only and read back only as a
//! recommendation signal. Records are never mutated or deleted here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{SearchId, UserId};

/// A logged search query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Unique entry ID (ULID for time-ordering).
    pub id: SearchId,

    /// The searching user.
    pub user_id: UserId,

    /// The raw query string as typed.
    pub query: String,

    /// When the search was made.
    pub created_at: DateTime<Utc>,
}

impl SearchRecord {
    /// Create a search record with a fresh ID and timestamp.
    #[must_use]
    pub fn new(user_id: UserId, query: String) -> Self {
        Self {
            id: SearchId::generate(),
            user_id,
            query,
            created_at: Utc::now(),
        }
    }
}
