//! Behavioral signal derivation.
//!
//! Pure functions that turn a user's activity history into recommendation
//! signals. The aggregation itself needs no store access; callers feed in
//! category labels and search strings read from storage.

use std::collections::{BTreeSet, HashMap};

/// How many top categories each activity source contributes.
pub const TOP_CATEGORY_COUNT: usize = 3;

/// How many recent distinct search strings form the location signal.
pub const RECENT_SEARCH_COUNT: usize = 3;

/// Signals derived from a user's bookings, reviews, and search history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSignals {
    /// Preferred category labels (union of top categories from bookings and
    /// reviews).
    pub categories: BTreeSet<String>,

    /// Recently searched strings, most recent first, deduplicated.
    pub locations: Vec<String>,
}

impl UserSignals {
    /// Whether no signal of either kind is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.locations.is_empty()
    }
}

/// The top [`TOP_CATEGORY_COUNT`] category labels by frequency.
///
/// Frequency ties break by label ascending, so the result is deterministic
/// regardless of input order.
#[must_use]
pub fn top_categories<I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_CATEGORY_COUNT);

    ranked.into_iter().map(|(label, _)| label).collect()
}

/// The first `limit` distinct strings, preserving input order.
///
/// Input must be ordered newest first; the first occurrence of a repeated
/// string wins, so the output keeps recency order.
#[must_use]
pub fn recent_distinct<I>(queries: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = BTreeSet::new();
    let mut distinct = Vec::new();

    for query in queries {
        if distinct.len() >= limit {
            break;
        }
        if seen.insert(query.clone()) {
            distinct.push(query);
        }
    }

    distinct
}
