//! Event catalog types.
//!
//! This module defines the event document and the typed filter that backends
//! evaluate when listing events.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EventId, UserId};

/// A published event in the marketplace catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// The event ID.
    pub id: EventId,

    /// The user who published the event.
    pub organizer_id: UserId,

    /// Event title.
    pub title: String,

    /// Longer description shown on the event page.
    pub description: String,

    /// Venue or city, free-form text.
    pub location: String,

    /// Ticket price in cents.
    /// Stored as `i64` (integer cents) to avoid floating point precision issues.
    pub price_cents: i64,

    /// Currency code for the price (e.g. "USD").
    pub currency: String,

    /// Maximum tickets that can be sold. `None` means unlimited.
    pub capacity: Option<u32>,

    /// Category labels attached to the event (e.g. "Music", "Art").
    pub categories: BTreeSet<String>,

    /// Image URLs for the event page.
    pub images: Vec<String>,

    /// When the event starts.
    pub starts_at: DateTime<Utc>,

    /// When the event ends.
    pub ends_at: DateTime<Utc>,

    /// When the event was created.
    pub created_at: DateTime<Utc>,
}

/// A typed filter over catalog events.
///
/// The filter is evaluated against whole `Event` records, so every storage
/// backend applies identical matching rules. The time bound always applies;
/// the remaining criteria are alternatives: an event passes if it matches any
/// configured category, location term, or text query. A filter with no
/// criteria matches everything within the time bound.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Only match events starting strictly after this instant.
    pub starts_after: Option<DateTime<Utc>>,

    /// Match events carrying at least one of these category labels.
    pub categories: BTreeSet<String>,

    /// Match events whose location contains one of these terms
    /// (case-insensitive).
    pub location_terms: Vec<String>,

    /// Match events whose title, description, or location contains this text
    /// (case-insensitive).
    pub text: Option<String>,
}

impl EventFilter {
    /// A filter matching every event that starts after `now`.
    #[must_use]
    pub fn upcoming(now: DateTime<Utc>) -> Self {
        Self {
            starts_after: Some(now),
            ..Self::default()
        }
    }

    /// Whether any match criterion is configured beyond the time bound.
    #[must_use]
    pub fn has_criteria(&self) -> bool {
        !self.categories.is_empty() || !self.location_terms.is_empty() || self.text.is_some()
    }

    /// Check whether an event satisfies this filter.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(cutoff) = self.starts_after {
            if event.starts_at <= cutoff {
                return false;
            }
        }

        if !self.has_criteria() {
            return true;
        }

        if event
            .categories
            .iter()
            .any(|label| self.categories.contains(label))
        {
            return true;
        }

        let location = event.location.to_lowercase();
        if self
            .location_terms
            .iter()
            .any(|term| location.contains(&term.to_lowercase()))
        {
            return true;
        }

        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            if event.title.to_lowercase().contains(&needle)
                || event.description.to_lowercase().contains(&needle)
                || location.contains(&needle)
            {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(location: &str, categories: &[&str], starts_in_days: i64) -> Event {
        let starts_at = Utc::now() + chrono::Duration::days(starts_in_days);
        Event {
            id: EventId::generate(),
            organizer_id: UserId::generate(),
            title: "Jazz Night".into(),
            description: "An evening of live jazz".into(),
            location: location.into(),
            price_cents: 2500,
            currency: "USD".into(),
            capacity: Some(100),
            categories: categories.iter().map(ToString::to_string).collect(),
            images: vec![],
            starts_at,
            ends_at: starts_at + chrono::Duration::hours(3),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let event = sample_event("Beirut", &["Music"], 7);
        assert!(EventFilter::default().matches(&event));
    }

    #[test]
    fn time_bound_excludes_past_events() {
        let past = sample_event("Beirut", &["Music"], -1);
        let future = sample_event("Beirut", &["Music"], 7);
        let filter = EventFilter::upcoming(Utc::now());

        assert!(!filter.matches(&past));
        assert!(filter.matches(&future));
    }

    #[test]
    fn category_match_is_exact_label() {
        let event = sample_event("Beirut", &["Music"], 7);

        let mut filter = EventFilter::upcoming(Utc::now());
        filter.categories.insert("Music".into());
        assert!(filter.matches(&event));

        let mut other = EventFilter::upcoming(Utc::now());
        other.categories.insert("music".into());
        assert!(!other.matches(&event));
    }

    #[test]
    fn location_match_is_case_insensitive_substring() {
        let event = sample_event("Beirut Waterfront", &["Music"], 7);

        let mut filter = EventFilter::upcoming(Utc::now());
        filter.location_terms.push("beirut".into());
        assert!(filter.matches(&event));
    }

    #[test]
    fn criteria_are_alternatives() {
        // Matches by location only, not category
        let event = sample_event("Tripoli", &["Theatre"], 7);

        let mut filter = EventFilter::upcoming(Utc::now());
        filter.categories.insert("Music".into());
        filter.location_terms.push("tripoli".into());
        assert!(filter.matches(&event));

        // Matches neither
        let unmatched = sample_event("Byblos", &["Theatre"], 7);
        assert!(!filter.matches(&unmatched));
    }

    #[test]
    fn text_searches_title_description_and_location() {
        let event = sample_event("Beirut", &["Music"], 7);

        for needle in ["jazz", "live JAZZ", "beirut"] {
            let filter = EventFilter {
                text: Some(needle.into()),
                ..EventFilter::default()
            };
            assert!(filter.matches(&event), "expected match for {needle:?}");
        }

        let filter = EventFilter {
            text: Some("techno".into()),
            ..EventFilter::default()
        };
        assert!(!filter.matches(&event));
    }
}
