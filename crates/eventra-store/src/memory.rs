//! In-memory storage implementation.
//!
//! This module provides `MemoryStore`, a `Store` backend holding everything
//! in maps behind a single mutex. It exists for tests and local runs; the
//! one lock trivially serializes booking mutations, so the capacity
//! invariant holds the same way it does for the `RocksDB` backend.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use eventra_core::{
    Booking, Bookmark, Event, EventFilter, EventId, Payment, Review, SearchRecord, UserId,
};

use crate::error::{Result, StoreError};
use crate::Store;

/// In-memory storage implementation.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    events: BTreeMap<EventId, Event>,
    bookings: BTreeMap<(UserId, EventId), Booking>,
    payments: Vec<Payment>,
    reviews: Vec<Review>,
    searches: Vec<SearchRecord>,
    bookmarks: BTreeMap<(UserId, EventId), Bookmark>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Database("store lock poisoned".into()))
    }
}

impl Inner {
    fn booked_quantity(&self, event_id: &EventId) -> u32 {
        self.bookings
            .values()
            .filter(|b| b.event_id == *event_id)
            .map(|b| b.quantity)
            .sum()
    }

    fn has_completed_payment(&self, user_id: &UserId, event_id: &EventId) -> bool {
        self.payments.iter().any(|p| {
            p.user_id == *user_id && p.event_id == *event_id && p.status.is_completed()
        })
    }
}

impl Store for MemoryStore {
    fn put_event(&self, event: &Event) -> Result<()> {
        self.lock()?.events.insert(event.id, event.clone());
        Ok(())
    }

    fn get_event(&self, event_id: &EventId) -> Result<Option<Event>> {
        Ok(self.lock()?.events.get(event_id).cloned())
    }

    fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let inner = self.lock()?;

        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect();

        events.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then_with(|| a.id.cmp(&b.id)));

        Ok(events)
    }

    fn delete_event(&self, event_id: &EventId) -> Result<()> {
        let mut inner = self.lock()?;

        if inner.events.remove(event_id).is_none() {
            return Err(StoreError::not_found("event", event_id));
        }

        inner.bookings.retain(|_, b| b.event_id != *event_id);

        Ok(())
    }

    fn booked_quantity(&self, event_id: &EventId) -> Result<u32> {
        Ok(self.lock()?.booked_quantity(event_id))
    }

    fn create_booking(&self, booking: &Booking) -> Result<()> {
        let mut inner = self.lock()?;

        let event = inner
            .events
            .get(&booking.event_id)
            .ok_or_else(|| StoreError::not_found("event", booking.event_id))?;

        let pair = (booking.user_id, booking.event_id);
        if inner.bookings.contains_key(&pair) {
            return Err(StoreError::AlreadyBooked {
                user_id: booking.user_id,
                event_id: booking.event_id,
            });
        }

        if let Some(capacity) = event.capacity {
            let available = capacity.saturating_sub(inner.booked_quantity(&booking.event_id));
            if booking.quantity > available {
                return Err(StoreError::CapacityExceeded {
                    available,
                    requested: booking.quantity,
                });
            }
        }

        if !inner.has_completed_payment(&booking.user_id, &booking.event_id) {
            return Err(StoreError::PaymentRequired {
                user_id: booking.user_id,
                event_id: booking.event_id,
            });
        }

        inner.bookings.insert(pair, booking.clone());
        Ok(())
    }

    fn cancel_booking(&self, user_id: &UserId, event_id: &EventId) -> Result<Booking> {
        self.lock()?
            .bookings
            .remove(&(*user_id, *event_id))
            .ok_or_else(|| StoreError::not_found("booking", event_id))
    }

    fn get_booking(&self, user_id: &UserId, event_id: &EventId) -> Result<Option<Booking>> {
        Ok(self.lock()?.bookings.get(&(*user_id, *event_id)).cloned())
    }

    fn list_bookings_by_user(&self, user_id: &UserId) -> Result<Vec<Booking>> {
        let inner = self.lock()?;

        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| b.user_id == *user_id)
            .cloned()
            .collect();

        bookings.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(bookings)
    }

    fn list_bookings_by_event(&self, event_id: &EventId) -> Result<Vec<Booking>> {
        let inner = self.lock()?;

        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| b.event_id == *event_id)
            .cloned()
            .collect();

        bookings.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(bookings)
    }

    fn put_payment(&self, payment: &Payment) -> Result<()> {
        self.lock()?.payments.push(payment.clone());
        Ok(())
    }

    fn list_payments_by_user(&self, user_id: &UserId) -> Result<Vec<Payment>> {
        let inner = self.lock()?;

        let mut payments: Vec<Payment> = inner
            .payments
            .iter()
            .filter(|p| p.user_id == *user_id)
            .cloned()
            .collect();

        payments.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(payments)
    }

    fn has_completed_payment(&self, user_id: &UserId, event_id: &EventId) -> Result<bool> {
        Ok(self.lock()?.has_completed_payment(user_id, event_id))
    }

    fn put_review(&self, review: &Review) -> Result<()> {
        self.lock()?.reviews.push(review.clone());
        Ok(())
    }

    fn list_reviews_by_event(&self, event_id: &EventId) -> Result<Vec<Review>> {
        let inner = self.lock()?;

        let mut reviews: Vec<Review> = inner
            .reviews
            .iter()
            .filter(|r| r.event_id == *event_id)
            .cloned()
            .collect();

        reviews.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(reviews)
    }

    fn list_reviews_by_user(&self, user_id: &UserId) -> Result<Vec<Review>> {
        let inner = self.lock()?;

        let mut reviews: Vec<Review> = inner
            .reviews
            .iter()
            .filter(|r| r.user_id == *user_id)
            .cloned()
            .collect();

        reviews.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(reviews)
    }

    fn put_search_record(&self, record: &SearchRecord) -> Result<()> {
        self.lock()?.searches.push(record.clone());
        Ok(())
    }

    fn list_search_by_user(&self, user_id: &UserId, limit: usize) -> Result<Vec<SearchRecord>> {
        let inner = self.lock()?;

        let mut records: Vec<SearchRecord> = inner
            .searches
            .iter()
            .filter(|r| r.user_id == *user_id)
            .cloned()
            .collect();

        records.sort_by(|a, b| b.id.cmp(&a.id));
        records.truncate(limit);

        Ok(records)
    }

    fn create_bookmark(&self, bookmark: &Bookmark) -> Result<()> {
        let mut inner = self.lock()?;

        let pair = (bookmark.user_id, bookmark.event_id);
        if inner.bookmarks.contains_key(&pair) {
            return Err(StoreError::AlreadyBookmarked {
                user_id: bookmark.user_id,
                event_id: bookmark.event_id,
            });
        }

        inner.bookmarks.insert(pair, bookmark.clone());
        Ok(())
    }

    fn list_bookmarks_by_user(&self, user_id: &UserId) -> Result<Vec<Bookmark>> {
        let inner = self.lock()?;

        let mut bookmarks: Vec<Bookmark> = inner
            .bookmarks
            .values()
            .filter(|b| b.user_id == *user_id)
            .cloned()
            .collect();

        bookmarks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.event_id.cmp(&b.event_id))
        });

        Ok(bookmarks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use eventra_core::PaymentStatus;

    fn sample_event(capacity: Option<u32>) -> Event {
        let starts_at = Utc::now() + chrono::Duration::days(7);
        Event {
            id: EventId::generate(),
            organizer_id: UserId::generate(),
            title: "Art Fair".into(),
            description: "Local artists".into(),
            location: "Tripoli".into(),
            price_cents: 1000,
            currency: "USD".into(),
            capacity,
            categories: ["Art".to_string()].into_iter().collect(),
            images: vec![],
            starts_at,
            ends_at: starts_at + chrono::Duration::hours(6),
            created_at: Utc::now(),
        }
    }

    fn pay(store: &MemoryStore, user_id: UserId, event_id: EventId) {
        let payment = Payment::new(user_id, event_id, 1000, "card".into(), PaymentStatus::Completed);
        store.put_payment(&payment).unwrap();
    }

    #[test]
    fn booking_workflow_checks_run_in_order() {
        let store = MemoryStore::new();
        let event = sample_event(Some(1));
        store.put_event(&event).unwrap();

        let user_id = UserId::generate();

        // Capacity check precedes payment check: fill the event, then a
        // payment-less user must see CapacityExceeded
        pay(&store, user_id, event.id);
        store.create_booking(&Booking::new(user_id, event.id, 1)).unwrap();

        let other = UserId::generate();
        let result = store.create_booking(&Booking::new(other, event.id, 1));
        assert!(matches!(
            result,
            Err(StoreError::CapacityExceeded { available: 0, .. })
        ));
    }

    #[test]
    fn remaining_capacity_matches_rocks_semantics() {
        let store = MemoryStore::new();
        let event = sample_event(Some(4));
        store.put_event(&event).unwrap();

        let user_id = UserId::generate();
        pay(&store, user_id, event.id);
        store.create_booking(&Booking::new(user_id, event.id, 3)).unwrap();

        assert_eq!(store.remaining_capacity(&event.id).unwrap(), Some(1));

        store.cancel_booking(&user_id, &event.id).unwrap();
        assert_eq!(store.remaining_capacity(&event.id).unwrap(), Some(4));
    }

    #[test]
    fn unknown_event_capacity_is_not_found() {
        let store = MemoryStore::new();
        let result = store.remaining_capacity(&EventId::generate());
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn delete_event_cascades() {
        let store = MemoryStore::new();
        let event = sample_event(None);
        store.put_event(&event).unwrap();

        let user_id = UserId::generate();
        pay(&store, user_id, event.id);
        store.create_booking(&Booking::new(user_id, event.id, 2)).unwrap();

        store.delete_event(&event.id).unwrap();
        assert!(store.get_booking(&user_id, &event.id).unwrap().is_none());
    }
}
