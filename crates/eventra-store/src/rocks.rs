//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use eventra_core::{
    Booking, Bookmark, Event, EventFilter, EventId, Payment, Review, SearchRecord, UserId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
///
/// Reads are lock-free. Booking mutations (`create_booking`,
/// `cancel_booking`, `delete_event`) take `booking_lock` so the capacity
/// check and the write commit as one unit; requests for different events
/// still serialize against each other, which is acceptable for an embedded
/// single-writer store.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    booking_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            booking_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Collect all key/value pairs under a prefix, in key order.
    fn prefix_scan(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, rocksdb::Direction::Forward));

        let mut entries = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(prefix) {
                break;
            }

            entries.push((key.to_vec(), value.to_vec()));
        }

        Ok(entries)
    }

    /// Take the booking mutation lock.
    fn lock_bookings(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.booking_lock
            .lock()
            .map_err(|_| StoreError::Database("booking lock poisoned".into()))
    }

    /// Get a booking by its primary ID.
    fn get_booking_record(&self, booking_id: &eventra_core::BookingId) -> Result<Option<Booking>> {
        let cf = self.cf(cf::BOOKINGS)?;
        let key = keys::booking_key(booking_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Get a review by its primary ID.
    fn get_review_record(&self, review_id: &eventra_core::ReviewId) -> Result<Option<Review>> {
        let cf = self.cf(cf::REVIEWS)?;
        let key = keys::review_key(review_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Stage the deletion of a booking's four keys into a batch.
    fn stage_booking_delete(&self, batch: &mut WriteBatch, booking: &Booking) -> Result<()> {
        let cf_bookings = self.cf(cf::BOOKINGS)?;
        let cf_by_user = self.cf(cf::BOOKINGS_BY_USER)?;
        let cf_by_event = self.cf(cf::BOOKINGS_BY_EVENT)?;
        let cf_pairs = self.cf(cf::BOOKING_PAIRS)?;

        batch.delete_cf(&cf_bookings, keys::booking_key(&booking.id));
        batch.delete_cf(
            &cf_by_user,
            keys::user_booking_key(&booking.user_id, &booking.id),
        );
        batch.delete_cf(
            &cf_by_event,
            keys::event_booking_key(&booking.event_id, &booking.id),
        );
        batch.delete_cf(
            &cf_pairs,
            keys::booking_pair_key(&booking.user_id, &booking.event_id),
        );

        Ok(())
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Event Operations
    // =========================================================================

    fn put_event(&self, event: &Event) -> Result<()> {
        let cf = self.cf(cf::EVENTS)?;
        let key = keys::event_key(&event.id);
        let value = Self::serialize(event)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_event(&self, event_id: &EventId) -> Result<Option<Event>> {
        let cf = self.cf(cf::EVENTS)?;
        let key = keys::event_key(event_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let cf = self.cf(cf::EVENTS)?;
        let iter = self.db.iterator_cf(&cf, IteratorMode::Start);

        let mut events = Vec::new();
        for item in iter {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            let event: Event = Self::deserialize(&value)?;

            if filter.matches(&event) {
                events.push(event);
            }
        }

        events.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then_with(|| a.id.cmp(&b.id)));

        Ok(events)
    }

    fn delete_event(&self, event_id: &EventId) -> Result<()> {
        let _guard = self.lock_bookings()?;

        if self.get_event(event_id)?.is_none() {
            return Err(StoreError::not_found("event", event_id));
        }

        let bookings = self.list_bookings_by_event(event_id)?;

        let cf_events = self.cf(cf::EVENTS)?;
        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_events, keys::event_key(event_id));

        for booking in &bookings {
            self.stage_booking_delete(&mut batch, booking)?;
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(
            event_id = %event_id,
            cascaded_bookings = bookings.len(),
            "Event deleted"
        );

        Ok(())
    }

    // =========================================================================
    // Booking Operations
    // =========================================================================

    fn booked_quantity(&self, event_id: &EventId) -> Result<u32> {
        let bookings = self.list_bookings_by_event(event_id)?;
        Ok(bookings.iter().map(|b| b.quantity).sum())
    }

    fn create_booking(&self, booking: &Booking) -> Result<()> {
        let _guard = self.lock_bookings()?;

        // 1. Event must exist
        let event = self
            .get_event(&booking.event_id)?
            .ok_or_else(|| StoreError::not_found("event", booking.event_id))?;

        // 2. One booking per (user, event) pair
        if self.get_booking(&booking.user_id, &booking.event_id)?.is_some() {
            return Err(StoreError::AlreadyBooked {
                user_id: booking.user_id,
                event_id: booking.event_id,
            });
        }

        // 3. Capacity check (skipped for unlimited events), same counting
        //    formula as `remaining_capacity`
        if let Some(capacity) = event.capacity {
            let booked = self.booked_quantity(&booking.event_id)?;
            let available = capacity.saturating_sub(booked);

            if booking.quantity > available {
                return Err(StoreError::CapacityExceeded {
                    available,
                    requested: booking.quantity,
                });
            }
        }

        // 4. A completed payment must exist for the pair
        if !self.has_completed_payment(&booking.user_id, &booking.event_id)? {
            return Err(StoreError::PaymentRequired {
                user_id: booking.user_id,
                event_id: booking.event_id,
            });
        }

        // 5. Insert
        let cf_bookings = self.cf(cf::BOOKINGS)?;
        let cf_by_user = self.cf(cf::BOOKINGS_BY_USER)?;
        let cf_by_event = self.cf(cf::BOOKINGS_BY_EVENT)?;
        let cf_pairs = self.cf(cf::BOOKING_PAIRS)?;

        let value = Self::serialize(booking)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_bookings, keys::booking_key(&booking.id), &value);
        batch.put_cf(
            &cf_by_user,
            keys::user_booking_key(&booking.user_id, &booking.id),
            [],
        );
        batch.put_cf(
            &cf_by_event,
            keys::event_booking_key(&booking.event_id, &booking.id),
            [],
        );
        batch.put_cf(
            &cf_pairs,
            keys::booking_pair_key(&booking.user_id, &booking.event_id),
            booking.id.to_bytes(),
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn cancel_booking(&self, user_id: &UserId, event_id: &EventId) -> Result<Booking> {
        let _guard = self.lock_bookings()?;

        let booking = self
            .get_booking(user_id, event_id)?
            .ok_or_else(|| StoreError::not_found("booking", event_id))?;

        let mut batch = WriteBatch::default();
        self.stage_booking_delete(&mut batch, &booking)?;

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(booking)
    }

    fn get_booking(&self, user_id: &UserId, event_id: &EventId) -> Result<Option<Booking>> {
        let cf_pairs = self.cf(cf::BOOKING_PAIRS)?;
        let pair_key = keys::booking_pair_key(user_id, event_id);

        let Some(id_bytes) = self
            .db
            .get_cf(&cf_pairs, pair_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut bytes = [0u8; 16];
        if id_bytes.len() != 16 {
            return Err(StoreError::Database("malformed booking pair entry".into()));
        }
        bytes.copy_from_slice(&id_bytes);
        let booking_id = eventra_core::BookingId::from_bytes(bytes)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        self.get_booking_record(&booking_id)
    }

    fn list_bookings_by_user(&self, user_id: &UserId) -> Result<Vec<Booking>> {
        let prefix = keys::user_prefix(user_id);
        let mut entries = self.prefix_scan(cf::BOOKINGS_BY_USER, &prefix)?;

        // ULID suffixes sort oldest first; reverse for newest first
        entries.reverse();

        let mut bookings = Vec::with_capacity(entries.len());
        for (key, _) in entries {
            let booking_id = keys::extract_booking_id(&key);
            if let Some(booking) = self.get_booking_record(&booking_id)? {
                bookings.push(booking);
            }
        }

        Ok(bookings)
    }

    fn list_bookings_by_event(&self, event_id: &EventId) -> Result<Vec<Booking>> {
        let prefix = keys::event_prefix(event_id);
        let entries = self.prefix_scan(cf::BOOKINGS_BY_EVENT, &prefix)?;

        let mut bookings = Vec::with_capacity(entries.len());
        for (key, _) in entries {
            let booking_id = keys::extract_booking_id(&key);
            if let Some(booking) = self.get_booking_record(&booking_id)? {
                bookings.push(booking);
            }
        }

        Ok(bookings)
    }

    // =========================================================================
    // Payment Operations
    // =========================================================================

    fn put_payment(&self, payment: &Payment) -> Result<()> {
        let cf = self.cf(cf::PAYMENTS)?;
        let key = keys::payment_key(&payment.user_id, &payment.event_id, &payment.id);
        let value = Self::serialize(payment)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn list_payments_by_user(&self, user_id: &UserId) -> Result<Vec<Payment>> {
        let prefix = keys::user_prefix(user_id);
        let entries = self.prefix_scan(cf::PAYMENTS, &prefix)?;

        let mut payments = Vec::with_capacity(entries.len());
        for (_, value) in entries {
            payments.push(Self::deserialize::<Payment>(&value)?);
        }

        // Keys group by event before time, so sort by payment ID (ULID,
        // time-ordered) for a newest-first listing
        payments.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(payments)
    }

    fn has_completed_payment(&self, user_id: &UserId, event_id: &EventId) -> Result<bool> {
        let prefix = keys::payment_pair_prefix(user_id, event_id);
        let entries = self.prefix_scan(cf::PAYMENTS, &prefix)?;

        for (_, value) in entries {
            let payment: Payment = Self::deserialize(&value)?;
            if payment.status.is_completed() {
                return Ok(true);
            }
        }

        Ok(false)
    }

    // =========================================================================
    // Review Operations
    // =========================================================================

    fn put_review(&self, review: &Review) -> Result<()> {
        let cf_reviews = self.cf(cf::REVIEWS)?;
        let cf_by_event = self.cf(cf::REVIEWS_BY_EVENT)?;
        let cf_by_user = self.cf(cf::REVIEWS_BY_USER)?;

        let value = Self::serialize(review)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_reviews, keys::review_key(&review.id), &value);
        batch.put_cf(
            &cf_by_event,
            keys::event_review_key(&review.event_id, &review.id),
            [],
        );
        batch.put_cf(
            &cf_by_user,
            keys::user_review_key(&review.user_id, &review.id),
            [],
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn list_reviews_by_event(&self, event_id: &EventId) -> Result<Vec<Review>> {
        let prefix = keys::event_prefix(event_id);
        let mut entries = self.prefix_scan(cf::REVIEWS_BY_EVENT, &prefix)?;
        entries.reverse();

        let mut reviews = Vec::with_capacity(entries.len());
        for (key, _) in entries {
            let review_id = keys::extract_review_id(&key);
            if let Some(review) = self.get_review_record(&review_id)? {
                reviews.push(review);
            }
        }

        Ok(reviews)
    }

    fn list_reviews_by_user(&self, user_id: &UserId) -> Result<Vec<Review>> {
        let prefix = keys::user_prefix(user_id);
        let mut entries = self.prefix_scan(cf::REVIEWS_BY_USER, &prefix)?;
        entries.reverse();

        let mut reviews = Vec::with_capacity(entries.len());
        for (key, _) in entries {
            let review_id = keys::extract_review_id(&key);
            if let Some(review) = self.get_review_record(&review_id)? {
                reviews.push(review);
            }
        }

        Ok(reviews)
    }

    // =========================================================================
    // Search History Operations
    // =========================================================================

    fn put_search_record(&self, record: &SearchRecord) -> Result<()> {
        let cf = self.cf(cf::SEARCH_HISTORY)?;
        let key = keys::search_key(&record.user_id, &record.id);
        let value = Self::serialize(record)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn list_search_by_user(&self, user_id: &UserId, limit: usize) -> Result<Vec<SearchRecord>> {
        let prefix = keys::user_prefix(user_id);
        let mut entries = self.prefix_scan(cf::SEARCH_HISTORY, &prefix)?;
        entries.reverse();
        entries.truncate(limit);

        let mut records = Vec::with_capacity(entries.len());
        for (_, value) in entries {
            records.push(Self::deserialize::<SearchRecord>(&value)?);
        }

        Ok(records)
    }

    // =========================================================================
    // Bookmark Operations
    // =========================================================================

    fn create_bookmark(&self, bookmark: &Bookmark) -> Result<()> {
        let cf = self.cf(cf::BOOKMARKS)?;
        let key = keys::bookmark_key(&bookmark.user_id, &bookmark.event_id);

        let exists = self
            .db
            .get_cf(&cf, &key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();

        if exists {
            return Err(StoreError::AlreadyBookmarked {
                user_id: bookmark.user_id,
                event_id: bookmark.event_id,
            });
        }

        let value = Self::serialize(bookmark)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn list_bookmarks_by_user(&self, user_id: &UserId) -> Result<Vec<Bookmark>> {
        let prefix = keys::user_prefix(user_id);
        let entries = self.prefix_scan(cf::BOOKMARKS, &prefix)?;

        let mut bookmarks = Vec::with_capacity(entries.len());
        for (_, value) in entries {
            bookmarks.push(Self::deserialize::<Bookmark>(&value)?);
        }

        // Keys order by event ID; sort by creation time for newest first
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
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn sample_event(capacity: Option<u32>) -> Event {
        let starts_at = Utc::now() + chrono::Duration::days(7);
        Event {
            id: EventId::generate(),
            organizer_id: UserId::generate(),
            title: "Jazz Night".into(),
            description: "An evening of live jazz".into(),
            location: "Beirut Waterfront".into(),
            price_cents: 2500,
            currency: "USD".into(),
            capacity,
            categories: ["Music".to_string()].into_iter().collect(),
            images: vec![],
            starts_at,
            ends_at: starts_at + chrono::Duration::hours(3),
            created_at: Utc::now(),
        }
    }

    fn pay(store: &RocksStore, user_id: UserId, event_id: EventId) {
        let payment = Payment::new(user_id, event_id, 2500, "card".into(), PaymentStatus::Completed);
        store.put_payment(&payment).unwrap();
    }

    #[test]
    fn event_crud() {
        let (store, _dir) = create_test_store();
        let event = sample_event(Some(100));

        store.put_event(&event).unwrap();

        let retrieved = store.get_event(&event.id).unwrap().unwrap();
        assert_eq!(retrieved.title, "Jazz Night");
        assert_eq!(retrieved.capacity, Some(100));

        store.delete_event(&event.id).unwrap();
        assert!(store.get_event(&event.id).unwrap().is_none());

        let result = store.delete_event(&event.id);
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn booking_requires_existing_event() {
        let (store, _dir) = create_test_store();
        let booking = Booking::new(UserId::generate(), EventId::generate(), 1);

        let result = store.create_booking(&booking);
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn booking_requires_completed_payment() {
        let (store, _dir) = create_test_store();
        let event = sample_event(Some(10));
        store.put_event(&event).unwrap();

        let user_id = UserId::generate();

        // No payment at all
        let result = store.create_booking(&Booking::new(user_id, event.id, 1));
        assert!(matches!(result, Err(StoreError::PaymentRequired { .. })));

        // Pending and failed payments do not count
        store
            .put_payment(&Payment::new(
                user_id,
                event.id,
                2500,
                "card".into(),
                PaymentStatus::Pending,
            ))
            .unwrap();
        store
            .put_payment(&Payment::new(
                user_id,
                event.id,
                2500,
                "card".into(),
                PaymentStatus::Failed,
            ))
            .unwrap();

        let result = store.create_booking(&Booking::new(user_id, event.id, 1));
        assert!(matches!(result, Err(StoreError::PaymentRequired { .. })));

        // Completed payment enables booking
        pay(&store, user_id, event.id);
        store.create_booking(&Booking::new(user_id, event.id, 1)).unwrap();
    }

    #[test]
    fn duplicate_booking_conflicts() {
        let (store, _dir) = create_test_store();
        let event = sample_event(Some(10));
        store.put_event(&event).unwrap();

        let user_id = UserId::generate();
        pay(&store, user_id, event.id);

        store.create_booking(&Booking::new(user_id, event.id, 1)).unwrap();

        let result = store.create_booking(&Booking::new(user_id, event.id, 1));
        assert!(matches!(result, Err(StoreError::AlreadyBooked { .. })));
    }

    #[test]
    fn capacity_exceeded_reports_exact_remainder() {
        let (store, _dir) = create_test_store();
        let event = sample_event(Some(2));
        store.put_event(&event).unwrap();

        let alice = UserId::generate();
        pay(&store, alice, event.id);
        store.create_booking(&Booking::new(alice, event.id, 2)).unwrap();

        assert_eq!(store.remaining_capacity(&event.id).unwrap(), Some(0));

        let bob = UserId::generate();
        pay(&store, bob, event.id);
        let result = store.create_booking(&Booking::new(bob, event.id, 1));
        assert!(matches!(
            result,
            Err(StoreError::CapacityExceeded {
                available: 0,
                requested: 1
            })
        ));
    }

    #[test]
    fn booking_exactly_remaining_succeeds() {
        let (store, _dir) = create_test_store();
        let event = sample_event(Some(3));
        store.put_event(&event).unwrap();

        let user_id = UserId::generate();
        pay(&store, user_id, event.id);
        store.create_booking(&Booking::new(user_id, event.id, 3)).unwrap();

        assert_eq!(store.remaining_capacity(&event.id).unwrap(), Some(0));
    }

    #[test]
    fn duplicate_check_precedes_capacity_check() {
        let (store, _dir) = create_test_store();
        let event = sample_event(Some(1));
        store.put_event(&event).unwrap();

        let user_id = UserId::generate();
        pay(&store, user_id, event.id);
        store.create_booking(&Booking::new(user_id, event.id, 1)).unwrap();

        // Event is now full; a repeat booking still reports the duplicate
        let result = store.create_booking(&Booking::new(user_id, event.id, 1));
        assert!(matches!(result, Err(StoreError::AlreadyBooked { .. })));
    }

    #[test]
    fn unlimited_capacity_never_exceeds() {
        let (store, _dir) = create_test_store();
        let event = sample_event(None);
        store.put_event(&event).unwrap();

        let user_id = UserId::generate();
        pay(&store, user_id, event.id);
        store.create_booking(&Booking::new(user_id, event.id, 10_000)).unwrap();

        assert_eq!(store.remaining_capacity(&event.id).unwrap(), None);
    }

    #[test]
    fn cancel_releases_capacity() {
        let (store, _dir) = create_test_store();
        let event = sample_event(Some(5));
        store.put_event(&event).unwrap();

        let user_id = UserId::generate();
        pay(&store, user_id, event.id);
        store.create_booking(&Booking::new(user_id, event.id, 3)).unwrap();
        assert_eq!(store.remaining_capacity(&event.id).unwrap(), Some(2));

        let cancelled = store.cancel_booking(&user_id, &event.id).unwrap();
        assert_eq!(cancelled.quantity, 3);
        assert_eq!(store.remaining_capacity(&event.id).unwrap(), Some(5));

        // Cancelling again reports not found, never silent success
        let result = store.cancel_booking(&user_id, &event.id);
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn delete_event_cascades_bookings() {
        let (store, _dir) = create_test_store();
        let event = sample_event(Some(10));
        store.put_event(&event).unwrap();

        let user_id = UserId::generate();
        pay(&store, user_id, event.id);
        store.create_booking(&Booking::new(user_id, event.id, 2)).unwrap();

        store.delete_event(&event.id).unwrap();

        assert!(store.get_booking(&user_id, &event.id).unwrap().is_none());
        assert!(store.list_bookings_by_user(&user_id).unwrap().is_empty());
        assert_eq!(store.booked_quantity(&event.id).unwrap(), 0);
    }

    #[test]
    fn user_bookings_newest_first() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        let first = sample_event(None);
        let second = sample_event(None);
        store.put_event(&first).unwrap();
        store.put_event(&second).unwrap();
        pay(&store, user_id, first.id);
        pay(&store, user_id, second.id);

        store.create_booking(&Booking::new(user_id, first.id, 1)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2)); // Distinct ULID timestamps
        store.create_booking(&Booking::new(user_id, second.id, 1)).unwrap();

        let bookings = store.list_bookings_by_user(&user_id).unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].event_id, second.id);
        assert_eq!(bookings[1].event_id, first.id);
    }

    #[test]
    fn search_history_newest_first_with_limit() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        for query in ["Tripoli", "Beirut", "Byblos"] {
            store
                .put_search_record(&SearchRecord::new(user_id, query.into()))
                .unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let records = store.list_search_by_user(&user_id, 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].query, "Byblos");
        assert_eq!(records[1].query, "Beirut");
    }

    #[test]
    fn reviews_indexed_by_event_and_user() {
        let (store, _dir) = create_test_store();
        let event = sample_event(None);
        store.put_event(&event).unwrap();

        let user_id = UserId::generate();
        store
            .put_review(&Review::new(user_id, event.id, 5, "great".into()))
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        store
            .put_review(&Review::new(UserId::generate(), event.id, 3, "ok".into()))
            .unwrap();

        let by_event = store.list_reviews_by_event(&event.id).unwrap();
        assert_eq!(by_event.len(), 2);
        assert_eq!(by_event[0].rating, 3); // Newest first

        let by_user = store.list_reviews_by_user(&user_id).unwrap();
        assert_eq!(by_user.len(), 1);
        assert_eq!(by_user[0].rating, 5);
    }

    #[test]
    fn bookmark_unique_per_pair() {
        let (store, _dir) = create_test_store();
        let event = sample_event(None);
        store.put_event(&event).unwrap();

        let user_id = UserId::generate();
        store.create_bookmark(&Bookmark::new(user_id, event.id)).unwrap();

        let result = store.create_bookmark(&Bookmark::new(user_id, event.id));
        assert!(matches!(result, Err(StoreError::AlreadyBookmarked { .. })));

        let bookmarks = store.list_bookmarks_by_user(&user_id).unwrap();
        assert_eq!(bookmarks.len(), 1);
    }

    #[test]
    fn concurrent_bookings_never_oversell() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());

        let capacity = 10;
        let event = sample_event(Some(capacity));
        store.put_event(&event).unwrap();

        // 16 users race for 10 slots, one ticket each
        let users: Vec<UserId> = (0..16).map(|_| UserId::generate()).collect();
        for user_id in &users {
            pay(&store, *user_id, event.id);
        }

        let handles: Vec<_> = users
            .iter()
            .map(|user_id| {
                let store = Arc::clone(&store);
                let user_id = *user_id;
                let event_id = event.id;
                std::thread::spawn(move || {
                    store.create_booking(&Booking::new(user_id, event_id, 1)).is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, capacity as usize);
        assert_eq!(store.booked_quantity(&event.id).unwrap(), capacity);
        assert_eq!(store.remaining_capacity(&event.id).unwrap(), Some(0));
    }
}
