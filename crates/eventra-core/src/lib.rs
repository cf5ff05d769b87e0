//! Core types and utilities for eventra.
//!
//! This crate provides the foundational types used throughout the eventra
//! marketplace:
//!
//! - **Identifiers**: `UserId`, `EventId`, `BookingId`, `PaymentId`,
//!   `ReviewId`, `SearchId`
//! - **Catalog**: `Event`, `EventFilter`
//! - **Bookings**: `Booking`
//! - **Payments**: `Payment`, `PaymentStatus`
//! - **Reviews**: `Review`, rating aggregation
//! - **Search history**: `SearchRecord`
//! - **Bookmarks**: `Bookmark`
//! - **Signals**: `UserSignals`, signal aggregation helpers
//!
//! # Money
//!
//! Prices and payment amounts are stored as `i64` integer cents to avoid
//! floating point precision issues.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod booking;
pub mod bookmark;
pub mod event;
pub mod ids;
pub mod payment;
pub mod review;
pub mod search;
pub mod signals;

pub use booking::Booking;
pub use bookmark::Bookmark;
pub use event::{Event, EventFilter};
pub use ids::{BookingId, EventId, IdError, PaymentId, ReviewId, SearchId, UserId};
pub use payment::{Payment, PaymentStatus};
pub use review::{average_rating, Review, MAX_RATING, MIN_RATING};
pub use search::SearchRecord;
pub use signals::{
    recent_distinct, top_categories, UserSignals, RECENT_SEARCH_COUNT, TOP_CATEGORY_COUNT,
};
