//! Request handlers.

pub mod bookings;
pub mod events;
pub mod health;
pub mod payments;
pub mod recommendations;
pub mod reviews;
pub mod search;
