//! Booking workflow handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventra_core::{Booking, BookingId, EventId, UserId};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::events::{parse_event_id, EventResponse};
use crate::state::AppState;

/// Booking creation request.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    /// The event to book.
    pub event_id: String,
    /// Tickets requested (defaults to 1).
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Booking creation response.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    /// The generated booking ID.
    pub booking_id: BookingId,
    /// The booked event.
    pub event_id: EventId,
    /// Tickets held.
    pub quantity: u32,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}

/// Book tickets for an event.
///
/// Fails with 404 for an unknown event, 409 for a repeated booking, 422
/// when the quantity exceeds the remaining capacity (the error payload
/// carries the exact remainder), and 402 without a completed payment.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let event_id = parse_event_id(&body.event_id)?;

    if body.quantity == 0 {
        return Err(ApiError::BadRequest(
            "Ticket quantity must be at least 1".into(),
        ));
    }

    let booking = Booking::new(auth.user_id, event_id, body.quantity);
    state.store.create_booking(&booking)?;

    tracing::info!(
        booking_id = %booking.id,
        user_id = %auth.user_id,
        event_id = %event_id,
        quantity = booking.quantity,
        "Booking created"
    );

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            booking_id: booking.id,
            event_id: booking.event_id,
            quantity: booking.quantity,
            created_at: booking.created_at,
        }),
    ))
}

/// Cancel the caller's booking for an event.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let event_id = parse_event_id(&event_id)?;

    let cancelled = state.store.cancel_booking(&auth.user_id, &event_id)?;

    tracing::info!(
        booking_id = %cancelled.id,
        user_id = %auth.user_id,
        event_id = %event_id,
        released = cancelled.quantity,
        "Booking cancelled"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// A booking joined with its hydrated event.
#[derive(Debug, Serialize)]
pub struct BookingView {
    /// The booking ID.
    pub booking_id: BookingId,
    /// Tickets held.
    pub quantity: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// The booked event, hydrated.
    pub event: EventResponse,
}

/// Booking list response.
#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    /// The caller's bookings, newest first.
    pub bookings: Vec<BookingView>,
}

/// List the caller's bookings, newest first, joined with their events.
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<BookingListResponse>, ApiError> {
    let store = state.store.as_ref();
    let mut views = Vec::new();

    for booking in store.list_bookings_by_user(&auth.user_id)? {
        // Skip bookings whose event vanished mid-listing
        let Some(event) = store.get_event(&booking.event_id)? else {
            continue;
        };

        views.push(BookingView {
            booking_id: booking.id,
            quantity: booking.quantity,
            created_at: booking.created_at,
            event: EventResponse::hydrate(store, event)?,
        });
    }

    Ok(Json(BookingListResponse { bookings: views }))
}

/// Booking status for a single event.
#[derive(Debug, Serialize)]
pub struct BookingStatusResponse {
    /// Whether the caller holds a booking for the event.
    pub booked: bool,
    /// Tickets held, if booked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// Check whether the caller has booked an event.
pub async fn booking_status(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<Json<BookingStatusResponse>, ApiError> {
    let event_id = parse_event_id(&event_id)?;

    let booking = state.store.get_booking(&auth.user_id, &event_id)?;

    Ok(Json(BookingStatusResponse {
        booked: booking.is_some(),
        quantity: booking.map(|b| b.quantity),
    }))
}

/// Ticket availability for an event.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    /// The event.
    pub event_id: EventId,
    /// Tickets still available; `null` for unlimited events.
    pub available: Option<u32>,
    /// Whether the event has no capacity limit.
    pub unlimited: bool,
}

/// Report remaining ticket availability for an event.
///
/// Uses the same counting formula as the booking-time capacity check.
pub async fn availability(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let event_id = parse_event_id(&event_id)?;

    let available = state.store.remaining_capacity(&event_id)?;

    Ok(Json(AvailabilityResponse {
        event_id,
        available,
        unlimited: available.is_none(),
    }))
}

/// One attendee row in the attendees listing.
#[derive(Debug, Serialize)]
pub struct AttendeeEntry {
    /// The attending user.
    pub user_id: UserId,
    /// Tickets held.
    pub quantity: u32,
    /// When the booking was made.
    pub booked_at: DateTime<Utc>,
}

/// Attendees listing response.
#[derive(Debug, Serialize)]
pub struct AttendeesResponse {
    /// Per-user bookings, oldest first.
    pub attendees: Vec<AttendeeEntry>,
    /// Total tickets issued.
    pub total_tickets: u32,
}

/// List an event's attendees.
///
/// Only the organizer or an admin may see the attendee list.
pub async fn attendees(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<Json<AttendeesResponse>, ApiError> {
    let event_id = parse_event_id(&event_id)?;

    let event = state
        .store
        .get_event(&event_id)?
        .ok_or_else(|| ApiError::NotFound(format!("event not found: {event_id}")))?;

    if event.organizer_id != auth.user_id && !auth.role.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let bookings = state.store.list_bookings_by_event(&event_id)?;
    let total_tickets = bookings.iter().map(|b| b.quantity).sum();

    let attendees = bookings
        .into_iter()
        .map(|b| AttendeeEntry {
            user_id: b.user_id,
            quantity: b.quantity,
            booked_at: b.created_at,
        })
        .collect();

    Ok(Json(AttendeesResponse {
        attendees,
        total_tickets,
    }))
}
