//! Event catalog handlers.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventra_core::{average_rating, Event, EventFilter, EventId, UserId};
use eventra_store::{Store, StoreError};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// An event as returned by the API, hydrated with review aggregates.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// The event ID.
    pub id: EventId,
    /// The publishing user.
    pub organizer_id: UserId,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Venue or city.
    pub location: String,
    /// Ticket price in cents.
    pub price_cents: i64,
    /// Currency code.
    pub currency: String,
    /// Maximum tickets, `null` for unlimited.
    pub capacity: Option<u32>,
    /// Category labels.
    pub categories: Vec<String>,
    /// Image URLs.
    pub images: Vec<String>,
    /// Start time.
    pub starts_at: DateTime<Utc>,
    /// End time.
    pub ends_at: DateTime<Utc>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Mean review rating, absent without reviews.
    pub average_rating: Option<f64>,
    /// Number of reviews.
    pub review_count: usize,
}

impl EventResponse {
    /// Hydrate an event with its review aggregates.
    pub(crate) fn hydrate(store: &dyn Store, event: Event) -> Result<Self, StoreError> {
        let reviews = store.list_reviews_by_event(&event.id)?;

        Ok(Self {
            id: event.id,
            organizer_id: event.organizer_id,
            title: event.title,
            description: event.description,
            location: event.location,
            price_cents: event.price_cents,
            currency: event.currency,
            capacity: event.capacity,
            categories: event.categories.into_iter().collect(),
            images: event.images,
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            created_at: event.created_at,
            average_rating: average_rating(&reviews),
            review_count: reviews.len(),
        })
    }
}

/// Hydrate a batch of events, preserving order.
pub(crate) fn hydrate_events(
    store: &dyn Store,
    events: Vec<Event>,
) -> Result<Vec<EventResponse>, StoreError> {
    events
        .into_iter()
        .map(|event| EventResponse::hydrate(store, event))
        .collect()
}

/// Parse an event ID path segment.
pub(crate) fn parse_event_id(raw: &str) -> Result<EventId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid event ID".into()))
}

/// Event creation request.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    /// Event title (required, non-empty).
    pub title: String,
    /// Event description.
    #[serde(default)]
    pub description: String,
    /// Venue or city.
    pub location: String,
    /// Ticket price in cents (non-negative).
    #[serde(default)]
    pub price_cents: i64,
    /// Currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Maximum tickets, omit for unlimited.
    pub capacity: Option<u32>,
    /// Category labels.
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Start time.
    pub starts_at: DateTime<Utc>,
    /// End time (must be after `starts_at`).
    pub ends_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "USD".into()
}

/// Publish a new event.
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title must not be empty".into()));
    }
    if body.starts_at >= body.ends_at {
        return Err(ApiError::BadRequest(
            "Event must start before it ends".into(),
        ));
    }
    if body.price_cents < 0 {
        return Err(ApiError::BadRequest("Price must not be negative".into()));
    }

    let event = Event {
        id: EventId::generate(),
        organizer_id: auth.user_id,
        title: body.title,
        description: body.description,
        location: body.location,
        price_cents: body.price_cents,
        currency: body.currency,
        capacity: body.capacity,
        categories: body.categories,
        images: body.images,
        starts_at: body.starts_at,
        ends_at: body.ends_at,
        created_at: Utc::now(),
    };

    state.store.put_event(&event)?;

    tracing::info!(
        event_id = %event.id,
        organizer_id = %auth.user_id,
        capacity = ?event.capacity,
        "Event created"
    );

    let response = EventResponse::hydrate(state.store.as_ref(), event)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Query parameters for listing upcoming events.
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    /// Only events carrying this category label.
    pub category: Option<String>,
    /// Only events whose location contains this term (case-insensitive).
    pub location: Option<String>,
}

/// Event list response.
#[derive(Debug, Serialize)]
pub struct EventListResponse {
    /// Matching events, hydrated.
    pub events: Vec<EventResponse>,
}

/// List upcoming events, optionally filtered by category or location.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<EventListResponse>, ApiError> {
    let mut filter = EventFilter::upcoming(Utc::now());
    if let Some(category) = query.category {
        filter.categories.insert(category);
    }
    if let Some(location) = query.location {
        filter.location_terms.push(location);
    }

    let events = state.store.list_events(&filter)?;
    let events = hydrate_events(state.store.as_ref(), events)?;

    Ok(Json(EventListResponse { events }))
}

/// Get a single event, hydrated.
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<EventResponse>, ApiError> {
    let event_id = parse_event_id(&event_id)?;

    let event = state
        .store
        .get_event(&event_id)?
        .ok_or_else(|| ApiError::NotFound(format!("event not found: {event_id}")))?;

    let response = EventResponse::hydrate(state.store.as_ref(), event)?;
    Ok(Json(response))
}

/// Delete an event, cascading its bookings.
///
/// Only the organizer or an admin may delete an event.
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let event_id = parse_event_id(&event_id)?;

    let event = state
        .store
        .get_event(&event_id)?
        .ok_or_else(|| ApiError::NotFound(format!("event not found: {event_id}")))?;

    if event.organizer_id != auth.user_id && !auth.role.is_admin() {
        return Err(ApiError::Forbidden);
    }

    state.store.delete_event(&event_id)?;

    tracing::info!(
        event_id = %event_id,
        deleted_by = %auth.user_id,
        "Event deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
