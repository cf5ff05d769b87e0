//! Recommendation handlers: the behavioral ranker and explicit bookmarks.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventra_core::{Bookmark, EventId};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::events::{hydrate_events, parse_event_id, EventListResponse, EventResponse};
use crate::recommend::{behavioral_recommendations, RecommendError};
use crate::state::AppState;

/// Compute behavioral recommendations for the caller.
pub async fn behavioral(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<EventListResponse>, ApiError> {
    let events =
        behavioral_recommendations(state.store.as_ref(), auth.user_id).map_err(|e| match e {
            RecommendError::InsufficientData => ApiError::InsufficientData,
            RecommendError::Store(err) => err.into(),
        })?;

    let events = hydrate_events(state.store.as_ref(), events)?;

    tracing::debug!(
        user_id = %auth.user_id,
        count = events.len(),
        "Behavioral recommendations computed"
    );

    Ok(Json(EventListResponse { events }))
}

/// Bookmark creation request.
#[derive(Debug, Deserialize)]
pub struct CreateBookmarkRequest {
    /// The event to bookmark.
    pub event_id: String,
}

/// Bookmark creation response.
#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    /// The bookmarked event.
    pub event_id: EventId,
    /// When the bookmark was created.
    pub created_at: DateTime<Utc>,
}

/// Bookmark an event.
pub async fn create_bookmark(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<BookmarkResponse>), ApiError> {
    let event_id = parse_event_id(&body.event_id)?;

    if state.store.get_event(&event_id)?.is_none() {
        return Err(ApiError::NotFound(format!("event not found: {event_id}")));
    }

    let bookmark = Bookmark::new(auth.user_id, event_id);
    state.store.create_bookmark(&bookmark)?;

    tracing::info!(
        user_id = %auth.user_id,
        event_id = %event_id,
        "Event bookmarked"
    );

    Ok((
        StatusCode::CREATED,
        Json(BookmarkResponse {
            event_id,
            created_at: bookmark.created_at,
        }),
    ))
}

/// List the caller's bookmarked events, newest bookmark first.
pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<EventListResponse>, ApiError> {
    let store = state.store.as_ref();
    let mut events = Vec::new();

    for bookmark in store.list_bookmarks_by_user(&auth.user_id)? {
        // Skip bookmarks whose event was deleted
        if let Some(event) = store.get_event(&bookmark.event_id)? {
            events.push(EventResponse::hydrate(store, event)?);
        }
    }

    Ok(Json(EventListResponse { events }))
}
