//! Catalog text search and search-history handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventra_core::{EventFilter, SearchId, SearchRecord};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::events::{hydrate_events, EventListResponse};
use crate::state::AppState;

/// Query parameters for catalog text search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search text, matched case-insensitively against title, description,
    /// and location.
    pub q: String,
}

/// Search the catalog by free text.
///
/// Unlike the upcoming listing, text search covers past events too.
pub async fn search_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<EventListResponse>, ApiError> {
    let text = query.q.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Search text must not be empty".into()));
    }

    let filter = EventFilter {
        text: Some(text.to_string()),
        ..EventFilter::default()
    };

    let events = state.store.list_events(&filter)?;
    let events = hydrate_events(state.store.as_ref(), events)?;

    Ok(Json(EventListResponse { events }))
}

/// Search-history log request.
#[derive(Debug, Deserialize)]
pub struct LogSearchRequest {
    /// The raw query string as typed.
    pub query: String,
}

/// Search-history log response.
#[derive(Debug, Serialize)]
pub struct LogSearchResponse {
    /// The generated entry ID.
    pub id: SearchId,
    /// The logged query.
    pub query: String,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

/// Append a search query to the caller's history.
///
/// The history is append-only and feeds the location signal of the
/// recommendation pipeline.
pub async fn log_search(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<LogSearchRequest>,
) -> Result<(StatusCode, Json<LogSearchResponse>), ApiError> {
    if body.query.trim().is_empty() {
        return Err(ApiError::BadRequest("Query must not be empty".into()));
    }

    let record = SearchRecord::new(auth.user_id, body.query);
    state.store.put_search_record(&record)?;

    tracing::debug!(
        user_id = %auth.user_id,
        query = %record.query,
        "Search logged"
    );

    Ok((
        StatusCode::CREATED,
        Json(LogSearchResponse {
            id: record.id,
            query: record.query,
            created_at: record.created_at,
        }),
    ))
}
