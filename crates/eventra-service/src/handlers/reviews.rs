//! Review handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventra_core::{average_rating, EventId, Review, ReviewId, UserId, MAX_RATING, MIN_RATING};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::events::parse_event_id;
use crate::state::AppState;

/// Review creation request.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    /// The reviewed event.
    pub event_id: String,
    /// Star rating in 1..=5.
    pub rating: u8,
    /// Free-form comment.
    #[serde(default)]
    pub comment: String,
}

/// A review as returned by the API.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    /// The review ID.
    pub id: ReviewId,
    /// The reviewing user.
    pub user_id: UserId,
    /// The reviewed event.
    pub event_id: EventId,
    /// Star rating.
    pub rating: u8,
    /// Comment text.
    pub comment: String,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            event_id: review.event_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

/// Submit a review for an event.
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let event_id = parse_event_id(&body.event_id)?;

    if !(MIN_RATING..=MAX_RATING).contains(&body.rating) {
        return Err(ApiError::BadRequest(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }

    if state.store.get_event(&event_id)?.is_none() {
        return Err(ApiError::NotFound(format!("event not found: {event_id}")));
    }

    let review = Review::new(auth.user_id, event_id, body.rating, body.comment);
    state.store.put_review(&review)?;

    tracing::info!(
        review_id = %review.id,
        user_id = %auth.user_id,
        event_id = %event_id,
        rating = review.rating,
        "Review submitted"
    );

    Ok((StatusCode::CREATED, Json(review.into())))
}

/// Review list response for one event.
#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    /// The event's reviews, newest first.
    pub reviews: Vec<ReviewResponse>,
    /// Mean rating, absent without reviews.
    pub average_rating: Option<f64>,
}

/// List an event's reviews, newest first, with the average rating.
pub async fn list_event_reviews(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<ReviewListResponse>, ApiError> {
    let event_id = parse_event_id(&event_id)?;

    if state.store.get_event(&event_id)?.is_none() {
        return Err(ApiError::NotFound(format!("event not found: {event_id}")));
    }

    let reviews = state.store.list_reviews_by_event(&event_id)?;
    let average = average_rating(&reviews);

    Ok(Json(ReviewListResponse {
        reviews: reviews.into_iter().map(ReviewResponse::from).collect(),
        average_rating: average,
    }))
}
