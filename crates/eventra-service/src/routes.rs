//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{bookings, events, health, payments, recommendations, reviews, search};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `GET /v1/events` - List upcoming events (optional category/location filters)
/// - `GET /v1/events/:id` - Get a single event, hydrated
/// - `GET /v1/events/:id/availability` - Remaining ticket availability
/// - `GET /v1/events/:id/reviews` - Event reviews with average rating
/// - `GET /v1/search/events?q=` - Catalog text search
///
/// ## Authenticated (bearer token)
/// - `POST /v1/events` - Publish an event
/// - `DELETE /v1/events/:id` - Delete an event (organizer or admin)
/// - `GET /v1/events/:id/attendees` - Attendee list (organizer or admin)
/// - `POST /v1/bookings` - Book tickets
/// - `GET /v1/bookings` - List own bookings
/// - `GET /v1/bookings/:event_id` - Booking status for an event
/// - `DELETE /v1/bookings/:event_id` - Cancel a booking
/// - `POST /v1/payments` - Record a payment
/// - `GET /v1/payments` - List own payments
/// - `POST /v1/reviews` - Submit a review
/// - `POST /v1/search/history` - Log a search query
/// - `GET /v1/recommendations/behavioral` - Behavioral recommendations
/// - `POST /v1/recommendations` - Bookmark an event
/// - `GET /v1/recommendations` - List bookmarked events
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Events
        .route("/v1/events", post(events::create_event))
        .route("/v1/events", get(events::list_events))
        .route("/v1/events/:id", get(events::get_event))
        .route("/v1/events/:id", delete(events::delete_event))
        .route("/v1/events/:id/availability", get(bookings::availability))
        .route("/v1/events/:id/reviews", get(reviews::list_event_reviews))
        .route("/v1/events/:id/attendees", get(bookings::attendees))
        // Bookings
        .route("/v1/bookings", post(bookings::create_booking))
        .route("/v1/bookings", get(bookings::list_bookings))
        .route("/v1/bookings/:event_id", get(bookings::booking_status))
        .route("/v1/bookings/:event_id", delete(bookings::cancel_booking))
        // Payments
        .route("/v1/payments", post(payments::create_payment))
        .route("/v1/payments", get(payments::list_payments))
        // Reviews
        .route("/v1/reviews", post(reviews::create_review))
        // Search
        .route("/v1/search/events", get(search::search_events))
        .route("/v1/search/history", post(search::log_search))
        // Recommendations
        .route(
            "/v1/recommendations/behavioral",
            get(recommendations::behavioral),
        )
        .route("/v1/recommendations", post(recommendations::create_bookmark))
        .route("/v1/recommendations", get(recommendations::list_bookmarks))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
