//! Common test utilities for eventra integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::json;
use tempfile::TempDir;

use eventra_core::UserId;
use eventra_service::{create_router, issue_token, AppState, ServiceConfig, UserRole};
use eventra_store::RocksStore;

/// Shared signing secret for test tokens.
const TEST_AUTH_SECRET: &str = "test-secret";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test attendee ID for authenticated requests.
    pub test_user_id: UserId,
    /// A test organizer ID for event-publishing requests.
    pub test_organizer_id: UserId,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            auth_secret: TEST_AUTH_SECRET.into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
            test_user_id: UserId::generate(),
            test_organizer_id: UserId::generate(),
        }
    }

    /// Get an authorization header for an arbitrary user and role.
    pub fn auth_header_for(&self, user_id: UserId, role: UserRole) -> String {
        let token = issue_token(TEST_AUTH_SECRET, user_id, role).expect("Failed to sign token");
        format!("Bearer {token}")
    }

    /// Get the authorization header for the test attendee.
    pub fn user_auth_header(&self) -> String {
        self.auth_header_for(self.test_user_id, UserRole::Individual)
    }

    /// Get the authorization header for the test organizer.
    pub fn organizer_auth_header(&self) -> String {
        self.auth_header_for(self.test_organizer_id, UserRole::Company)
    }

    /// Get an admin authorization header.
    pub fn admin_auth_header(&self) -> String {
        self.auth_header_for(UserId::generate(), UserRole::Admin)
    }

    /// Get a different attendee's auth header (for testing isolation).
    pub fn other_user_auth_header(&self) -> String {
        self.auth_header_for(UserId::generate(), UserRole::Individual)
    }

    /// Publish an event as the test organizer, returning its ID.
    pub async fn publish_event(
        &self,
        title: &str,
        location: &str,
        categories: &[&str],
        capacity: Option<u32>,
    ) -> String {
        self.publish_event_starting(title, location, categories, capacity, 7)
            .await
    }

    /// Publish an event starting the given number of days from now
    /// (negative for an event in the past).
    pub async fn publish_event_starting(
        &self,
        title: &str,
        location: &str,
        categories: &[&str],
        capacity: Option<u32>,
        starts_in_days: i64,
    ) -> String {
        let starts_at = Utc::now() + Duration::days(starts_in_days);
        let ends_at = starts_at + Duration::hours(3);

        let response = self
            .server
            .post("/v1/events")
            .add_header("authorization", self.organizer_auth_header())
            .json(&json!({
                "title": title,
                "location": location,
                "price_cents": 2500,
                "capacity": capacity,
                "categories": categories,
                "starts_at": starts_at.to_rfc3339(),
                "ends_at": ends_at.to_rfc3339(),
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        body["id"].as_str().expect("event id").to_string()
    }

    /// Record a completed payment for an event on behalf of a user.
    pub async fn pay(&self, auth_header: &str, event_id: &str) {
        self.server
            .post("/v1/payments")
            .add_header("authorization", auth_header.to_string())
            .json(&json!({
                "event_id": event_id,
                "amount_cents": 2500,
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    /// Pay for and book tickets for an event on behalf of a user.
    pub async fn pay_and_book(&self, auth_header: &str, event_id: &str, quantity: u32) {
        self.pay(auth_header, event_id).await;

        self.server
            .post("/v1/bookings")
            .add_header("authorization", auth_header.to_string())
            .json(&json!({
                "event_id": event_id,
                "quantity": quantity,
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
