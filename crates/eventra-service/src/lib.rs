//! HTTP API service for the eventra marketplace.
//!
//! This crate wires the storage layer to an Axum router: bearer-token
//! authentication, per-operation request/response types, typed error
//! mapping, and the behavioral recommendation pipeline.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod recommend;
pub mod routes;
pub mod state;

pub use auth::{issue_token, AuthUser, UserRole};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
