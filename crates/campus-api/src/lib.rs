//! # campus-api
//!
//! HTTP API layer for the campus presence service built on Axum.
//!
//! Provides the read endpoints, the WebSocket upgrade that hands each socket
//! to a [`campus_realtime::ConnectionDriver`], CORS and request logging
//! middleware, and the mapping from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
