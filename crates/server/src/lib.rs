//! HTTP service answering "is this day off for this user?".
//!
//! This crate provides:
//! - Token authorization with a privileged root identity
//! - User registration
//! - Day resolution with per-user overrides over a default calendar
//! - Plain-text and JSON responses chosen by content negotiation

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod negotiate;
pub mod registration;
pub mod resolution;
pub mod routes;
pub mod state;

pub use auth::{Credentials, TraceId};
pub use error::ApiError;
pub use negotiate::{Representation, negotiate, render};
pub use routes::create_router;
pub use state::AppState;
