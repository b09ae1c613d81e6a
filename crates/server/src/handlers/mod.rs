//! HTTP request handlers.

pub mod days;
pub mod service;
pub mod users;

pub use days::*;
pub use service::*;
pub use users::*;
