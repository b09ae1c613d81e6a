//! Application state shared across handlers.

use dayoff_calendar::HolidayCalendar;
use dayoff_core::config::AppConfig;
use dayoff_metadata::MetadataStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata store (users and overrides).
    pub metadata: Arc<dyn MetadataStore>,
    /// Default holiday calendar consulted when no override applies.
    pub calendar: Arc<dyn HolidayCalendar>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        metadata: Arc<dyn MetadataStore>,
        calendar: Arc<dyn HolidayCalendar>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            metadata,
            calendar,
        }
    }
}
