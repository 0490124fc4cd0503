//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::SearchConfig;
use crate::schedule::ScheduleTable;

/// Shared application state.
///
/// Cloned into every handler. The schedule is read-only after startup, so
/// no lock is needed.
#[derive(Clone)]
pub struct AppState {
    /// The full schedule table
    pub table: Arc<ScheduleTable>,

    /// Itinerary search configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(table: ScheduleTable, config: SearchConfig) -> Self {
        Self {
            table: Arc::new(table),
            config: Arc::new(config),
        }
    }
}
