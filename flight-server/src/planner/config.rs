//! Search configuration for the itinerary planner.

use chrono::Duration;

/// Configuration parameters for itinerary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of intermediate stops a request may ask for.
    /// Requests above this are rejected.
    pub max_stops: usize,

    /// Minimum time between arriving on one leg and departing on the next
    /// (minutes). Zero allows same-minute connections.
    pub min_connection_mins: i64,

    /// Enumeration stops once this many itineraries have been found.
    pub max_itineraries: usize,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_stops: usize, min_connection_mins: i64, max_itineraries: usize) -> Self {
        Self {
            max_stops,
            min_connection_mins,
            max_itineraries,
        }
    }

    /// Returns the minimum connection time as a Duration.
    pub fn min_connection(&self) -> Duration {
        Duration::minutes(self.min_connection_mins)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_stops: 3,
            min_connection_mins: 0,
            max_itineraries: 10_000,
        }
    }
}
