//! Itinerary planner and query engine.
//!
//! Itinerary search walks the flight graph depth-first, enumerating every
//! simple path with exactly the requested number of intermediate stops.
//! Result assembly flattens what it finds and applies the fixed exclusion
//! policy, and the [`Engine`] ties the filter pipeline and search together.

mod assemble;
mod config;
mod engine;
mod search;

pub use assemble::{EXCLUDED_CONTINENT, EXCLUDED_HUBS, RouteKey, assemble, is_excluded, routes};
pub use config::SearchConfig;
pub use engine::{Engine, QueryOutcome};
pub use search::{Itinerary, ItinerarySearch, SearchError, SearchRequest, SearchResult};
