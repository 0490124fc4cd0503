//! Web layer for the flight schedule query engine.
//!
//! Provides HTTP endpoints for querying the loaded schedule.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
