//! Domain types for the flight schedule engine.
//!
//! This module contains the core domain model types that represent
//! validated schedule data. All types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod airline;
mod airport;
mod day;
mod error;
mod leg;
mod region;
mod time;

pub use airline::{AirlineCode, InvalidAirlineCode};
pub use airport::{AirportCode, InvalidAirportCode};
pub use day::{DayOfWeek, DaySelection, InvalidDayOfWeek};
pub use error::DomainError;
pub use leg::{Endpoint, FlightLeg, LegParts};
pub use region::{InvalidRegionCode, RegionCode};
pub use time::{
    TimeError, TimeWindow, parse_date, parse_hhmm, parse_padded_hhmm, parse_query_instant,
};

#[cfg(test)]
pub(crate) use leg::test_support;
