//! Query execution.
//!
//! [`Engine::run`] takes a validated [`QuerySpec`] through the filter
//! pipeline in a fixed order:
//!
//! 1. location, time window, day of week, airline, cargo/passenger;
//! 2. if stops were requested, itinerary search over the full table, whose
//!    assembled legs replace the working table;
//! 3. added/removed-flight diffing, if requested.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::FlightLeg;
use crate::filter::WorkingTable;
use crate::query::QuerySpec;
use crate::schedule::ScheduleTable;

use super::assemble::{RouteKey, assemble, routes};
use super::config::SearchConfig;
use super::search::{Itinerary, ItinerarySearch, SearchError, SearchRequest};

/// What a query produced.
#[derive(Debug, Clone, Default)]
pub struct QueryOutcome<'a> {
    /// Final working table.
    pub legs: Vec<&'a FlightLeg>,

    /// Itineraries found, when stops were requested.
    pub itineraries: Vec<Itinerary<'a>>,

    /// Whether itinerary enumeration hit its limit.
    pub truncated: bool,
}

impl QueryOutcome<'_> {
    /// Distinct (origin, destination, airline, cargo) tuples of the result.
    pub fn routes(&self) -> BTreeSet<RouteKey> {
        routes(self.legs.iter().copied())
    }
}

/// Runs queries against a shared schedule table.
pub struct Engine<'a> {
    table: &'a ScheduleTable,
    config: &'a SearchConfig,
}

impl<'a> Engine<'a> {
    pub fn new(table: &'a ScheduleTable, config: &'a SearchConfig) -> Self {
        Self { table, config }
    }

    /// Run one query start to finish. Fails before doing any work if the
    /// stop count is out of range.
    pub fn run(&self, spec: &QuerySpec) -> Result<QueryOutcome<'a>, SearchError> {
        let request = SearchRequest::new(&spec.origin, &spec.destination, spec.window, spec.stops);
        request.validate(self.config)?;

        let mut working = WorkingTable::new(self.table);
        working.filter_by_location(&spec.origin, &spec.destination);
        working.filter_by_time(&spec.window);
        working.filter_by_day_of_week(&spec.days);
        working.filter_by_airline(&spec.airlines);
        working.filter_by_cargo(spec.cargo);

        let mut outcome = QueryOutcome::default();

        if spec.stops > 0 {
            let result = ItinerarySearch::new(self.table, self.config).search(&request);
            working.replace(assemble(&result.itineraries));
            outcome.itineraries = result.itineraries;
            outcome.truncated = result.truncated;
        }

        // Each change filter diffs whatever the working table holds when it
        // runs, so with both set the removed pass sees only the added legs.
        if let Some(advanced) = &spec.advanced {
            if advanced.changes.wants_added() {
                let diff = working.diff_against(self.table, &spec.window, advanced);
                working.replace(diff.added);
            }
            if advanced.changes.wants_removed() {
                let diff = working.diff_against(self.table, &spec.window, advanced);
                working.replace(diff.removed);
            }
        }

        debug!(
            stops = spec.stops,
            changes = ?spec.change_mode(),
            legs = working.len(),
            itineraries = outcome.itineraries.len(),
            "Query complete"
        );

        outcome.legs = working.into_legs();
        Ok(outcome)
    }
}
