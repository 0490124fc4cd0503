//! Depth-bounded itinerary search.
//!
//! Enumerates simple paths through the flight graph (airports as nodes,
//! legs as edges) with exactly the requested number of intermediate stops.
//! Every leg must lie inside the query window, and each connecting leg must
//! depart no earlier than the previous arrival plus the minimum connection
//! time.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::ops::ControlFlow;

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, trace, warn};

use crate::domain::{AirportCode, FlightLeg, TimeWindow};
use crate::query::Selector;
use crate::schedule::ScheduleTable;

use super::config::SearchConfig;

/// Error from itinerary search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}

/// Request for itinerary search.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'q> {
    pub origin: &'q Selector,
    pub destination: &'q Selector,
    pub window: TimeWindow,
    /// Number of intermediate airports; itineraries have `stops + 1` legs.
    pub stops: usize,
}

impl<'q> SearchRequest<'q> {
    pub fn new(
        origin: &'q Selector,
        destination: &'q Selector,
        window: TimeWindow,
        stops: usize,
    ) -> Self {
        Self {
            origin,
            destination,
            window,
            stops,
        }
    }

    /// Validate the search request.
    pub fn validate(&self, config: &SearchConfig) -> Result<(), SearchError> {
        if self.stops > config.max_stops {
            return Err(SearchError::InvalidRequest(format!(
                "{} stops requested, at most {} allowed",
                self.stops, config.max_stops
            )));
        }
        Ok(())
    }
}

/// One multi-leg journey. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary<'a> {
    legs: Vec<&'a FlightLeg>,
}

impl<'a> Itinerary<'a> {
    pub fn legs(&self) -> &[&'a FlightLeg] {
        &self.legs
    }

    /// Airports visited, origin first.
    pub fn path(&self) -> Vec<AirportCode> {
        std::iter::once(self.legs[0].origin().airport)
            .chain(self.legs.iter().map(|l| l.destination().airport))
            .collect()
    }

    pub fn stops(&self) -> usize {
        self.legs.len() - 1
    }

    pub fn departure(&self) -> NaiveDateTime {
        self.legs[0].departure()
    }

    pub fn arrival(&self) -> NaiveDateTime {
        self.legs[self.legs.len() - 1].arrival()
    }

    /// Door-to-door time including connections.
    pub fn duration(&self) -> Duration {
        self.arrival().signed_duration_since(self.departure())
    }
}

/// Result of itinerary search.
#[derive(Debug, Clone, Default)]
pub struct SearchResult<'a> {
    /// Found itineraries, one per distinct airport path, in discovery order.
    pub itineraries: Vec<Itinerary<'a>>,

    /// Number of partial paths examined.
    pub branches_explored: usize,

    /// Whether enumeration stopped at `SearchConfig::max_itineraries`.
    pub truncated: bool,
}

/// A partial path. Each branch of the search owns its own copy.
#[derive(Debug, Clone)]
struct Branch<'a> {
    legs: Vec<&'a FlightLeg>,
    path: Vec<AirportCode>,
    last: &'a FlightLeg,
}

impl<'a> Branch<'a> {
    fn start(leg: &'a FlightLeg) -> Self {
        Self {
            legs: vec![leg],
            path: vec![leg.origin().airport, leg.destination().airport],
            last: leg,
        }
    }

    fn with(&self, leg: &'a FlightLeg) -> Self {
        let mut next = self.clone();
        next.legs.push(leg);
        next.path.push(leg.destination().airport);
        next.last = leg;
        next
    }

    fn here(&self) -> AirportCode {
        self.last.destination().airport
    }

    /// Airports may not repeat, except that the final leg may return to the
    /// origin to close a round trip.
    fn may_visit(&self, airport: AirportCode, closing: bool) -> bool {
        !self.path.contains(&airport) || (closing && airport == self.path[0])
    }
}

/// Accumulates complete itineraries for one search call.
struct Found<'a> {
    itineraries: Vec<Itinerary<'a>>,
    seen: HashSet<Vec<AirportCode>>,
    limit: usize,
    explored: usize,
    truncated: bool,
}

impl<'a> Found<'a> {
    fn new(limit: usize) -> Self {
        Self {
            itineraries: Vec::new(),
            seen: HashSet::new(),
            limit,
            explored: 0,
            truncated: false,
        }
    }

    /// Keep the first itinerary found for each airport path.
    fn record(&mut self, branch: Branch<'a>) -> ControlFlow<()> {
        if self.seen.contains(&branch.path) {
            return ControlFlow::Continue(());
        }
        if self.itineraries.len() >= self.limit {
            self.truncated = true;
            return ControlFlow::Break(());
        }
        trace!(path = ?branch.path, "Itinerary found");
        self.seen.insert(branch.path);
        self.itineraries.push(Itinerary { legs: branch.legs });
        ControlFlow::Continue(())
    }
}

/// Record `arrival` for `key` if it beats the earliest seen so far.
///
/// A leg to the same next airport that arrives no earlier than one already
/// tried can only reach the same paths, so it is skipped.
fn improves<K: Eq + Hash>(
    best: &mut HashMap<K, NaiveDateTime>,
    key: K,
    arrival: NaiveDateTime,
) -> bool {
    match best.get(&key) {
        Some(&seen) if seen <= arrival => false,
        _ => {
            best.insert(key, arrival);
            true
        }
    }
}

/// Itinerary search over the full schedule table.
pub struct ItinerarySearch<'a> {
    table: &'a ScheduleTable,
    config: &'a SearchConfig,
}

impl<'a> ItinerarySearch<'a> {
    pub fn new(table: &'a ScheduleTable, config: &'a SearchConfig) -> Self {
        Self { table, config }
    }

    /// Find every itinerary with exactly `request.stops` intermediate
    /// airports, one per distinct airport path. The stop count is not
    /// checked here; callers run [`SearchRequest::validate`] first.
    pub fn search(&self, request: &SearchRequest<'_>) -> SearchResult<'a> {
        let mut found = Found::new(self.config.max_itineraries);

        // The origin selector applies to the first hop only; later hops
        // leave from the single airport the path has reached.
        let mut first_hops: Vec<&'a FlightLeg> = self
            .table
            .legs()
            .iter()
            .filter(|leg| request.origin.matches_origin(leg))
            .filter(|leg| leg.origin().airport != leg.destination().airport)
            .filter(|leg| request.window.admits(leg.departure(), leg.arrival()))
            .collect();
        first_hops.sort_by_key(|leg| leg.departure());

        let mut best = HashMap::new();
        for leg in first_hops {
            let key = (leg.origin().airport, leg.destination().airport);
            if !improves(&mut best, key, leg.arrival()) {
                continue;
            }
            if self
                .extend(request, Branch::start(leg), request.stops, &mut found)
                .is_break()
            {
                break;
            }
        }

        debug!(
            stops = request.stops,
            itineraries = found.itineraries.len(),
            explored = found.explored,
            "Itinerary search finished"
        );
        if found.truncated {
            warn!(
                limit = self.config.max_itineraries,
                "Itinerary limit reached, results truncated"
            );
        }

        SearchResult {
            itineraries: found.itineraries,
            branches_explored: found.explored,
            truncated: found.truncated,
        }
    }

    /// Grow `branch` by `remaining` more legs.
    fn extend(
        &self,
        request: &SearchRequest<'_>,
        branch: Branch<'a>,
        remaining: usize,
        found: &mut Found<'a>,
    ) -> ControlFlow<()> {
        found.explored += 1;
        let arrived = request.destination.matches_destination(branch.last);

        if remaining == 0 {
            return if arrived {
                found.record(branch)
            } else {
                ControlFlow::Continue(())
            };
        }
        if arrived {
            // Too few stops to count; going on would pass through the
            // destination.
            return ControlFlow::Continue(());
        }

        let earliest = branch.last.arrival() + self.config.min_connection();
        let closing = remaining == 1;
        let mut best = HashMap::new();

        for leg in self
            .table
            .departures_from(&branch.here())
            .skip_while(|leg| leg.departure() < earliest)
        {
            if !request.window.admits(leg.departure(), leg.arrival()) {
                continue;
            }
            let next = leg.destination().airport;
            if !branch.may_visit(next, closing) || !improves(&mut best, next, leg.arrival()) {
                continue;
            }
            self.extend(request, branch.with(leg), remaining - 1, found)?;
        }

        ControlFlow::Continue(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::parse_query_instant;
    use crate::domain::test_support::*;
    use crate::query::SelectorKind;
    use proptest::prelude::*;

    const AIRPORTS: [&str; 5] = ["KJFK", "KORD", "KDEN", "KBOS", "KSFO"];

    fn arb_leg() -> impl Strategy<Value = FlightLeg> {
        (0usize..5, 1usize..5, 0u32..20, 30u32..240).prop_map(|(from, offset, h, minutes)| {
            let to = (from + offset) % AIRPORTS.len();
            leg("AA", AIRPORTS[from], AIRPORTS[to], &format!("{h:02}00"), minutes)
        })
    }

    proptest! {
        #[test]
        fn itineraries_are_simple_connected_paths(
            legs in proptest::collection::vec(arb_leg(), 0..30),
            origin in 0usize..5,
            destination in 0usize..5,
            stops in 0usize..4,
        ) {
            let table = ScheduleTable::from_legs(legs);
            let config = SearchConfig::default();
            let window = TimeWindow::new(
                parse_query_instant("20230403", "0000").unwrap(),
                parse_query_instant("20230405", "0000").unwrap(),
            );
            let origin = Selector::new(SelectorKind::Airport, [AIRPORTS[origin]]);
            let destination = Selector::new(SelectorKind::Airport, [AIRPORTS[destination]]);

            let result = ItinerarySearch::new(&table, &config)
                .search(&SearchRequest::new(&origin, &destination, window, stops));

            let mut seen = HashSet::new();
            for itinerary in &result.itineraries {
                prop_assert_eq!(itinerary.legs().len(), stops + 1);

                let path = itinerary.path();
                prop_assert!(seen.insert(path.clone()), "duplicate path");

                // Intermediates are distinct from each other and the ends.
                let inner = &path[1..path.len() - 1];
                let distinct: HashSet<_> = inner.iter().collect();
                prop_assert_eq!(distinct.len(), inner.len());
                prop_assert!(!inner.contains(&path[0]));
                prop_assert!(!inner.contains(&path[path.len() - 1]));

                for pair in itinerary.legs().windows(2) {
                    prop_assert_eq!(pair[0].destination().airport, pair[1].origin().airport);
                    prop_assert!(pair[1].departure() >= pair[0].arrival());
                }
                for leg in itinerary.legs() {
                    prop_assert!(window.admits(leg.departure(), leg.arrival()));
                }
            }
        }
    }
}
