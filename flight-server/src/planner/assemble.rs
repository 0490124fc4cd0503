//! Result assembly for itinerary queries.
//!
//! Flattens found itineraries into one leg table, drops repeated rows, then
//! applies a fixed exclusion policy on leg destinations.

use std::collections::{BTreeSet, HashSet};

use crate::domain::{AirlineCode, AirportCode, FlightLeg, RegionCode};

use super::search::Itinerary;

/// Legs arriving on this continent are never returned.
pub const EXCLUDED_CONTINENT: RegionCode = RegionCode::EUROPE;

/// Legs arriving at these airports (Atlanta, Los Angeles) are never returned.
pub const EXCLUDED_HUBS: [&str; 2] = ["KATL", "KLAX"];

/// Whether the exclusion policy drops `leg`.
pub fn is_excluded(leg: &FlightLeg) -> bool {
    let destination = leg.destination();
    destination.continent == EXCLUDED_CONTINENT
        || EXCLUDED_HUBS.contains(&destination.airport.as_str())
}

/// Flatten itineraries into a deduplicated, policy-filtered leg table.
///
/// Order is first appearance across itineraries.
pub fn assemble<'a>(itineraries: &[Itinerary<'a>]) -> Vec<&'a FlightLeg> {
    let mut seen: HashSet<&'a FlightLeg> = HashSet::new();
    itineraries
        .iter()
        .flat_map(|i| i.legs().iter().copied())
        .filter(|leg| seen.insert(leg))
        .filter(|leg| !is_excluded(leg))
        .collect()
}

/// The externally reported shape of a direct result:
/// (origin, destination, airline, cargo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey {
    pub origin: AirportCode,
    pub destination: AirportCode,
    pub airline: AirlineCode,
    pub cargo: bool,
}

impl RouteKey {
    pub fn of(leg: &FlightLeg) -> Self {
        Self {
            origin: leg.origin().airport,
            destination: leg.destination().airport,
            airline: leg.airline(),
            cargo: leg.is_cargo(),
        }
    }
}

/// Distinct route tuples of a leg table, sorted.
pub fn routes<'a>(legs: impl IntoIterator<Item = &'a FlightLeg>) -> BTreeSet<RouteKey> {
    legs.into_iter().map(RouteKey::of).collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::parse_query_instant;
    use crate::domain::test_support::*;
    use crate::domain::TimeWindow;
    use crate::planner::{ItinerarySearch, SearchConfig, SearchRequest};
    use crate::query::{Selector, SelectorKind};
    use crate::schedule::ScheduleTable;
    use proptest::prelude::*;

    const AIRPORTS: [&str; 6] = ["KJFK", "KORD", "KATL", "KLAX", "EGLL", "KBOS"];

    fn arb_leg() -> impl Strategy<Value = FlightLeg> {
        (0usize..6, 1usize..6, 0u32..20, 30u32..240).prop_map(|(from, offset, h, minutes)| {
            let to = (from + offset) % AIRPORTS.len();
            leg("AA", AIRPORTS[from], AIRPORTS[to], &format!("{h:02}00"), minutes)
        })
    }

    proptest! {
        #[test]
        fn assembled_legs_pass_exclusion_policy(
            legs in proptest::collection::vec(arb_leg(), 0..30),
            stops in 1usize..3,
        ) {
            let table = ScheduleTable::from_legs(legs);
            let config = SearchConfig::default();
            let window = TimeWindow::new(
                parse_query_instant("20230403", "0000").unwrap(),
                parse_query_instant("20230405", "0000").unwrap(),
            );
            let continent = Selector::new(SelectorKind::Continent, ["UA", "EU"]);

            let found = ItinerarySearch::new(&table, &config)
                .search(&SearchRequest::new(&continent, &continent, window, stops))
                .itineraries;

            let assembled = assemble(&found);
            let unique: HashSet<_> = assembled.iter().collect();
            prop_assert_eq!(unique.len(), assembled.len());
            for leg in assembled {
                prop_assert!(leg.destination().continent != RegionCode::EUROPE);
                prop_assert!(!["KATL", "KLAX"].contains(&leg.destination().airport.as_str()));
            }
        }
    }
}
