//! The full schedule table.
//!
//! Loaded once at startup and shared read-only (behind `Arc`) by every
//! request. Nothing hands out mutable access after construction: filtering
//! and search work on borrowed views such as [`crate::filter::WorkingTable`].

mod loader;

pub use loader::LoadError;

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDateTime;

use crate::domain::{AirlineCode, AirportCode, FlightLeg};

/// All flight legs of the dataset, in file order.
#[derive(Debug, Clone, Default)]
pub struct ScheduleTable {
    legs: Vec<FlightLeg>,
    /// Leg indices by origin airport, ordered by departure.
    departures: HashMap<AirportCode, Vec<usize>>,
}

/// Headline numbers about a loaded table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub legs: usize,
    pub airports: usize,
    pub airlines: usize,
    pub first_departure: Option<NaiveDateTime>,
    pub last_arrival: Option<NaiveDateTime>,
}

impl ScheduleTable {
    /// Build a table from legs already in memory.
    pub fn from_legs(legs: Vec<FlightLeg>) -> Self {
        let mut departures: HashMap<AirportCode, Vec<usize>> = HashMap::new();
        for (idx, leg) in legs.iter().enumerate() {
            departures.entry(leg.origin().airport).or_default().push(idx);
        }
        for indices in departures.values_mut() {
            indices.sort_by_key(|&i| (legs[i].departure(), i));
        }

        Self { legs, departures }
    }

    /// Every leg, in load order.
    pub fn legs(&self) -> &[FlightLeg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Legs departing `airport`, earliest departure first.
    pub fn departures_from(&self, airport: &AirportCode) -> impl Iterator<Item = &FlightLeg> {
        self.departures
            .get(airport)
            .into_iter()
            .flatten()
            .map(|&i| &self.legs[i])
    }

    /// Counts of legs, distinct airports and airlines, and the time span.
    pub fn summary(&self) -> TableSummary {
        let airports: BTreeSet<AirportCode> = self
            .legs
            .iter()
            .flat_map(|l| [l.origin().airport, l.destination().airport])
            .collect();
        let airlines: BTreeSet<AirlineCode> = self.legs.iter().map(FlightLeg::airline).collect();

        TableSummary {
            legs: self.legs.len(),
            airports: airports.len(),
            airlines: airlines.len(),
            first_departure: self.legs.iter().map(FlightLeg::departure).min(),
            last_arrival: self.legs.iter().map(FlightLeg::arrival).max(),
        }
    }
}
