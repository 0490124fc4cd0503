//! Filter pipeline over the schedule table.
//!
//! A [`WorkingTable`] is a per-request view of the full table: a list of
//! borrowed legs that each filter narrows in place. Because it only borrows,
//! no filter can write to the shared table.

mod diff;

pub use diff::{ScheduleDiff, ServiceKey};

use std::collections::BTreeSet;

use tracing::trace;

use crate::domain::{AirlineCode, DaySelection, FlightLeg, TimeWindow};
use crate::query::{CargoFilter, Selector};
use crate::schedule::ScheduleTable;

/// The per-request, filtered view of the schedule.
#[derive(Debug, Clone)]
pub struct WorkingTable<'a> {
    legs: Vec<&'a FlightLeg>,
}

impl<'a> WorkingTable<'a> {
    /// A fresh working table holding every leg of the full table.
    pub fn new(table: &'a ScheduleTable) -> Self {
        Self {
            legs: table.legs().iter().collect(),
        }
    }

    pub fn legs(&self) -> &[&'a FlightLeg] {
        &self.legs
    }

    pub fn into_legs(self) -> Vec<&'a FlightLeg> {
        self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Replace the contents wholesale (e.g. with search results).
    pub fn replace(&mut self, legs: Vec<&'a FlightLeg>) {
        self.legs = legs;
    }

    fn retain(&mut self, stage: &'static str, mut keep: impl FnMut(&FlightLeg) -> bool) {
        let before = self.legs.len();
        self.legs.retain(|leg| keep(leg));
        trace!(stage, before, after = self.legs.len(), "Filter applied");
    }

    /// Keep legs whose origin matches `origin` and destination matches
    /// `destination`, each on the column its kind selects.
    pub fn filter_by_location(&mut self, origin: &Selector, destination: &Selector) {
        self.retain("location", |leg| {
            origin.matches_origin(leg) && destination.matches_destination(leg)
        });
    }

    /// Keep legs departing strictly after the window start and arriving
    /// strictly before its end.
    pub fn filter_by_time(&mut self, window: &TimeWindow) {
        self.retain("time", |leg| window.admits(leg.departure(), leg.arrival()));
    }

    /// Keep legs flying on an enabled day.
    pub fn filter_by_day_of_week(&mut self, days: &DaySelection) {
        self.retain("day_of_week", |leg| days.contains(leg.day_of_week()));
    }

    /// Keep legs operated by one of `airlines`.
    pub fn filter_by_airline(&mut self, airlines: &BTreeSet<AirlineCode>) {
        self.retain("airline", |leg| airlines.contains(&leg.airline()));
    }

    /// Keep cargo legs, passenger legs, or both.
    pub fn filter_by_cargo(&mut self, cargo: CargoFilter) {
        if cargo == CargoFilter::Any {
            return;
        }
        self.retain("cargo", |leg| cargo.admits(leg));
    }
}
