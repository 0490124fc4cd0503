//! Data transfer objects for web requests and responses.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{AirlineCode, DaySelection, FlightLeg, TimeWindow};
use crate::planner::{Itinerary, QueryOutcome};
use crate::query::{
    AdvancedQuery, CargoFilter, ChangeMode, QueryError, QuerySpec, Selector, SelectorKind, Side,
    parse_airlines, parse_days, parse_flag, parse_stops,
};
use crate::schedule::TableSummary;

/// A boolean form field, sent either as JSON `true`/`false` or as the
/// strings `"true"`/`"false"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}

impl Default for Flag {
    fn default() -> Self {
        Flag::Bool(false)
    }
}

impl Flag {
    fn parse(&self, field: &'static str) -> Result<bool, QueryError> {
        match self {
            Flag::Bool(b) => Ok(*b),
            Flag::Text(s) => parse_flag(field, s),
        }
    }

    fn as_text(&self) -> String {
        match self {
            Flag::Bool(b) => b.to_string(),
            Flag::Text(s) => s.clone(),
        }
    }
}

/// A stop count, sent as a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StopCount {
    Count(usize),
    Text(String),
}

impl Default for StopCount {
    fn default() -> Self {
        StopCount::Count(0)
    }
}

impl StopCount {
    fn parse(&self) -> Result<usize, QueryError> {
        match self {
            StopCount::Count(n) => Ok(*n),
            StopCount::Text(s) => parse_stops(s),
        }
    }
}

/// Request to query the schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// "airport", "country" or "continent"
    pub origin_type: String,
    #[serde(default)]
    pub origin_values: Vec<String>,

    /// "airport", "country" or "continent"
    pub dest_type: String,
    #[serde(default)]
    pub dest_values: Vec<String>,

    /// YYYYMMDD
    pub start_date: String,
    /// HHMM
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,

    /// Day name to "true"/"false"; omitted means every day.
    #[serde(default)]
    pub day_of_week: Option<HashMap<String, Flag>>,

    pub airlines: Vec<String>,

    #[serde(default)]
    pub is_cargo: Flag,
    #[serde(default)]
    pub is_passenger: Flag,

    #[serde(default)]
    pub stops: StopCount,

    #[serde(default)]
    pub advanced: Option<AdvancedRequest>,
}

/// The comparison period for added/removed-flight detection.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvancedRequest {
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,

    /// Defaults to the primary airlines when empty.
    #[serde(default)]
    pub airlines: Vec<String>,

    #[serde(default)]
    pub filter_added: Flag,
    #[serde(default)]
    pub filter_removed: Flag,
}

impl QueryRequest {
    /// Validate and convert into a query specification.
    pub fn to_spec(&self) -> Result<QuerySpec, QueryError> {
        let origin = Selector::new(
            SelectorKind::parse(&self.origin_type, Side::Origin)?,
            &self.origin_values,
        );
        let destination = Selector::new(
            SelectorKind::parse(&self.dest_type, Side::Destination)?,
            &self.dest_values,
        );
        let window = TimeWindow::parse(
            &self.start_date,
            &self.start_time,
            &self.end_date,
            &self.end_time,
        )?;

        let days = match &self.day_of_week {
            None => DaySelection::all(),
            Some(flags) => {
                let flags: HashMap<String, String> = flags
                    .iter()
                    .map(|(day, flag)| (day.clone(), flag.as_text()))
                    .collect();
                parse_days(&flags)?
            }
        };

        let airlines = parse_airlines(&self.airlines)?;
        let cargo = CargoFilter::from_flags(
            self.is_cargo.parse("is_cargo")?,
            self.is_passenger.parse("is_passenger")?,
        );
        let stops = self.stops.parse()?;
        let advanced = self
            .advanced
            .as_ref()
            .map(|a| a.to_query(&airlines))
            .transpose()?;

        Ok(QuerySpec {
            origin,
            destination,
            window,
            days,
            airlines,
            cargo,
            stops,
            advanced,
        })
    }
}

impl AdvancedRequest {
    fn to_query(&self, primary: &BTreeSet<AirlineCode>) -> Result<AdvancedQuery, QueryError> {
        let window = TimeWindow::parse(
            &self.start_date,
            &self.start_time,
            &self.end_date,
            &self.end_time,
        )?;
        let airlines = if self.airlines.is_empty() {
            primary.clone()
        } else {
            parse_airlines(&self.airlines)?
        };
        let changes = ChangeMode::from_flags(
            self.filter_added.parse("filter_added")?,
            self.filter_removed.parse("filter_removed")?,
        );

        Ok(AdvancedQuery {
            window,
            airlines,
            changes,
        })
    }
}

/// Response to a schedule query.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// Distinct [origin, destination, airline, "true"|"false"] tuples,
    /// sorted.
    pub routes: Vec<[String; 4]>,

    /// Itineraries found, when stops were requested.
    pub itineraries: Vec<ItineraryResult>,

    /// Number of legs in the final result table.
    pub legs_matched: usize,

    /// Whether itinerary enumeration hit its limit.
    pub truncated: bool,
}

/// One itinerary in a query response.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    /// Airport codes, origin first
    pub path: Vec<String>,
    pub stops: usize,
    pub departure: String,
    pub arrival: String,
    pub duration_mins: i64,
    pub legs: Vec<LegResult>,
}

/// One flight leg in a query response.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub airline: String,
    pub flight_number: u32,
    pub origin: String,
    pub destination: String,
    /// ISO 8601 local time
    pub departure: String,
    pub arrival: String,
    pub elapsed_minutes: u32,
    pub cargo: bool,
}

/// Headline numbers about the loaded schedule.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub legs: usize,
    pub airports: usize,
    pub airlines: usize,
    pub first_departure: Option<String>,
    pub last_arrival: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl QueryResponse {
    /// Create from an engine outcome.
    pub fn from_outcome(outcome: &QueryOutcome<'_>) -> Self {
        let routes = outcome
            .routes()
            .into_iter()
            .map(|r| {
                [
                    r.origin.to_string(),
                    r.destination.to_string(),
                    r.airline.to_string(),
                    r.cargo.to_string(),
                ]
            })
            .collect();

        Self {
            routes,
            itineraries: outcome
                .itineraries
                .iter()
                .map(ItineraryResult::from_itinerary)
                .collect(),
            legs_matched: outcome.legs.len(),
            truncated: outcome.truncated,
        }
    }
}

impl ItineraryResult {
    pub fn from_itinerary(itinerary: &Itinerary<'_>) -> Self {
        Self {
            path: itinerary.path().iter().map(|a| a.to_string()).collect(),
            stops: itinerary.stops(),
            departure: format_instant(itinerary.departure()),
            arrival: format_instant(itinerary.arrival()),
            duration_mins: itinerary.duration().num_minutes(),
            legs: itinerary.legs().iter().map(|l| LegResult::from_leg(l)).collect(),
        }
    }
}

impl LegResult {
    pub fn from_leg(leg: &FlightLeg) -> Self {
        Self {
            airline: leg.airline().to_string(),
            flight_number: leg.flight_number(),
            origin: leg.origin().airport.to_string(),
            destination: leg.destination().airport.to_string(),
            departure: format_instant(leg.departure()),
            arrival: format_instant(leg.arrival()),
            elapsed_minutes: leg.elapsed_minutes(),
            cargo: leg.is_cargo(),
        }
    }
}

impl SummaryResponse {
    pub fn from_summary(summary: &TableSummary) -> Self {
        Self {
            legs: summary.legs,
            airports: summary.airports,
            airlines: summary.airlines,
            first_departure: summary.first_departure.map(format_instant),
            last_arrival: summary.last_arrival.map(format_instant),
        }
    }
}

/// Format an instant as "YYYY-MM-DDTHH:MM".
fn format_instant(instant: chrono::NaiveDateTime) -> String {
    instant.format("%Y-%m-%dT%H:%M").to_string()
}
