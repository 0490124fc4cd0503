//! Parsed, validated query specification.
//!
//! The request layer turns whatever arrived over the wire into a
//! [`QuerySpec`]; everything downstream trusts its contents.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::{
    AirlineCode, DaySelection, Endpoint, FlightLeg, InvalidAirlineCode, InvalidDayOfWeek,
    RegionCode, TimeError, TimeWindow,
};

/// Errors from building a query specification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Selector kind was empty
    #[error("{0} selector kind is empty")]
    EmptySelectorKind(Side),

    /// Selector kind was not airport, country or continent
    #[error("unknown {side} selector kind: {kind:?}")]
    UnknownSelectorKind { side: Side, kind: String },

    /// Date or time could not be parsed
    #[error(transparent)]
    Time(#[from] TimeError),

    /// Day-of-week key was not recognised
    #[error(transparent)]
    Day(#[from] InvalidDayOfWeek),

    /// Airline code was malformed
    #[error(transparent)]
    Airline(#[from] InvalidAirlineCode),

    /// A flag field was not a boolean
    #[error("{field}: {value:?} is not a boolean")]
    InvalidFlag { field: &'static str, value: String },

    /// Stop count was not a non-negative integer
    #[error("stop count {0:?} is not a non-negative integer")]
    InvalidStops(String),
}

/// Which end of the journey a selector applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Origin,
    Destination,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Origin => f.write_str("origin"),
            Side::Destination => f.write_str("destination"),
        }
    }
}

/// Which column a selector matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    Airport,
    Country,
    Continent,
}

impl SelectorKind {
    /// Parse "airport", "country" or "continent" (case-insensitive).
    pub fn parse(s: &str, side: Side) -> Result<Self, QueryError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Err(QueryError::EmptySelectorKind(side)),
            "airport" => Ok(SelectorKind::Airport),
            "country" => Ok(SelectorKind::Country),
            "continent" => Ok(SelectorKind::Continent),
            _ => Err(QueryError::UnknownSelectorKind {
                side,
                kind: s.to_string(),
            }),
        }
    }
}

/// The query-form value that means "unassigned region".
const NOT_APPLICABLE: &str = "NA";

/// A set of values matched against one location column.
///
/// Values are trimmed and uppercased on construction, and the sentinel "NA"
/// is replaced by the in-dataset symbol "UA".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    kind: SelectorKind,
    values: BTreeSet<String>,
}

impl Selector {
    /// Create a selector, normalising its values.
    ///
    /// # Examples
    ///
    /// ```
    /// use flight_server::query::{Selector, SelectorKind};
    ///
    /// let sel = Selector::new(SelectorKind::Continent, ["NA", "eu"]);
    /// let values: Vec<_> = sel.values().collect();
    /// assert_eq!(values, vec!["EU", "UA"]);
    /// ```
    pub fn new<I, S>(kind: SelectorKind, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_ascii_uppercase())
            .filter(|v| !v.is_empty())
            .collect();

        if values.remove(NOT_APPLICABLE) {
            values.insert(RegionCode::UNASSIGNED.as_str().to_string());
        }

        Self { kind, values }
    }

    pub fn kind(&self) -> SelectorKind {
        self.kind
    }

    /// The normalised values, in sorted order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Whether an endpoint's column (chosen by kind) is one of the values.
    pub fn matches(&self, endpoint: &Endpoint) -> bool {
        let column = match self.kind {
            SelectorKind::Airport => endpoint.airport.as_str(),
            SelectorKind::Country => endpoint.country.as_str(),
            SelectorKind::Continent => endpoint.continent.as_str(),
        };
        self.values.contains(column)
    }

    pub fn matches_origin(&self, leg: &FlightLeg) -> bool {
        self.matches(leg.origin())
    }

    pub fn matches_destination(&self, leg: &FlightLeg) -> bool {
        self.matches(leg.destination())
    }
}

/// Cargo/passenger inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CargoFilter {
    CargoOnly,
    PassengerOnly,
    /// Both or neither flag set: keep every leg.
    #[default]
    Any,
}

impl CargoFilter {
    /// Derive from the two inclusion flags.
    pub fn from_flags(cargo: bool, passenger: bool) -> Self {
        match (cargo, passenger) {
            (true, false) => CargoFilter::CargoOnly,
            (false, true) => CargoFilter::PassengerOnly,
            _ => CargoFilter::Any,
        }
    }

    pub fn admits(&self, leg: &FlightLeg) -> bool {
        match self {
            CargoFilter::CargoOnly => leg.is_cargo(),
            CargoFilter::PassengerOnly => !leg.is_cargo(),
            CargoFilter::Any => true,
        }
    }
}

/// Which schedule changes to report against the comparison period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeMode {
    #[default]
    None,
    Added,
    Removed,
    Both,
}

impl ChangeMode {
    pub fn from_flags(added: bool, removed: bool) -> Self {
        match (added, removed) {
            (false, false) => ChangeMode::None,
            (true, false) => ChangeMode::Added,
            (false, true) => ChangeMode::Removed,
            (true, true) => ChangeMode::Both,
        }
    }

    pub fn wants_added(&self) -> bool {
        matches!(self, ChangeMode::Added | ChangeMode::Both)
    }

    pub fn wants_removed(&self) -> bool {
        matches!(self, ChangeMode::Removed | ChangeMode::Both)
    }
}

/// Secondary window and airline set for added/removed-flight diffing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancedQuery {
    pub window: TimeWindow,
    pub airlines: BTreeSet<AirlineCode>,
    pub changes: ChangeMode,
}

/// A complete, validated filter request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub origin: Selector,
    pub destination: Selector,
    pub window: TimeWindow,
    pub days: DaySelection,
    pub airlines: BTreeSet<AirlineCode>,
    pub cargo: CargoFilter,
    /// 0 = direct legs only; more triggers itinerary search.
    pub stops: usize,
    pub advanced: Option<AdvancedQuery>,
}

impl QuerySpec {
    /// Whether added/removed diffing was requested.
    pub fn change_mode(&self) -> ChangeMode {
        self.advanced
            .as_ref()
            .map(|a| a.changes)
            .unwrap_or_default()
    }
}

/// Parse a list of airline codes into a set.
pub fn parse_airlines<I, S>(codes: I) -> Result<BTreeSet<AirlineCode>, QueryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .map(|c| AirlineCode::parse_normalized(c.as_ref()).map_err(QueryError::from))
        .collect()
}

/// Parse a form flag: "true"/"false" (case-insensitive).
pub fn parse_flag(field: &'static str, value: &str) -> Result<bool, QueryError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" | "" => Ok(false),
        _ => Err(QueryError::InvalidFlag {
            field,
            value: value.to_string(),
        }),
    }
}

/// Parse a stop count.
pub fn parse_stops(value: &str) -> Result<usize, QueryError> {
    value
        .trim()
        .parse()
        .map_err(|_| QueryError::InvalidStops(value.to_string()))
}

/// Convenience for building a day selection from form flags.
pub fn parse_days(
    flags: &std::collections::HashMap<String, String>,
) -> Result<DaySelection, QueryError> {
    Ok(DaySelection::from_flags(flags)?)
}
