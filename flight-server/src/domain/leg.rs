//! Flight leg type.
//!
//! A `FlightLeg` is one row of the schedule table: a single scheduled flight
//! between two airports. Arrival is derived from departure plus elapsed
//! minutes exactly once, at construction, and never re-derived.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::{AirlineCode, AirportCode, DayOfWeek, DomainError, RegionCode};

/// Where one end of a leg is: airport plus the country and continent it
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub airport: AirportCode,
    pub country: RegionCode,
    pub continent: RegionCode,
}

impl Endpoint {
    pub fn new(airport: AirportCode, country: RegionCode, continent: RegionCode) -> Self {
        Self {
            airport,
            country,
            continent,
        }
    }
}

/// Raw parts of a leg before validation.
#[derive(Debug, Clone)]
pub struct LegParts {
    pub date: NaiveDate,
    pub day_of_week: DayOfWeek,
    pub airline: AirlineCode,
    pub flight_number: u32,
    pub origin: Endpoint,
    pub destination: Endpoint,
    pub departure_time: NaiveTime,
    pub elapsed_minutes: u32,
    pub cargo: bool,
    pub diverted: bool,
    pub cancelled: bool,
}

/// One scheduled flight segment.
///
/// # Invariants
///
/// - `arrival() == departure() + elapsed()`, exactly
/// - origin and destination airports differ
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlightLeg {
    day_of_week: DayOfWeek,
    airline: AirlineCode,
    flight_number: u32,
    origin: Endpoint,
    destination: Endpoint,
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
    elapsed_minutes: u32,
    cargo: bool,
    diverted: bool,
    cancelled: bool,
}

impl FlightLeg {
    /// Construct a leg, deriving the arrival instant.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the arrival instant overflows the calendar.
    ///
    /// # Examples
    ///
    /// ```
    /// use flight_server::domain::*;
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let us = RegionCode::parse("US").unwrap();
    /// let gb = RegionCode::parse("GB").unwrap();
    /// let leg = FlightLeg::new(LegParts {
    ///     date: NaiveDate::from_ymd_opt(2023, 4, 3).unwrap(),
    ///     day_of_week: DayOfWeek::Monday,
    ///     airline: AirlineCode::parse("BA").unwrap(),
    ///     flight_number: 112,
    ///     origin: Endpoint::new(AirportCode::parse("KJFK").unwrap(), us, RegionCode::UNASSIGNED),
    ///     destination: Endpoint::new(AirportCode::parse("EGLL").unwrap(), gb, RegionCode::EUROPE),
    ///     departure_time: NaiveTime::from_hms_opt(22, 30, 0).unwrap(),
    ///     elapsed_minutes: 420,
    ///     cargo: false,
    ///     diverted: false,
    ///     cancelled: false,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(leg.arrival().to_string(), "2023-04-04 05:30:00");
    /// ```
    pub fn new(parts: LegParts) -> Result<Self, DomainError> {
        let departure = parts.date.and_time(parts.departure_time);
        let arrival = departure
            .checked_add_signed(Duration::minutes(i64::from(parts.elapsed_minutes)))
            .ok_or(DomainError::ArrivalOutOfRange(departure))?;

        Ok(FlightLeg {
            day_of_week: parts.day_of_week,
            airline: parts.airline,
            flight_number: parts.flight_number,
            origin: parts.origin,
            destination: parts.destination,
            departure,
            arrival,
            elapsed_minutes: parts.elapsed_minutes,
            cargo: parts.cargo,
            diverted: parts.diverted,
            cancelled: parts.cancelled,
        })
    }

    pub fn year(&self) -> i32 {
        self.departure.year()
    }

    pub fn month(&self) -> u32 {
        self.departure.month()
    }

    pub fn day(&self) -> u32 {
        self.departure.day()
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.day_of_week
    }

    pub fn airline(&self) -> AirlineCode {
        self.airline
    }

    pub fn flight_number(&self) -> u32 {
        self.flight_number
    }

    pub fn origin(&self) -> &Endpoint {
        &self.origin
    }

    pub fn destination(&self) -> &Endpoint {
        &self.destination
    }

    /// Scheduled departure instant.
    pub fn departure(&self) -> NaiveDateTime {
        self.departure
    }

    /// Scheduled arrival instant (departure + elapsed).
    pub fn arrival(&self) -> NaiveDateTime {
        self.arrival
    }

    pub fn elapsed_minutes(&self) -> u32 {
        self.elapsed_minutes
    }

    pub fn elapsed(&self) -> Duration {
        Duration::minutes(i64::from(self.elapsed_minutes))
    }

    /// Departure hour of day (0-23).
    pub fn hour(&self) -> u32 {
        self.departure.hour()
    }

    /// Departure minute of hour (0-59).
    pub fn minute(&self) -> u32 {
        self.departure.minute()
    }

    /// True for cargo legs, false for passenger legs.
    pub fn is_cargo(&self) -> bool {
        self.cargo
    }

    pub fn is_diverted(&self) -> bool {
        self.diverted
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl fmt::Display for FlightLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Origin: {}", self.origin.airport)?;
        writeln!(f, "Destination: {}", self.destination.airport)?;
        writeln!(
            f,
            "Departure Time: {}",
            self.departure.format("%m/%d/%Y %H:%M")
        )?;
        writeln!(f, "Arrival Time: {}", self.arrival.format("%m/%d/%Y %H:%M"))?;
        write!(f, "Flight Time: {} minutes", self.elapsed_minutes)
    }
}
