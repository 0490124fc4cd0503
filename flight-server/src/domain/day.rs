//! Day-of-week handling.
//!
//! The schedule dataset tags every leg with a day-of-week symbol, and queries
//! enable a subset of days. Both sides use the closed [`DayOfWeek`] type.

use std::collections::HashMap;
use std::fmt;

/// Error returned when parsing an unknown day-of-week symbol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid day of week: {0:?}")]
pub struct InvalidDayOfWeek(pub String);

/// One of the seven days of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All days, Monday first.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Parse a day symbol.
    ///
    /// Accepts three-letter abbreviations ("MON"), full names ("Monday"),
    /// both case-insensitive, and ISO day numbers "1" (Monday) to "7" (Sunday).
    ///
    /// # Examples
    ///
    /// ```
    /// use flight_server::domain::DayOfWeek;
    ///
    /// assert_eq!(DayOfWeek::parse("MON").unwrap(), DayOfWeek::Monday);
    /// assert_eq!(DayOfWeek::parse("sunday").unwrap(), DayOfWeek::Sunday);
    /// assert_eq!(DayOfWeek::parse("3").unwrap(), DayOfWeek::Wednesday);
    /// assert!(DayOfWeek::parse("Funday").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, InvalidDayOfWeek> {
        let upper = s.trim().to_ascii_uppercase();
        let day = match upper.as_str() {
            "MON" | "MONDAY" | "1" => DayOfWeek::Monday,
            "TUE" | "TUESDAY" | "2" => DayOfWeek::Tuesday,
            "WED" | "WEDNESDAY" | "3" => DayOfWeek::Wednesday,
            "THU" | "THURSDAY" | "4" => DayOfWeek::Thursday,
            "FRI" | "FRIDAY" | "5" => DayOfWeek::Friday,
            "SAT" | "SATURDAY" | "6" => DayOfWeek::Saturday,
            "SUN" | "SUNDAY" | "7" => DayOfWeek::Sunday,
            _ => return Err(InvalidDayOfWeek(s.to_string())),
        };
        Ok(day)
    }

    /// Three-letter uppercase abbreviation.
    pub fn abbreviation(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "MON",
            DayOfWeek::Tuesday => "TUE",
            DayOfWeek::Wednesday => "WED",
            DayOfWeek::Thursday => "THU",
            DayOfWeek::Friday => "FRI",
            DayOfWeek::Saturday => "SAT",
            DayOfWeek::Sunday => "SUN",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(day: chrono::Weekday) -> Self {
        DayOfWeek::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Which days of the week a query admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySelection {
    enabled: [bool; 7],
}

impl DaySelection {
    /// Every day enabled.
    pub fn all() -> Self {
        Self { enabled: [true; 7] }
    }

    /// No day enabled.
    pub fn none() -> Self {
        Self {
            enabled: [false; 7],
        }
    }

    /// Build from a string-keyed map as sent by the query form.
    ///
    /// A day is enabled iff its value is `"true"` (case-insensitive). Days
    /// absent from the map are disabled. Unknown keys are an error.
    pub fn from_flags(flags: &HashMap<String, String>) -> Result<Self, InvalidDayOfWeek> {
        let mut selection = Self::none();
        for (key, value) in flags {
            let day = DayOfWeek::parse(key)?;
            selection.set(day, value.trim().eq_ignore_ascii_case("true"));
        }
        Ok(selection)
    }

    /// Enable or disable a day.
    pub fn set(&mut self, day: DayOfWeek, enabled: bool) {
        self.enabled[day.index()] = enabled;
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, day: DayOfWeek, enabled: bool) -> Self {
        self.set(day, enabled);
        self
    }

    /// Whether a day is enabled.
    pub fn contains(&self, day: DayOfWeek) -> bool {
        self.enabled[day.index()]
    }

    /// Whether all seven days are enabled.
    pub fn is_all(&self) -> bool {
        self.enabled.iter().all(|&e| e)
    }

    /// The enabled days, Monday first.
    pub fn days(&self) -> impl Iterator<Item = DayOfWeek> + '_ {
        DayOfWeek::ALL.into_iter().filter(|d| self.contains(*d))
    }
}

impl Default for DaySelection {
    fn default() -> Self {
        Self::all()
    }
}
