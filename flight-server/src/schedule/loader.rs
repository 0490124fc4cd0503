//! CSV loading for the schedule table.
//!
//! Each row of the dataset becomes one [`FlightLeg`]. The loader is strict:
//! any missing column, non-coercible value or invalid code aborts the whole
//! load, because a process serving a partial table would answer wrongly.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{
    AirlineCode, AirportCode, DayOfWeek, DomainError, Endpoint, FlightLeg, LegParts, RegionCode,
    parse_padded_hhmm,
};

use super::ScheduleTable;

/// Errors from loading the schedule dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV, a missing column, or a value of the wrong type
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A value parsed but failed domain validation
    #[error("record {record}: field {field}: {message}")]
    Field {
        record: u64,
        field: &'static str,
        message: String,
    },
}

/// One dataset row as it appears on disk.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct ScheduleRow {
    year: i32,
    month: u32,
    day: u32,
    day_of_week: String,
    airline: String,
    flight_number: u32,
    origin_airport: String,
    destination_airport: String,
    departure_time: String,
    diverted: i64,
    cancelled: i64,
    /// Present in the dataset but never trusted; arrival is derived.
    #[allow(dead_code)]
    arrival_time: Option<String>,
    elapsed_time: i64,
    origin_country: String,
    destination_country: String,
    origin_continent: String,
    destination_continent: String,
    cargo: String,
}

impl ScheduleRow {
    fn into_leg(self, record: u64) -> Result<FlightLeg, LoadError> {
        let field_err = |field: &'static str, message: String| LoadError::Field {
            record,
            field,
            message,
        };

        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            field_err(
                "YEAR/MONTH/DAY",
                format!("{}-{}-{} is not a date", self.year, self.month, self.day),
            )
        })?;
        let departure_time = parse_padded_hhmm(&self.departure_time)
            .map_err(|e| field_err("DEPARTURE_TIME", e.to_string()))?;
        let elapsed_minutes = u32::try_from(self.elapsed_time).map_err(|_| {
            field_err(
                "ELAPSED_TIME",
                format!("{} is not a non-negative minute count", self.elapsed_time),
            )
        })?;

        let origin = Endpoint::new(
            AirportCode::parse(self.origin_airport.trim())
                .map_err(|e| field_err("ORIGIN_AIRPORT", e.to_string()))?,
            RegionCode::parse(self.origin_country.trim())
                .map_err(|e| field_err("ORIGIN_COUNTRY", e.to_string()))?,
            RegionCode::parse(self.origin_continent.trim())
                .map_err(|e| field_err("ORIGIN_CONTINENT", e.to_string()))?,
        );
        let destination = Endpoint::new(
            AirportCode::parse(self.destination_airport.trim())
                .map_err(|e| field_err("DESTINATION_AIRPORT", e.to_string()))?,
            RegionCode::parse(self.destination_country.trim())
                .map_err(|e| field_err("DESTINATION_COUNTRY", e.to_string()))?,
            RegionCode::parse(self.destination_continent.trim())
                .map_err(|e| field_err("DESTINATION_CONTINENT", e.to_string()))?,
        );

        FlightLeg::new(LegParts {
            date,
            day_of_week: DayOfWeek::parse(&self.day_of_week)
                .map_err(|e| field_err("DAY_OF_WEEK", e.to_string()))?,
            airline: AirlineCode::parse(self.airline.trim())
                .map_err(|e| field_err("AIRLINE", e.to_string()))?,
            flight_number: self.flight_number,
            origin,
            destination,
            departure_time,
            elapsed_minutes,
            cargo: parse_flag(&self.cargo).ok_or_else(|| {
                field_err("CARGO", format!("{:?} is not a boolean", self.cargo))
            })?,
            diverted: self.diverted != 0,
            cancelled: self.cancelled != 0,
        })
        .map_err(|e| match e {
            DomainError::ArrivalOutOfRange(_) => field_err("ELAPSED_TIME", e.to_string()),
        })
    }
}

/// Parse a boolean column: true/false or 1/0, case-insensitive.
fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

impl ScheduleTable {
    /// Load the schedule from a CSV file with a header row.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            legs = table.len(),
            "Loaded schedule table"
        );
        Ok(table)
    }

    /// Load the schedule from any CSV source with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut legs = Vec::new();
        for (idx, row) in rdr.deserialize::<ScheduleRow>().enumerate() {
            let row = row?;
            // Header is line 1, so the first record is record 1 on line 2.
            legs.push(row.into_leg(idx as u64 + 1)?);
        }

        debug!(legs = legs.len(), "Parsed schedule rows");
        Ok(Self::from_legs(legs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "YEAR,MONTH,DAY,DAY_OF_WEEK,AIRLINE,FLIGHT_NUMBER,ORIGIN_AIRPORT,\
DESTINATION_AIRPORT,DEPARTURE_TIME,DIVERTED,CANCELLED,ARRIVAL_TIME,ELAPSED_TIME,\
ORIGIN_COUNTRY,DESTINATION_COUNTRY,ORIGIN_CONTINENT,DESTINATION_CONTINENT,CARGO";

    fn csv_of(rows: &[&str]) -> String {
        let mut s = HEADER.to_string();
        for row in rows {
            s.push('\n');
            s.push_str(row);
        }
        s
    }

    #[test]
    fn loads_and_derives_arrival() {
        let data = csv_of(&[
            "2023,4,3,MON,BA,112,KJFK,EGLL,2230,0,0,0530,420,US,GB,UA,EU,False",
            "2023,4,3,MON,FX,9,KJFK,KMEM,730,0,0,,95,US,US,UA,UA,True",
        ]);

        let table = ScheduleTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let ba = &table.legs()[0];
        assert_eq!(ba.departure().to_string(), "2023-04-03 22:30:00");
        assert_eq!(ba.arrival().to_string(), "2023-04-04 05:30:00");
        assert_eq!(ba.destination().continent, RegionCode::EUROPE);
        assert!(!ba.is_cargo());

        let fx = &table.legs()[1];
        assert_eq!(fx.departure().to_string(), "2023-04-03 07:30:00");
        assert_eq!(fx.arrival().to_string(), "2023-04-03 09:05:00");
        assert!(fx.is_cargo());
    }

    #[test]
    fn ignores_dataset_arrival_column() {
        let data = csv_of(&["2023,4,3,MON,AA,1,KJFK,KLAX,0800,0,0,9999,360,US,US,UA,UA,0"]);
        let table = ScheduleTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.legs()[0].arrival().to_string(), "2023-04-03 14:00:00");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let data = format!(
            "{HEADER},TAIL_NUMBER\n2023,4,3,MON,AA,1,KJFK,KLAX,0800,0,0,,360,US,US,UA,UA,0,N123"
        );
        let table = ScheduleTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn empty_dataset_is_valid() {
        let table = ScheduleTable::from_reader(HEADER.as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn missing_column_fails() {
        let data = "YEAR,MONTH,DAY\n2023,4,3";
        let result = ScheduleTable::from_reader(data.as_bytes());
        assert!(matches!(result, Err(LoadError::Csv(_))));
    }

    #[test]
    fn non_integer_elapsed_fails() {
        let data = csv_of(&["2023,4,3,MON,AA,1,KJFK,KLAX,0800,0,0,,six,US,US,UA,UA,0"]);
        let result = ScheduleTable::from_reader(data.as_bytes());
        assert!(matches!(result, Err(LoadError::Csv(_))));
    }

    #[test]
    fn negative_elapsed_fails() {
        let data = csv_of(&["2023,4,3,MON,AA,1,KJFK,KLAX,0800,0,0,,-5,US,US,UA,UA,0"]);
        let err = ScheduleTable::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Field {
                record: 1,
                field: "ELAPSED_TIME",
                ..
            }
        ));
    }

    #[test]
    fn bad_departure_time_fails() {
        let data = csv_of(&[
            "2023,4,3,MON,AA,1,KJFK,KLAX,0800,0,0,,60,US,US,UA,UA,0",
            "2023,4,3,MON,AA,2,KJFK,KLAX,2460,0,0,,60,US,US,UA,UA,0",
        ]);
        let err = ScheduleTable::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Field {
                record: 2,
                field: "DEPARTURE_TIME",
                ..
            }
        ));
    }

    #[test]
    fn bad_date_fails() {
        let data = csv_of(&["2023,2,30,THU,AA,1,KJFK,KLAX,0800,0,0,,60,US,US,UA,UA,0"]);
        let err = ScheduleTable::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Field { field: "YEAR/MONTH/DAY", .. }));
    }

    #[test]
    fn bad_cargo_flag_fails() {
        let data = csv_of(&["2023,4,3,MON,AA,1,KJFK,KLAX,0800,0,0,,60,US,US,UA,UA,maybe"]);
        let err = ScheduleTable::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Field { field: "CARGO", .. }));
    }

    #[test]
    fn return_to_field_row_loads() {
        let data = csv_of(&[
            "2023,4,3,MON,AA,1,KJFK,KORD,0800,0,0,,150,US,US,UA,UA,0",
            "2023,4,3,MON,AA,2,KJFK,KJFK,0900,1,0,,60,US,US,UA,UA,0",
        ]);
        let table = ScheduleTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        let diverted = &table.legs()[1];
        assert_eq!(diverted.origin().airport, diverted.destination().airport);
    }

    #[test]
    fn numeric_day_of_week_accepted() {
        let data = csv_of(&["2023,4,3,1,AA,1,KJFK,KLAX,0800,0,0,,60,US,US,UA,UA,0"]);
        let table = ScheduleTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.legs()[0].day_of_week(), DayOfWeek::Monday);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            csv_of(&["2023,4,3,MON,DL,7,KATL,KJFK,0600,0,0,,120,US,US,UA,UA,false"])
        )
        .unwrap();

        let table = ScheduleTable::load_csv(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.legs()[0].airline().as_str(), "DL");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ScheduleTable::load_csv(dir.path().join("nope.csv"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("FALSE"), Some(false));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag(""), None);
    }
}
