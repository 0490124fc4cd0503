//! Added/removed-flight detection.
//!
//! Compares the working table (the baseline period) with a comparison period
//! taken from the full table. Two legs count as the same service when they
//! share day of week, departure time of day, airline and route; the calendar
//! date is ignored.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{AirlineCode, AirportCode, DayOfWeek, FlightLeg, TimeWindow};
use crate::query::AdvancedQuery;
use crate::schedule::ScheduleTable;

use super::WorkingTable;

/// Identity of a scheduled service across periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    pub day_of_week: DayOfWeek,
    pub hour: u32,
    pub minute: u32,
    pub airline: AirlineCode,
    pub origin: AirportCode,
    pub destination: AirportCode,
}

impl ServiceKey {
    pub fn of(leg: &FlightLeg) -> Self {
        Self {
            day_of_week: leg.day_of_week(),
            hour: leg.hour(),
            minute: leg.minute(),
            airline: leg.airline(),
            origin: leg.origin().airport,
            destination: leg.destination().airport,
        }
    }
}

/// Services that appear in only one of the two periods.
///
/// `added` and `removed` are disjoint: every removed leg belongs to the
/// baseline, and no added leg matches any baseline service.
#[derive(Debug, Clone, Default)]
pub struct ScheduleDiff<'a> {
    /// In the comparison period, absent from the baseline.
    pub added: Vec<&'a FlightLeg>,
    /// In the baseline, absent from the comparison period.
    pub removed: Vec<&'a FlightLeg>,
}

impl<'a> WorkingTable<'a> {
    /// Diff the current working table against a comparison period.
    ///
    /// The baseline is the working table restricted to `primary`; the
    /// comparison is every leg of `full` inside the advanced window and
    /// operated by one of the advanced airlines.
    pub fn diff_against(
        &self,
        full: &'a ScheduleTable,
        primary: &TimeWindow,
        advanced: &AdvancedQuery,
    ) -> ScheduleDiff<'a> {
        let baseline: Vec<&'a FlightLeg> = self
            .legs
            .iter()
            .copied()
            .filter(|leg| primary.admits(leg.departure(), leg.arrival()))
            .collect();

        let comparison: Vec<&'a FlightLeg> = full
            .legs()
            .iter()
            .filter(|leg| advanced.window.admits(leg.departure(), leg.arrival()))
            .filter(|leg| advanced.airlines.contains(&leg.airline()))
            .collect();

        let baseline_keys: HashSet<ServiceKey> = baseline.iter().map(|l| ServiceKey::of(l)).collect();
        let comparison_keys: HashSet<ServiceKey> =
            comparison.iter().map(|l| ServiceKey::of(l)).collect();

        let added: Vec<_> = comparison
            .into_iter()
            .filter(|leg| !baseline_keys.contains(&ServiceKey::of(leg)))
            .collect();
        let removed: Vec<_> = baseline
            .into_iter()
            .filter(|leg| !comparison_keys.contains(&ServiceKey::of(leg)))
            .collect();

        debug!(
            baseline = baseline_keys.len(),
            comparison = comparison_keys.len(),
            added = added.len(),
            removed = removed.len(),
            "Computed schedule diff"
        );

        ScheduleDiff { added, removed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::*;
    use crate::domain::{AirlineCode, parse_query_instant};
    use crate::query::ChangeMode;
    use std::collections::BTreeSet;

    fn window(start_date: &str, end_date: &str) -> TimeWindow {
        TimeWindow::new(
            parse_query_instant(start_date, "0000").unwrap(),
            parse_query_instant(end_date, "0000").unwrap(),
        )
    }

    fn advanced(start_date: &str, end_date: &str, carriers: &[&str]) -> AdvancedQuery {
        AdvancedQuery {
            window: window(start_date, end_date),
            airlines: carriers.iter().map(|c| airline(c)).collect::<BTreeSet<AirlineCode>>(),
            changes: ChangeMode::Both,
        }
    }

    /// Baseline week starting Monday 2023-04-03, comparison week one later.
    fn two_weeks() -> ScheduleTable {
        ScheduleTable::from_legs(vec![
            // Runs both weeks at the same time: unchanged.
            leg_on("20230403", "AA", "KJFK", "KLAX", "0800", 360),
            leg_on("20230410", "AA", "KJFK", "KLAX", "0800", 360),
            // Baseline only: removed.
            leg_on("20230404", "BA", "KJFK", "EGLL", "2200", 420),
            // Retimed in the comparison week: removed and added.
            leg_on("20230405", "AA", "KJFK", "KATL", "0900", 150),
            leg_on("20230412", "AA", "KJFK", "KATL", "0930", 150),
            // Comparison only: added.
            leg_on("20230413", "BA", "EGLL", "KJFK", "1000", 480),
        ])
    }

    #[test]
    fn added_and_removed() {
        let table = two_weeks();
        let working = WorkingTable::new(&table);
        let diff = working.diff_against(
            &table,
            &window("20230403", "20230410"),
            &advanced("20230410", "20230417", &["AA", "BA"]),
        );

        let added: Vec<String> = diff.added.iter().map(|l| format!("{}{}", l.airline(), l.day())).collect();
        let removed: Vec<String> =
            diff.removed.iter().map(|l| format!("{}{}", l.airline(), l.day())).collect();

        assert_eq!(added, vec!["AA12", "BA13"]);
        assert_eq!(removed, vec!["BA4", "AA5"]);
    }

    #[test]
    fn comparison_respects_advanced_airlines() {
        let table = two_weeks();
        let working = WorkingTable::new(&table);
        let diff = working.diff_against(
            &table,
            &window("20230403", "20230410"),
            &advanced("20230410", "20230417", &["AA"]),
        );

        assert!(diff.added.iter().all(|l| l.airline().as_str() == "AA"));
        // BA's baseline leg has no AA counterpart either way.
        assert!(diff.removed.iter().any(|l| l.airline().as_str() == "BA"));
    }

    #[test]
    fn baseline_reads_current_working_table() {
        let table = two_weeks();
        let mut working = WorkingTable::new(&table);
        working.filter_by_airline(&[airline("BA")].into_iter().collect());

        let diff = working.diff_against(
            &table,
            &window("20230403", "20230410"),
            &advanced("20230410", "20230417", &["AA", "BA"]),
        );

        // AA legs are not in the baseline, so every AA comparison leg is new.
        assert_eq!(
            diff.added.iter().filter(|l| l.airline().as_str() == "AA").count(),
            2
        );
        assert_eq!(diff.removed.len(), 1);
    }

    #[test]
    fn identical_periods_have_no_changes() {
        let table = two_weeks();
        let mut working = WorkingTable::new(&table);
        let primary = window("20230403", "20230410");
        working.filter_by_time(&primary);

        let diff = working.diff_against(
            &table,
            &primary,
            &AdvancedQuery {
                window: primary,
                airlines: [airline("AA"), airline("BA")].into_iter().collect(),
                changes: ChangeMode::Both,
            },
        );
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn key_ignores_date() {
        let a = leg_on("20230403", "AA", "KJFK", "KLAX", "0800", 360);
        let b = leg_on("20230410", "AA", "KJFK", "KLAX", "0800", 300);
        let c = leg_on("20230411", "AA", "KJFK", "KLAX", "0800", 360);
        assert_eq!(ServiceKey::of(&a), ServiceKey::of(&b));
        assert_ne!(ServiceKey::of(&a), ServiceKey::of(&c)); // different weekday
    }
}
