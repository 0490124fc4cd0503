//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from load/API errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Departure plus elapsed time does not fit in the calendar
    #[error("arrival time out of range for flight departing {0}")]
    ArrivalOutOfRange(chrono::NaiveDateTime),
}
