/// Civil calendar arithmetic and BCD helpers.
pub mod calendar;

/// Implementation of a compact wall-clock date-time.
mod datetime;
pub use datetime::{DateTime, DateTimeError, ParseError};

/// Trait for a clock that can report and be set to a wall-clock date-time.
mod clock_source;
pub use clock_source::ClockSource;
