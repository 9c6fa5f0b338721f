//! Trait for wall-clock sources (e.g. real-time clocks).

use crate::time::DateTime;

/// A source of the current wall-clock date and time.
///
/// Both operations may be called in any order and any number of times.
/// Implementations do not cache: every [`ClockSource::now`] reads the
/// underlying clock again.
pub trait ClockSource {
    /// Error reported by the underlying clock.
    type Error;

    /// Returns the current date and time.
    fn now(&mut self) -> Result<DateTime, Self::Error>;

    /// Sets the current date and time.
    fn adjust(&mut self, datetime: &DateTime) -> Result<(), Self::Error>;

    /// The resolution of the clock in Hz.
    const MAX_RESOLUTION_HZ: u32;
}

impl<T: ClockSource + ?Sized> ClockSource for &mut T {
    type Error = T::Error;

    fn now(&mut self) -> Result<DateTime, Self::Error> {
        T::now(self)
    }

    fn adjust(&mut self, datetime: &DateTime) -> Result<(), Self::Error> {
        T::adjust(self, datetime)
    }

    const MAX_RESOLUTION_HZ: u32 = T::MAX_RESOLUTION_HZ;
}
