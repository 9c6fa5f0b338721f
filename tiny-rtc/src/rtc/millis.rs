//! Software clock derived from a millisecond counter.

use core::convert::Infallible;

use crate::time::{ClockSource, DateTime};

/// A free-running count of milliseconds since start-up that wraps on overflow.
pub trait MillisCounter {
    /// Returns the current count.
    fn millis(&self) -> u32;
}

impl<F: Fn() -> u32> MillisCounter for F {
    fn millis(&self) -> u32 {
        self()
    }
}

/// A clock that keeps time as a fixed offset from a millisecond counter.
///
/// Until the first [`ClockSource::adjust`] the offset is 0, so [`ClockSource::now`]
/// reports the counter's whole seconds read as Unix time.
///
/// The clock drifts with the counter and is never corrected. When the counter
/// wraps (about every 49.7 days for a `u32`), the reported time jumps back by
/// the counter's period.
pub struct SoftwareClock<M> {
    millis: M,
    offset: i32,
}

impl<M: MillisCounter> SoftwareClock<M> {
    /// Creates a clock reading `millis`, with a zero offset.
    pub const fn new(millis: M) -> Self {
        SoftwareClock { millis, offset: 0 }
    }

    /// Seconds added to the counter's whole seconds to produce Unix time.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    fn elapsed_seconds(&self) -> i32 {
        (self.millis.millis() / 1000) as i32
    }
}

impl<M: MillisCounter> ClockSource for SoftwareClock<M> {
    type Error = Infallible;

    fn now(&mut self) -> Result<DateTime, Infallible> {
        let unixtime = self.offset.wrapping_add(self.elapsed_seconds());
        Ok(DateTime::from_unixtime(unixtime as u32))
    }

    fn adjust(&mut self, datetime: &DateTime) -> Result<(), Infallible> {
        self.offset = (datetime.unixtime() as i32).wrapping_sub(self.elapsed_seconds());
        debug!("software clock: offset set to {}", self.offset);
        Ok(())
    }

    const MAX_RESOLUTION_HZ: u32 = 1;
}
