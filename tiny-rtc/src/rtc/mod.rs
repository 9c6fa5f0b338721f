/// DS1307 real-time clock on an I2C bus.
mod ds1307;
pub use ds1307::{Ds1307, Ds1307Error, DS1307_ADDRESS};

/// Software clock driven by a free-running millisecond counter.
mod millis;
pub use millis::{MillisCounter, SoftwareClock};
