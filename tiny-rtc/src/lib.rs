#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible in the modules below.
#[macro_use]
mod fmt;

pub mod time;

/// Clock sources backed by a DS1307 chip or by a millisecond counter.
pub mod rtc;
