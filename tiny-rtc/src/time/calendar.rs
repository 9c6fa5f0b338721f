//! Civil calendar arithmetic for the years 2000 through 2099.
//!
//! Leap years follow the plain `year % 4 == 0` rule. The Gregorian century
//! exception is not implemented: the first year it would affect is 2100,
//! which is outside the supported range, and applying it would change the
//! results for dates this module never supported anyway.
//!
//! Nothing here validates its inputs. Out-of-range fields produce
//! meaningless results, never a panic.

/// Seconds between 1970-01-01T00:00:00Z and 2000-01-01T00:00:00Z.
pub const SECONDS_FROM_1970_TO_2000: u32 = 946_684_800;

/// Seconds in one civil day.
pub const SECONDS_PER_DAY: u32 = 86_400;

// Days per month, January first. February is the non-leap length.
pub(crate) const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Returns whether `year_offset` (years since 2000) is a leap year.
pub(crate) const fn is_leap_year(year_offset: u16) -> bool {
    year_offset % 4 == 0
}

/// Number of days in `month` (1-12) of the year `year_offset` years after 2000.
///
/// Returns 0 for a month outside 1-12.
pub(crate) const fn days_in_month(year_offset: u16, month: u8) -> u8 {
    if month < 1 || month > 12 {
        return 0;
    }
    if month == 2 && is_leap_year(year_offset) {
        29
    } else {
        DAYS_IN_MONTH[(month - 1) as usize]
    }
}

/// Days elapsed since 2000-01-01 for the given civil date.
///
/// `year` may be given either as a full year (`2021`) or as an offset from
/// 2000 (`21`).
pub const fn days_since_2000(year: u16, month: u8, day: u8) -> u16 {
    let year = if year >= 2000 { year - 2000 } else { year };

    let mut days = day as u16;
    let mut i = 1;
    while i < month && i <= 12 {
        days = days.wrapping_add(DAYS_IN_MONTH[(i - 1) as usize] as u16);
        i += 1;
    }
    if month > 2 && is_leap_year(year) {
        days = days.wrapping_add(1);
    }

    days.wrapping_add(year.wrapping_mul(365))
        .wrapping_add(year.wrapping_add(3) / 4)
        .wrapping_sub(1)
}

/// Converts a day count plus a time of day into a count of seconds.
pub const fn to_seconds(days: u16, hour: u8, minute: u8, second: u8) -> u32 {
    (days as u32)
        .wrapping_mul(24)
        .wrapping_add(hour as u32)
        .wrapping_mul(60)
        .wrapping_add(minute as u32)
        .wrapping_mul(60)
        .wrapping_add(second as u32)
}

/// Decodes a packed BCD byte (tens in the high nibble, ones in the low nibble).
pub const fn bcd_to_bin(val: u8) -> u8 {
    val - 6 * (val >> 4)
}

/// Encodes a binary value as packed BCD.
pub const fn bin_to_bcd(val: u8) -> u8 {
    val.wrapping_add(6u8.wrapping_mul(val / 10))
}
