//! Compact date/time value covering 2000-01-01 through 2099-12-31.

use core::fmt;

#[cfg(feature = "chrono")]
use chrono::{Datelike, Timelike};

use super::calendar::{self, SECONDS_FROM_1970_TO_2000};

/// Represents errors that can occur when constructing a checked [`DateTime`].
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum DateTimeError {
    /// The year is outside 2000-2099.
    Year,
    /// The month is invalid.
    Month,
    /// The day is invalid for the month.
    Day,
    /// The hour is invalid.
    Hour,
    /// The minute is invalid.
    Minute,
    /// The second is invalid.
    Second,
}

impl fmt::Display for DateTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year => write!(f, "year must be within 2000-2099"),
            Self::Month => write!(f, "month must be within 1-12"),
            Self::Day => write!(f, "day is out of range for the month"),
            Self::Hour => write!(f, "hour must be within 0-23"),
            Self::Minute => write!(f, "minute must be within 0-59"),
            Self::Second => write!(f, "second must be within 0-59"),
        }
    }
}

/// Represents errors that can occur when parsing date and time text.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum ParseError {
    /// The date text is not exactly 11 bytes (`"Mon DD YYYY"`).
    DateLength,
    /// The time text is not exactly 8 bytes (`"HH:MM:SS"`).
    TimeLength,
    /// The date text does not start with a known month abbreviation.
    Month,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateLength => write!(f, "date must be formatted as \"Mon DD YYYY\""),
            Self::TimeLength => write!(f, "time must be formatted as \"HH:MM:SS\""),
            Self::Month => write!(f, "unknown month abbreviation"),
        }
    }
}

/// A calendar instant between 2000-01-01 00:00:00 and 2099-12-31 23:59:59.
///
/// Fields are stored as given and are not validated by [`DateTime::new`];
/// callers must supply real civil dates or use [`DateTime::try_new`].
/// Does not support time zones or leap seconds.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct DateTime {
    year_offset: u8,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl Default for DateTime {
    fn default() -> Self {
        DateTime::new(2000, 1, 1, 0, 0, 0)
    }
}

impl DateTime {
    /// Builds a datetime from seconds since 1970-01-01 00:00:00.
    ///
    /// Instants before 2000 are not representable and wrap around.
    pub const fn from_unixtime(secs: u32) -> DateTime {
        // Rebase onto 2000-01-01.
        let mut t = secs.wrapping_sub(SECONDS_FROM_1970_TO_2000);

        let second = (t % 60) as u8;
        t /= 60;
        let minute = (t % 60) as u8;
        t /= 60;
        let hour = (t % 24) as u8;
        let mut days = t / 24;

        let mut year_offset: u16 = 0;
        loop {
            let year_len = if calendar::is_leap_year(year_offset) { 366 } else { 365 };
            if days < year_len {
                break;
            }
            days -= year_len;
            year_offset += 1;
        }

        let mut month = 1;
        loop {
            let month_len = calendar::days_in_month(year_offset, month) as u32;
            if days < month_len {
                break;
            }
            days -= month_len;
            month += 1;
        }

        DateTime {
            year_offset: year_offset as u8,
            month,
            day: days as u8 + 1,
            hour,
            minute,
            second,
        }
    }

    /// Creates a `DateTime` from the given components without validating them.
    ///
    /// `year` may be a full year (`2021`) or an offset from 2000 (`21`).
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> DateTime {
        let year = if year >= 2000 { year - 2000 } else { year };
        DateTime {
            year_offset: year as u8,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Creates a `DateTime` from the given components, rejecting anything that
    /// is not a real civil date and time within 2000-2099.
    pub const fn try_new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<DateTime, DateTimeError> {
        if year < 2000 || year > 2099 {
            return Err(DateTimeError::Year);
        }

        if month < 1 || month > 12 {
            return Err(DateTimeError::Month);
        }

        if day < 1 || day > calendar::days_in_month(year - 2000, month) {
            return Err(DateTimeError::Day);
        }

        if hour > 23 {
            return Err(DateTimeError::Hour);
        }

        if minute > 59 {
            return Err(DateTimeError::Minute);
        }

        if second > 59 {
            return Err(DateTimeError::Second);
        }

        Ok(DateTime::new(year, month, day, hour, minute, second))
    }

    /// Builds a datetime from a `"Mon DD YYYY"` date and a `"HH:MM:SS"` time,
    /// the layout compilers use for their build date and time.
    ///
    /// A space in place of the leading day digit (`"Jan  2 2021"`) is accepted.
    /// An unknown month abbreviation yields month 0.
    pub const fn from_compile_time(date: &[u8; 11], time: &[u8; 8]) -> DateTime {
        DateTime {
            year_offset: two_digits(date, 9),
            month: match month_from_abbreviation(date) {
                Some(month) => month,
                None => 0,
            },
            day: two_digits(date, 4),
            hour: two_digits(time, 0),
            minute: two_digits(time, 3),
            second: two_digits(time, 6),
        }
    }

    /// Like [`DateTime::from_compile_time`], but takes string slices and
    /// rejects text of the wrong length or with an unknown month.
    pub fn parse(date: &str, time: &str) -> Result<DateTime, ParseError> {
        let date: &[u8; 11] = date.as_bytes().try_into().map_err(|_| ParseError::DateLength)?;
        let time: &[u8; 8] = time.as_bytes().try_into().map_err(|_| ParseError::TimeLength)?;
        if month_from_abbreviation(date).is_none() {
            return Err(ParseError::Month);
        }
        Ok(DateTime::from_compile_time(date, time))
    }

    /// Returns the year (2000-2099).
    pub const fn year(&self) -> u16 {
        2000 + self.year_offset as u16
    }
    /// Returns the month (1-12).
    pub const fn month(&self) -> u8 {
        self.month
    }
    /// Returns the day of the month (1-31).
    pub const fn day(&self) -> u8 {
        self.day
    }
    /// Returns the hour (0-23).
    pub const fn hour(&self) -> u8 {
        self.hour
    }
    /// Returns the minute (0-59).
    pub const fn minute(&self) -> u8 {
        self.minute
    }
    /// Returns the second (0-59).
    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Returns the day of the week, 0 = Sunday through 6 = Saturday.
    pub const fn day_of_week(&self) -> u8 {
        let days = calendar::days_since_2000(self.year_offset as u16, self.month, self.day);
        // 2000-01-01 was a Saturday.
        (days.wrapping_add(6) % 7) as u8
    }

    /// Returns seconds since 1970-01-01 00:00:00, ignoring leap seconds.
    pub const fn unixtime(&self) -> u32 {
        let days = calendar::days_since_2000(self.year_offset as u16, self.month, self.day);
        calendar::to_seconds(days, self.hour, self.minute, self.second).wrapping_add(SECONDS_FROM_1970_TO_2000)
    }
}

impl From<u32> for DateTime {
    fn from(secs: u32) -> Self {
        DateTime::from_unixtime(secs)
    }
}

impl From<DateTime> for u32 {
    fn from(date_time: DateTime) -> Self {
        date_time.unixtime()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year(),
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second
        )
    }
}

/// Reads the two ASCII digits at `at`. A non-digit tens character counts as 0.
const fn two_digits(text: &[u8], at: usize) -> u8 {
    let tens = text[at];
    let tens = if tens.is_ascii_digit() { tens - b'0' } else { 0 };
    (10 * tens).wrapping_add(text[at + 1].wrapping_sub(b'0'))
}

// The order of these checks matters: J, A and M are shared by several months.
const fn month_from_abbreviation(date: &[u8; 11]) -> Option<u8> {
    let month = match date[0] {
        b'J' => {
            if date[1] == b'a' {
                1
            } else if date[2] == b'n' {
                6
            } else {
                7
            }
        }
        b'F' => 2,
        b'A' => {
            if date[2] == b'r' {
                4
            } else {
                8
            }
        }
        b'M' => {
            if date[2] == b'r' {
                3
            } else {
                5
            }
        }
        b'S' => 9,
        b'O' => 10,
        b'N' => 11,
        b'D' => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(feature = "chrono")]
impl TryFrom<chrono::NaiveDateTime> for DateTime {
    type Error = DateTimeError;

    fn try_from(date_time: chrono::NaiveDateTime) -> Result<DateTime, DateTimeError> {
        if !(2000..=2099).contains(&date_time.year()) {
            return Err(DateTimeError::Year);
        }

        // chrono folds a leap second into the nanosecond field, so the second
        // itself is always 0-59 and the leap second is dropped here.
        DateTime::try_new(
            date_time.year() as u16,
            date_time.month() as u8,
            date_time.day() as u8,
            date_time.hour() as u8,
            date_time.minute() as u8,
            date_time.second() as u8,
        )
    }
}

#[cfg(feature = "chrono")]
impl TryFrom<DateTime> for chrono::NaiveDateTime {
    type Error = DateTimeError;

    fn try_from(date_time: DateTime) -> Result<chrono::NaiveDateTime, DateTimeError> {
        chrono::NaiveDate::from_ymd_opt(
            date_time.year() as i32,
            date_time.month() as u32,
            date_time.day() as u32,
        )
        .ok_or(DateTimeError::Day)?
        .and_hms_opt(
            date_time.hour() as u32,
            date_time.minute() as u32,
            date_time.second() as u32,
        )
        .ok_or(DateTimeError::Second)
    }
}
