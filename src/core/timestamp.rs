//! Wall-clock timestamps for log lines
//!
//! Lines carry a fixed-width `HH:MM:SS.mmm` stamp. The digits are produced
//! with integer arithmetic straight into the line buffer, so the time portion
//! of a line never allocates and never depends on locale settings.

use chrono::{Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Which clock the timestamp is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clock {
    /// Host local time
    #[default]
    Local,
    /// Coordinated universal time
    Utc,
}

impl Clock {
    /// Read the current time of day
    pub fn now(&self) -> ClockTime {
        match self {
            Clock::Local => ClockTime::from_timelike(&Local::now()),
            Clock::Utc => ClockTime::from_timelike(&Utc::now()),
        }
    }
}

/// Time of day with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl ClockTime {
    pub const fn new(hour: u32, minute: u32, second: u32, millisecond: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
        }
    }

    /// Truncate a chrono time to milliseconds
    ///
    /// chrono reports a leap second as a nanosecond value past 1e9; it is
    /// clamped so the field stays three digits wide.
    pub fn from_timelike<T: Timelike>(time: &T) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
            second: time.second(),
            millisecond: (time.nanosecond() / 1_000_000).min(999),
        }
    }

    /// Append `HH:MM:SS.mmm` to `buf`
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        append2(buf, self.hour);
        buf.push(b':');
        append2(buf, self.minute);
        buf.push(b':');
        append2(buf, self.second);
        buf.push(b'.');
        append3(buf, self.millisecond);
    }
}

#[inline]
fn append2(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&[b'0' + (v / 10 % 10) as u8, b'0' + (v % 10) as u8]);
}

#[inline]
fn append3(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&[
        b'0' + (v / 100 % 10) as u8,
        b'0' + (v / 10 % 10) as u8,
        b'0' + (v % 10) as u8,
    ]);
}
