//! Local wall-clock start times.
//!
//! Start dates are floating local times: no timezone is stored, and inputs
//! carrying an offset are converted to the local zone once, at parse time.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, Timelike,
};
use serde::{Deserialize, Serialize};

use crate::error::{DaybookError, DaybookResult};

/// Fixed-width storage format. Lexicographic order of the rendered strings is
/// chronological order.
const STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Fractional-second digits kept; matches `STORAGE_FORMAT`.
const SUBSEC_DIGITS: u16 = 3;

/// Accepted offset-less input formats. `%.f` also matches a missing fraction.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// The start of an event, in local time, to millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StartDate(NaiveDateTime);

impl StartDate {
    /// Parse an ISO-8601 date-time.
    ///
    /// Accepts `YYYY-MM-DDTHH:MM[:SS[.fff]]` (a space may replace the `T`) as
    /// local time, or an RFC 3339 string with `Z`/offset, which is converted
    /// to local time.
    pub fn parse(input: &str) -> DaybookResult<Self> {
        let trimmed = input.trim();

        for format in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(StartDate::from_naive(dt));
            }
        }

        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| StartDate::from_naive(dt.with_timezone(&Local).naive_local()))
            .map_err(|_| DaybookError::InvalidStartDate(input.to_string()))
    }

    /// Sub-millisecond digits are dropped so the value survives a save and
    /// reload unchanged.
    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        StartDate(datetime.trunc_subsecs(SUBSEC_DIGITS))
    }

    /// `now` rounded up to the next multiple of `step_mins` past midnight.
    /// Times already on a boundary (with zero seconds) are kept.
    pub fn rounded_up(now: NaiveDateTime, step_mins: u32) -> Self {
        let step_secs = i64::from(step_mins.max(1)) * 60;
        let secs = i64::from(now.time().num_seconds_from_midnight());
        let on_boundary = secs % step_secs == 0 && now.nanosecond() == 0;

        let midnight = now.date().and_time(NaiveTime::MIN);
        let steps = if on_boundary {
            secs / step_secs
        } else {
            secs / step_secs + 1
        };

        StartDate(midnight + Duration::seconds(steps * step_secs))
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    /// End of an event starting here and lasting `duration_mins`.
    pub fn end_after(&self, duration_mins: u32) -> NaiveDateTime {
        self.0 + Duration::minutes(i64::from(duration_mins))
    }

    /// 12-hour clock label, e.g. `9:05AM` or `12:30PM`.
    pub fn time_label(&self) -> String {
        let hours = self.0.hour();
        let display_hours = if hours % 12 == 0 { 12 } else { hours % 12 };
        let meridiem = if hours >= 12 { "PM" } else { "AM" };

        format!("{}:{:02}{}", display_hours, self.0.minute(), meridiem)
    }
}

impl fmt::Display for StartDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(STORAGE_FORMAT))
    }
}

impl FromStr for StartDate {
    type Err = DaybookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StartDate::parse(s)
    }
}

impl TryFrom<String> for StartDate {
    type Error = DaybookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StartDate::parse(&value)
    }
}

impl From<StartDate> for String {
    fn from(value: StartDate) -> Self {
        value.to_string()
    }
}

impl From<NaiveDateTime> for StartDate {
    fn from(value: NaiveDateTime) -> Self {
        StartDate::from_naive(value)
    }
}
