//! CF-convention time axis handling.
//!
//! Forecast files store time as numeric offsets with a units string such as
//! `"hours since 1994-01-01 00:00:00"`. This module converts between those
//! offsets and UTC timestamps.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimeAxisError;

/// Units of the numeric time scale used for temporal aggregation.
pub const HOURS_EPOCH: &str = "hours since 1951-01-01 00:00:00";

const MILLIS_PER_SECOND: f64 = 1_000.0;

/// Days from 1951-01-01 to the Unix epoch.
const HOURS_EPOCH_DAYS_BEFORE_UNIX: i64 = 6_940;

/// Step of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeStep {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeStep {
    fn seconds(&self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3_600.0,
            Self::Days => 86_400.0,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(Self::Seconds),
            "min" | "mins" | "minute" | "minutes" => Some(Self::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(Self::Hours),
            "d" | "day" | "days" => Some(Self::Days),
            _ => None,
        }
    }
}

/// Calendars accepted on a forecast time axis.
///
/// `Julian` axes are decoded as Gregorian. Offsets from a reference date only
/// differ between the two calendars across non-leap century years, so the
/// decoding is exact for dates between 1901 and 2099.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Calendar {
    #[default]
    Standard,
    ProlepticGregorian,
    Julian,
}

impl Calendar {
    pub fn parse(s: &str) -> Result<Self, TimeAxisError> {
        match s.trim().to_lowercase().as_str() {
            "" | "standard" | "gregorian" => Ok(Self::Standard),
            "proleptic_gregorian" => Ok(Self::ProlepticGregorian),
            "julian" => Ok(Self::Julian),
            other => Err(TimeAxisError::UnsupportedCalendar(other.to_string())),
        }
    }
}

/// Parsed `"<step> since <reference>"` units of a time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    pub step: TimeStep,
    pub reference: DateTime<Utc>,
    pub calendar: Calendar,
}

impl TimeUnits {
    /// Parse a CF units string, e.g. `"hours since 1994-01-01 00:00:00"`.
    pub fn parse(units: &str, calendar: Option<&str>) -> Result<Self, TimeAxisError> {
        let invalid = || TimeAxisError::InvalidUnits(units.to_string());

        let (step, reference) = units.trim().split_once(" since ").ok_or_else(invalid)?;
        let step = TimeStep::parse(step.trim()).ok_or_else(invalid)?;
        let reference = parse_reference(reference.trim()).ok_or_else(invalid)?;
        let calendar = match calendar {
            Some(name) => Calendar::parse(name)?,
            None => Calendar::default(),
        };

        Ok(Self {
            step,
            reference,
            calendar,
        })
    }

    /// The aggregation scale: hours since 1951-01-01 00:00:00 UTC.
    pub fn hours_epoch() -> Self {
        Self {
            step: TimeStep::Hours,
            reference: DateTime::UNIX_EPOCH - Duration::days(HOURS_EPOCH_DAYS_BEFORE_UNIX),
            calendar: Calendar::Standard,
        }
    }

    /// Convert a numeric offset into a timestamp (millisecond precision).
    pub fn decode(&self, value: f64) -> Result<DateTime<Utc>, TimeAxisError> {
        if !value.is_finite() {
            return Err(TimeAxisError::OutOfRange(value));
        }
        let millis = (value * self.step.seconds() * MILLIS_PER_SECOND).round();
        if millis.abs() > i64::MAX as f64 / 2.0 {
            return Err(TimeAxisError::OutOfRange(value));
        }
        self.reference
            .checked_add_signed(Duration::milliseconds(millis as i64))
            .ok_or(TimeAxisError::OutOfRange(value))
    }

    /// Convert a timestamp into a numeric offset on this axis.
    pub fn encode(&self, time: &DateTime<Utc>) -> f64 {
        let millis = (*time - self.reference).num_milliseconds() as f64;
        millis / MILLIS_PER_SECOND / self.step.seconds()
    }

    /// Decode a whole axis.
    pub fn decode_all(&self, values: &[f64]) -> Result<Vec<DateTime<Utc>>, TimeAxisError> {
        values.iter().map(|&v| self.decode(v)).collect()
    }
}

/// Parse the reference date of a units string.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, ISO 8601 with `T`, an optional trailing
/// `Z`/`UTC`, fractional seconds, and a bare date.
fn parse_reference(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let s = s
        .trim_end_matches(" UTC")
        .trim_end_matches('Z')
        .trim();

    for fmt in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}
