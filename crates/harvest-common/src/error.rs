//! Error types for the shared value types.

use thiserror::Error;

/// Region bounds that cannot describe a selection on the globe.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundsError {
    #[error("latitude {name} = {value} is outside [-90, 90]")]
    LatitudeOutOfRange { name: &'static str, value: f64 },

    #[error("longitude {name} = {value} is outside [0, 360]")]
    LongitudeOutOfRange { name: &'static str, value: f64 },

    #[error("min_lat ({min_lat}) must not exceed max_lat ({max_lat})")]
    InvertedLatitudes { min_lat: f64, max_lat: f64 },

    #[error("bound {0} is not a finite number")]
    NotFinite(&'static str),
}

/// A time axis that cannot be decoded or aggregated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimeAxisError {
    #[error("Invalid time units: '{0}'")]
    InvalidUnits(String),

    #[error("Unsupported calendar: '{0}'")]
    UnsupportedCalendar(String),

    #[error("Time value {0} cannot be represented as a date")]
    OutOfRange(f64),

    #[error("Time axis is empty")]
    Empty,

    #[error("Time axis is not sorted ascending at position {0}")]
    Unsorted(usize),
}

/// An enumerated configuration keyword that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a supported {kind}; expected one of: {expected}")]
pub struct ParseKindError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}
