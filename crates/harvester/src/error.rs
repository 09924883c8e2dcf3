//! Error types for harvesting.

use bfg_dataset::DatasetError;
use harvest_common::{ParseKindError, TimeAxisError};
use thiserror::Error;

/// Errors that abort a harvest call.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// The harvest configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A field needed to produce a variable is not in the dataset.
    #[error("variable '{variable}' requires field '{field}', which is not in the dataset")]
    MissingRequiredField { variable: String, field: String },

    /// A region's latitude band contains no grid row.
    #[error("region '{region}' selects no grid rows between latitudes {min_lat} and {max_lat}")]
    EmptyRegion {
        region: String,
        min_lat: f64,
        max_lat: f64,
    },

    /// Area weights of a selection do not add up to the expected solid angle.
    #[error(
        "weights of {selection} imply a total of {implied} sr, \
         more than {tolerance} (relative) away from 4π sr"
    )]
    WeightConservation {
        selection: String,
        implied: f64,
        tolerance: f64,
    },

    /// No valid value is left to compute a statistic from.
    #[error("no valid data for {statistic} of '{variable}' in region '{region}'")]
    InsufficientData {
        variable: String,
        region: String,
        statistic: String,
    },

    /// The forecast grid does not match the grid geometry.
    #[error("grid mismatch: {0}")]
    GridMismatch(String),

    /// The time axis cannot be aggregated.
    #[error("time axis error: {0}")]
    TimeAxis(#[from] TimeAxisError),

    /// Reading the dataset failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl HarvestError {
    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a MissingRequiredField error.
    pub fn missing_field(variable: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            variable: variable.into(),
            field: field.into(),
        }
    }

    /// Create an InsufficientData error.
    pub fn insufficient_data(
        variable: impl Into<String>,
        region: impl Into<String>,
        statistic: impl ToString,
    ) -> Self {
        Self::InsufficientData {
            variable: variable.into(),
            region: region.into(),
            statistic: statistic.to_string(),
        }
    }

    /// Create a GridMismatch error.
    pub fn grid_mismatch(msg: impl Into<String>) -> Self {
        Self::GridMismatch(msg.into())
    }
}

impl From<ParseKindError> for HarvestError {
    fn from(err: ParseKindError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Result type for harvest operations.
pub type Result<T> = std::result::Result<T, HarvestError>;
