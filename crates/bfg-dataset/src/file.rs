//! Storage-agnostic access to a single forecast file.

use std::path::Path;

use chrono::{DateTime, Utc};
use harvest_common::TimeUnits;

use crate::error::{DatasetError, DatasetResult};
use crate::field::{Field, TIME_DIM};

/// One open forecast file.
///
/// Implementations hold whatever handle the storage backend needs; dropping
/// the value releases it.
pub trait ForecastFile {
    /// Path the file was opened from.
    fn path(&self) -> &Path;

    /// Names of all variables in the file.
    fn variable_names(&self) -> Vec<String>;

    fn has_variable(&self, name: &str) -> bool {
        self.variable_names().iter().any(|n| n == name)
    }

    /// Read a variable with all of its attributes.
    fn read_field(&self, name: &str) -> DatasetResult<Field>;

    /// Decode the `time` coordinate using its CF `units` and `calendar` attributes.
    fn read_times(&self) -> DatasetResult<Vec<DateTime<Utc>>> {
        let time = self.read_field(TIME_DIM)?;
        let units = time.units().ok_or_else(|| {
            DatasetError::invalid_format(format!(
                "time coordinate in {} has no units attribute",
                self.path().display()
            ))
        })?;
        let units = TimeUnits::parse(units, time.text_attribute("calendar"))?;
        Ok(units.decode_all(&time.values)?)
    }
}

/// Opens forecast files from paths.
pub trait DatasetOpener {
    type File: ForecastFile;

    fn open(&self, path: &Path) -> DatasetResult<Self::File>;
}
