//! Several forecast files viewed as one time series.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{DatasetError, DatasetResult};
use crate::field::Field;
use crate::file::{DatasetOpener, ForecastFile};

/// Forecast files concatenated along time, in the order they were given.
///
/// Every file stays open for the lifetime of the dataset and is closed when it
/// is dropped.
pub struct MfDataset<F: ForecastFile> {
    files: Vec<F>,
}

impl<F: ForecastFile> MfDataset<F> {
    /// Open all `paths` with `opener`.
    ///
    /// Files opened before a failure are closed again before the error is
    /// returned.
    pub fn open<O, P>(opener: &O, paths: &[P]) -> DatasetResult<Self>
    where
        O: DatasetOpener<File = F>,
        P: AsRef<Path>,
    {
        if paths.is_empty() {
            return Err(DatasetError::NoFiles);
        }

        let files = paths
            .iter()
            .map(|p| opener.open(p.as_ref()))
            .collect::<DatasetResult<Vec<_>>>()?;

        debug!(files = files.len(), "Opened forecast files");
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths of the member files, in concatenation order.
    pub fn sources(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path().to_path_buf()).collect()
    }

    /// Whether every member file carries `name`.
    pub fn has_variable(&self, name: &str) -> bool {
        self.files.iter().all(|f| f.has_variable(name))
    }

    /// The concatenated time axis.
    pub fn times(&self) -> DatasetResult<Vec<DateTime<Utc>>> {
        let mut times = Vec::new();
        for file in &self.files {
            times.extend(file.read_times()?);
        }
        Ok(times)
    }

    /// Read `name` from every file and join the parts along time.
    pub fn field(&self, name: &str) -> DatasetResult<Field> {
        let parts = self
            .files
            .iter()
            .map(|f| {
                if f.has_variable(name) {
                    f.read_field(name)
                } else {
                    Err(DatasetError::missing_variable(name, f.path()))
                }
            })
            .collect::<DatasetResult<Vec<_>>>()?;
        Field::concat_time(parts)
    }
}
