//! In-memory forecast files.
//!
//! Used for synthetic datasets and for exercising the harvest pipeline without
//! a NetCDF installation.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{DatasetError, DatasetResult};
use crate::field::Field;
use crate::file::{DatasetOpener, ForecastFile};

/// A forecast file held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    path: PathBuf,
    fields: BTreeMap<String, Field>,
}

impl MemoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add (or replace) a field.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Field> {
        self.fields.remove(name)
    }
}

impl ForecastFile for MemoryFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn variable_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    fn has_variable(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn read_field(&self, name: &str) -> DatasetResult<Field> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| DatasetError::missing_variable(name, &self.path))
    }
}

/// Opener over a fixed set of in-memory files, keyed by path.
///
/// Counts every successful and failed open so callers can check whether any
/// file access happened.
#[derive(Debug, Default)]
pub struct MemoryOpener {
    files: HashMap<PathBuf, MemoryFile>,
    opens: AtomicUsize,
}

impl MemoryOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file: MemoryFile) -> Self {
        self.insert(file);
        self
    }

    pub fn insert(&mut self, file: MemoryFile) {
        self.files.insert(file.path.clone(), file);
    }

    /// Number of `open` calls made so far.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl DatasetOpener for MemoryOpener {
    type File = MemoryFile;

    fn open(&self, path: &Path) -> DatasetResult<MemoryFile> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.files.get(path).cloned().ok_or_else(|| {
            DatasetError::IoError(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_counts_attempts() {
        let opener = MemoryOpener::new().with_file(MemoryFile::new("a.nc"));
        assert_eq!(opener.open_count(), 0);
        assert!(opener.open(Path::new("a.nc")).is_ok());
        assert!(matches!(
            opener.open(Path::new("b.nc")),
            Err(DatasetError::IoError(_))
        ));
        assert_eq!(opener.open_count(), 2);
    }

    #[test]
    fn test_missing_field_names_file() {
        let file = MemoryFile::new("bfg_2022010100_fhr03.nc");
        let err = file.read_field("tmp2m").unwrap_err();
        assert!(err.to_string().contains("tmp2m"));
        assert!(err.to_string().contains("bfg_2022010100_fhr03.nc"));
    }
}
