//! Access to background-forecast (BFG) datasets.
//!
//! A forecast run writes one file per forecast hour. This crate reads
//! variables with their attributes from those files and joins several files
//! into one time series.
//!
//! # Backends
//!
//! - [`MemoryOpener`]: in-memory files for synthetic data and tests
//! - `NetCdfOpener`: NetCDF-4 files on disk (cargo feature `netcdf`)
//!
//! # Example
//!
//! ```
//! use bfg_dataset::{Field, MemoryFile, MemoryOpener, MfDataset};
//!
//! let field = Field::new("tmp2m", &["time", "grid_yt", "grid_xt"], &[1, 1, 2], vec![280.0, 290.0])
//!     .unwrap()
//!     .with_attribute("units", "K");
//! let opener = MemoryOpener::new()
//!     .with_file(MemoryFile::new("a.nc").with_field(field.clone()))
//!     .with_file(MemoryFile::new("b.nc").with_field(field));
//!
//! let dataset = MfDataset::open(&opener, &["a.nc", "b.nc"]).unwrap();
//! assert_eq!(dataset.field("tmp2m").unwrap().shape, vec![2, 1, 2]);
//! ```

pub mod error;
pub mod field;
pub mod file;
pub mod memory;
pub mod mfdataset;

#[cfg(feature = "netcdf")]
pub mod native;

pub use error::{DatasetError, DatasetResult};
pub use field::{AttrValue, Field, TIME_DIM};
pub use file::{DatasetOpener, ForecastFile};
pub use memory::{MemoryFile, MemoryOpener};
pub use mfdataset::MfDataset;

#[cfg(feature = "netcdf")]
pub use native::{silence_hdf5_errors, NetCdfFile, NetCdfOpener};
