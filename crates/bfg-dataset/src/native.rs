//! NetCDF backend using the native netcdf library.
//!
//! Forecast and grid-geometry files are NetCDF-4 (HDF5) files. Values are read
//! as `f64`; `scale_factor`/`add_offset` are applied to every value that is not
//! the declared `_FillValue`, so fill detection keeps working on unpacked data.

use std::path::{Path, PathBuf};
use std::sync::Once;

use netcdf::AttributeValue;

use crate::error::{DatasetError, DatasetResult};
use crate::field::{AttrValue, Field};
use crate::file::{DatasetOpener, ForecastFile};

/// Silence HDF5's automatic error printing to stderr.
///
/// HDF5 reports every failed lookup of an optional attribute on stderr even
/// though the error is handled here. Safe to call more than once.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and null handlers are a documented
        // way of disabling automatic error output.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Opens forecast files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetCdfOpener;

impl DatasetOpener for NetCdfOpener {
    type File = NetCdfFile;

    fn open(&self, path: &Path) -> DatasetResult<NetCdfFile> {
        silence_hdf5_errors();

        if !path.exists() {
            return Err(DatasetError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )));
        }

        let file = netcdf::open(path).map_err(|e| {
            DatasetError::InvalidFormat(format!("Failed to open {}: {}", path.display(), e))
        })?;

        Ok(NetCdfFile {
            path: path.to_path_buf(),
            file,
        })
    }
}

/// An open NetCDF forecast file. The handle is closed on drop.
pub struct NetCdfFile {
    path: PathBuf,
    file: netcdf::File,
}

impl ForecastFile for NetCdfFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    fn read_field(&self, name: &str) -> DatasetResult<Field> {
        let var = self
            .file
            .variable(name)
            .ok_or_else(|| DatasetError::missing_variable(name, &self.path))?;

        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

        let raw: Vec<f64> = var.get_values(..).map_err(|e| {
            DatasetError::InvalidFormat(format!(
                "Failed to read '{}' from {}: {}",
                name,
                self.path.display(),
                e
            ))
        })?;

        let scale_factor = get_f64_attr(&var, "scale_factor").unwrap_or(1.0);
        let add_offset = get_f64_attr(&var, "add_offset").unwrap_or(0.0);
        let fill_value = get_f64_attr(&var, "_FillValue");

        let values = if scale_factor != 1.0 || add_offset != 0.0 {
            raw.into_iter()
                .map(|v| {
                    if Some(v) == fill_value {
                        v
                    } else {
                        v * scale_factor + add_offset
                    }
                })
                .collect()
        } else {
            raw
        };

        let dim_refs: Vec<&str> = dims.iter().map(String::as_str).collect();
        let mut field = Field::new(name, &dim_refs, &shape, values)?;
        for attr in var.attributes() {
            let key = attr.name().to_string();
            if let Some(value) = attr.value().ok().and_then(convert_attr) {
                field.attributes.insert(key, value);
            }
        }

        Ok(field)
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

/// Text and scalar numeric attributes are kept; array-valued ones are skipped.
fn convert_attr(value: AttributeValue) -> Option<AttrValue> {
    match value {
        AttributeValue::Str(s) => Some(AttrValue::Text(s)),
        other => f64::try_from(other).ok().map(AttrValue::Number),
    }
}
