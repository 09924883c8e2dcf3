//! Grid geometry: coordinates and per-cell solid angles of the forecast grid.

use bfg_dataset::{Field, ForecastFile};
use tracing::debug;

use crate::config::HarvestSettings;
use crate::error::{HarvestError, Result};
use crate::stats::check_weight_conservation;

/// Latitude/longitude coordinates and per-cell solid-angle weights (sr).
///
/// Weights are stored row-major, `nlat` rows of `nlon` cells. A geometry is
/// only constructed when its weights sum to 4π within tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    lats: Vec<f64>,
    lons: Vec<f64>,
    weights: Vec<f64>,
}

impl GridGeometry {
    pub fn new(lats: Vec<f64>, lons: Vec<f64>, weights: Vec<f64>, tolerance: f64) -> Result<Self> {
        if lats.is_empty() || lons.is_empty() {
            return Err(HarvestError::grid_mismatch("grid has no rows or no columns"));
        }
        if weights.len() != lats.len() * lons.len() {
            return Err(HarvestError::grid_mismatch(format!(
                "{} weights for a {}x{} grid",
                weights.len(),
                lats.len(),
                lons.len()
            )));
        }

        let grid = Self {
            lats,
            lons,
            weights,
        };
        let total: f64 = grid.weights.iter().sum();
        check_weight_conservation("the full grid", total, grid.len(), grid.len(), tolerance)?;
        Ok(grid)
    }

    /// Read the geometry from a reference file.
    pub fn load<F: ForecastFile>(file: &F, settings: &HarvestSettings) -> Result<Self> {
        let lats = read_coordinate(file, &settings.lat_name)?;
        let lons = read_coordinate(file, &settings.lon_name)?;
        let weights = file.read_field(&settings.weight_name)?;

        if weights.plane_len() != lats.len() * lons.len() || weights.time_steps() != 1 {
            return Err(HarvestError::grid_mismatch(format!(
                "'{}' in {} has shape {:?}, expected [{}, {}]",
                settings.weight_name,
                file.path().display(),
                weights.shape,
                lats.len(),
                lons.len()
            )));
        }

        debug!(
            path = %file.path().display(),
            nlat = lats.len(),
            nlon = lons.len(),
            "Loaded grid geometry"
        );

        Self::new(lats, lons, weights.values, settings.conservation_tolerance)
    }

    pub fn nlat(&self) -> usize {
        self.lats.len()
    }

    pub fn nlon(&self) -> usize {
        self.lons.len()
    }

    /// Number of grid cells.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weights of the given flat cell indices.
    pub fn weights_at(&self, cells: &[usize]) -> Vec<f64> {
        cells.iter().map(|&c| self.weights[c]).collect()
    }

    /// Check that a field's (lat, lon) shape matches this grid.
    pub fn check_shape(&self, variable: &str, spatial_shape: &[usize]) -> Result<()> {
        if spatial_shape != [self.nlat(), self.nlon()] {
            return Err(HarvestError::grid_mismatch(format!(
                "'{}' has grid shape {:?}, grid geometry is [{}, {}]",
                variable,
                spatial_shape,
                self.nlat(),
                self.nlon()
            )));
        }
        Ok(())
    }
}

fn read_coordinate<F: ForecastFile>(file: &F, name: &str) -> Result<Vec<f64>> {
    let field: Field = file.read_field(name)?;
    if field.shape.len() != 1 {
        return Err(HarvestError::grid_mismatch(format!(
            "coordinate '{}' is not one-dimensional (shape {:?})",
            name, field.shape
        )));
    }
    Ok(field.values)
}
