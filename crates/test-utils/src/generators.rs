//! Synthetic grids and forecast files.
//!
//! Grids are regular: `nlat` rows of equal latitude spacing, listed north to
//! south like the BFG `grid_yt` coordinate, and `nlon` columns starting at 0°E.
//! Weights are the exact solid angle of every cell, so they sum to 4π.

use std::f64::consts::PI;

use bfg_dataset::{Field, MemoryFile};

use crate::fixtures::{CATEGORY_FIELD, LAT_NAME, LON_NAME, REFERENCE_UNITS, WEIGHT_NAME};

/// Latitudes of the cell centres, north to south.
///
/// # Example
///
/// ```
/// use test_utils::regular_latitudes;
///
/// assert_eq!(regular_latitudes(4), vec![67.5, 22.5, -22.5, -67.5]);
/// ```
pub fn regular_latitudes(nlat: usize) -> Vec<f64> {
    let step = 180.0 / nlat as f64;
    (0..nlat).map(|i| 90.0 - step * (i as f64 + 0.5)).collect()
}

/// Longitudes of the columns, starting at 0.
pub fn regular_longitudes(nlon: usize) -> Vec<f64> {
    let step = 360.0 / nlon as f64;
    (0..nlon).map(|j| step * j as f64).collect()
}

/// Solid angle (sr) of every cell of a regular grid, row-major.
pub fn solid_angle_weights(nlat: usize, nlon: usize) -> Vec<f64> {
    let dlat = PI / nlat as f64;
    let dlon = 2.0 * PI / nlon as f64;
    let mut weights = Vec::with_capacity(nlat * nlon);
    for i in 0..nlat {
        let north = PI / 2.0 - dlat * i as f64;
        let south = north - dlat;
        let w = dlon * (north.sin() - south.sin());
        weights.extend(std::iter::repeat(w).take(nlon));
    }
    weights
}

/// A (time, grid_yt, grid_xt) field whose value at `(t, i, j)` is `f(t, i, j)`.
pub fn create_field<F>(name: &str, steps: usize, nlat: usize, nlon: usize, f: F) -> Field
where
    F: Fn(usize, usize, usize) -> f64,
{
    let mut values = Vec::with_capacity(steps * nlat * nlon);
    for t in 0..steps {
        for i in 0..nlat {
            for j in 0..nlon {
                values.push(f(t, i, j));
            }
        }
    }
    Field::new(
        name,
        &["time", LAT_NAME, LON_NAME],
        &[steps, nlat, nlon],
        values,
    )
    .expect("generated field has a consistent shape")
}

/// A single-step field with the same value everywhere.
pub fn constant_field(name: &str, nlat: usize, nlon: usize, value: f64) -> Field {
    create_field(name, 1, nlat, nlon, |_, _, _| value)
}

/// Time coordinate in hours since the fixture reference time.
pub fn time_field(hours: &[f64]) -> Field {
    Field::new("time", &["time"], &[hours.len()], hours.to_vec())
        .expect("time axis has a consistent shape")
        .with_attribute("units", REFERENCE_UNITS)
        .with_attribute("calendar", "JULIAN")
}

fn coordinate(name: &str, values: Vec<f64>, units: &str) -> Field {
    let len = values.len();
    Field::new(name, &[name], &[len], values)
        .expect("coordinate has a consistent shape")
        .with_attribute("units", units)
}

/// A grid-geometry reference file with coordinates and exact weights.
pub fn geometry_file(path: &str, nlat: usize, nlon: usize) -> MemoryFile {
    let area = Field::new(
        WEIGHT_NAME,
        &[LAT_NAME, LON_NAME],
        &[nlat, nlon],
        solid_angle_weights(nlat, nlon),
    )
    .expect("weights have a consistent shape")
    .with_attribute("units", "steradian");

    MemoryFile::new(path)
        .with_field(coordinate(LAT_NAME, regular_latitudes(nlat), "degrees_north"))
        .with_field(coordinate(LON_NAME, regular_longitudes(nlon), "degrees_east"))
        .with_field(area)
}

/// A forecast file with coordinates and a single time step `hour` hours after
/// the fixture reference time. Add variables with [`MemoryFile::with_field`].
pub fn forecast_file(path: &str, hour: f64, nlat: usize, nlon: usize) -> MemoryFile {
    MemoryFile::new(path)
        .with_field(time_field(&[hour]))
        .with_field(coordinate(LAT_NAME, regular_latitudes(nlat), "degrees_north"))
        .with_field(coordinate(LON_NAME, regular_longitudes(nlon), "degrees_east"))
}

/// Surface categories: land (1) in the western half of the grid (columns
/// below `nlon / 2`), ocean (0) elsewhere, and ice (2) on the first and last
/// rows.
pub fn surface_categories(nlat: usize, nlon: usize) -> Field {
    create_field(CATEGORY_FIELD, 1, nlat, nlon, |_, i, j| {
        if i == 0 || i == nlat - 1 {
            2.0
        } else if j < nlon / 2 {
            1.0
        } else {
            0.0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_cover_sphere() {
        let total: f64 = solid_angle_weights(18, 36).iter().sum();
        assert!((total - 4.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_hemispheres_have_equal_area() {
        let weights = solid_angle_weights(6, 4);
        let north: f64 = weights[..12].iter().sum();
        let south: f64 = weights[12..].iter().sum();
        assert!((north - south).abs() < 1e-12);
    }

    #[test]
    fn test_longitudes() {
        assert_eq!(regular_longitudes(4), vec![0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn test_create_field_layout() {
        let field = create_field("x", 2, 2, 3, |t, i, j| (t * 100 + i * 10 + j) as f64);
        assert_eq!(field.shape, vec![2, 2, 3]);
        assert_eq!(field.values[4], 11.0);
        assert_eq!(field.values[6], 100.0);
    }
}
