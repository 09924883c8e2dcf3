//! Surface-type masking.
//!
//! Cells whose surface category differs from the requested one are marked
//! invalid and their value is replaced with the variable's missing value.

use harvest_common::SurfaceCategory;
use tracing::debug;

use crate::error::{HarvestError, Result};
use crate::variables::VariableSpec;

/// Variables only defined over land. They are masked to land before any
/// requested surface mask is applied.
pub const LAND_ONLY_VARIABLES: &[&str] = &["soill4", "soilm", "soilt4", "tg3"];

pub fn is_land_only(variable: &str) -> bool {
    LAND_ONLY_VARIABLES.contains(&variable)
}

/// Mask `values` to `requested`.
///
/// `categories` holds one surface code per value. Cells of another category,
/// and cells whose code is not a known category, get `sentinel` written into
/// `values` and `false` into `valid`. Returns the number of cells masked out.
pub fn apply_surface_mask(
    values: &mut [f64],
    valid: &mut [bool],
    categories: &[f64],
    requested: SurfaceCategory,
    sentinel: f64,
) -> usize {
    let mut masked = 0;
    for ((value, ok), &code) in values.iter_mut().zip(valid.iter_mut()).zip(categories) {
        if SurfaceCategory::from_code(code) != Some(requested) {
            *value = sentinel;
            *ok = false;
            masked += 1;
        }
    }
    masked
}

/// Mask a resolved variable with a category field.
///
/// The category field may carry the same time axis as the variable, or a
/// single time sample that is then applied to every step.
pub fn mask_variable(
    spec: &mut VariableSpec,
    categories: &[f64],
    requested: SurfaceCategory,
) -> Result<usize> {
    let plane = spec.plane_len();
    let sentinel = spec.missing_value;
    let masked = if categories.len() == spec.values.len() {
        apply_surface_mask(
            &mut spec.values,
            &mut spec.valid,
            categories,
            requested,
            sentinel,
        )
    } else if categories.len() == plane && plane > 0 {
        spec.values
            .chunks_mut(plane)
            .zip(spec.valid.chunks_mut(plane))
            .map(|(values, valid)| {
                apply_surface_mask(values, valid, categories, requested, sentinel)
            })
            .sum::<usize>()
    } else {
        return Err(HarvestError::grid_mismatch(format!(
            "surface categories have {} values, '{}' has shape {:?}",
            categories.len(),
            spec.name,
            spec.shape
        )));
    };

    debug!(
        variable = %spec.name,
        mask = %requested,
        masked,
        "Applied surface mask"
    );
    Ok(masked)
}
