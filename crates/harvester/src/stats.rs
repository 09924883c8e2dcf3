//! Spherical-area-weighted statistics.
//!
//! All reductions take values together with an explicit validity mask and skip
//! invalid entries. They return `None` when no valid entry is left.
//!
//! Mean and variance are both normalized by the weight sum over the valid
//! entries:
//!
//! ```text
//! mean     = Σ w·x / Σ w
//! variance = Σ w·x² / Σ w − mean²
//! ```
//!
//! Sums are accumulated relative to the first valid value, which leaves the
//! formulas unchanged but keeps a constant field's mean exact and its variance
//! at zero. A variance that comes out negative only by rounding is reported as
//! zero.

use std::f64::consts::PI;

use harvest_common::Statistic;

use crate::error::{HarvestError, Result};

/// Solid angle of the full sphere, in steradians.
pub const FULL_SPHERE_SR: f64 = 4.0 * PI;

/// Cancellation error allowed in the variance before a negative is kept.
const ROUNDING_ULPS: f64 = 64.0;

/// A weighted mean and the weight sum it was normalized by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedMean {
    pub mean: f64,
    pub weight_sum: f64,
}

/// First-order and second-order weighted moments about `origin`.
struct Moments {
    origin: f64,
    first: f64,
    second: f64,
    weight_sum: f64,
}

fn moments(values: &[f64], valid: &[bool], weights: &[f64]) -> Option<Moments> {
    let origin = values
        .iter()
        .zip(valid)
        .find(|(_, ok)| **ok)
        .map(|(v, _)| *v)?;

    let mut weight_sum = 0.0;
    let mut first = 0.0;
    let mut second = 0.0;
    for ((&x, &ok), &w) in values.iter().zip(valid).zip(weights) {
        if !ok {
            continue;
        }
        let d = x - origin;
        weight_sum += w;
        first += w * d;
        second += w * d * d;
    }

    if weight_sum <= 0.0 {
        return None;
    }

    Some(Moments {
        origin,
        first: first / weight_sum,
        second: second / weight_sum,
        weight_sum,
    })
}

/// Weighted mean of the valid entries.
pub fn weighted_mean(values: &[f64], valid: &[bool], weights: &[f64]) -> Option<WeightedMean> {
    let m = moments(values, valid, weights)?;
    Some(WeightedMean {
        mean: m.origin + m.first,
        weight_sum: m.weight_sum,
    })
}

/// Weighted population variance of the valid entries.
///
/// When `mean` is given it is used in place of the weighted mean of `values`.
/// A mean far from the data then yields a negative result, which is returned
/// as is. Only cancellation noise around zero is clamped.
pub fn weighted_variance(
    values: &[f64],
    valid: &[bool],
    weights: &[f64],
    mean: Option<f64>,
) -> Option<f64> {
    let m = moments(values, valid, weights)?;
    let shift = mean.map(|mu| mu - m.origin).unwrap_or(m.first);
    // Σw·x²/Σw − mean², expanded around the origin.
    let cross = 2.0 * m.origin * (m.first - shift);
    let variance = m.second - shift * shift + cross;

    let noise = ROUNDING_ULPS * f64::EPSILON * (m.second + shift * shift + cross.abs());
    if variance < 0.0 && variance >= -noise {
        Some(0.0)
    } else {
        Some(variance)
    }
}

pub fn minimum(values: &[f64], valid: &[bool]) -> Option<f64> {
    values
        .iter()
        .zip(valid)
        .filter(|(_, ok)| **ok)
        .map(|(v, _)| *v)
        .reduce(f64::min)
}

pub fn maximum(values: &[f64], valid: &[bool]) -> Option<f64> {
    values
        .iter()
        .zip(valid)
        .filter(|(_, ok)| **ok)
        .map(|(v, _)| *v)
        .reduce(f64::max)
}

/// Compute one statistic. `mean` is reused for the variance when known.
pub fn compute(
    statistic: Statistic,
    values: &[f64],
    valid: &[bool],
    weights: &[f64],
    mean: Option<f64>,
) -> Option<f64> {
    match statistic {
        Statistic::Mean => match mean {
            Some(mean) => Some(mean),
            None => weighted_mean(values, valid, weights).map(|m| m.mean),
        },
        Statistic::Variance => weighted_variance(values, valid, weights, mean),
        Statistic::Minimum => minimum(values, valid),
        Statistic::Maximum => maximum(values, valid),
    }
}

/// Check that a selection's weights are consistent with a full sphere.
///
/// `selected` of `total` grid cells carry `weight_sum` steradians between them.
/// Scaled up by `total / selected` that must equal 4π within the relative
/// `tolerance`.
pub fn check_weight_conservation(
    selection: &str,
    weight_sum: f64,
    selected: usize,
    total: usize,
    tolerance: f64,
) -> Result<()> {
    let implied = if selected == 0 || total == 0 {
        f64::NAN
    } else {
        weight_sum / (selected as f64 / total as f64)
    };
    let relative = (implied - FULL_SPHERE_SR).abs() / FULL_SPHERE_SR;

    if !(relative <= tolerance) {
        return Err(HarvestError::WeightConservation {
            selection: selection.to_string(),
            implied,
            tolerance,
        });
    }
    Ok(())
}

/// Mean over time of every grid cell, skipping invalid samples.
///
/// `values` and `valid` hold `steps` planes of `plane` cells each. A cell with
/// no valid sample is invalid in the result.
pub fn temporal_mean(
    values: &[f64],
    valid: &[bool],
    steps: usize,
    plane: usize,
) -> (Vec<f64>, Vec<bool>) {
    let mut sums = vec![0.0; plane];
    let mut counts = vec![0usize; plane];

    for t in 0..steps {
        let offset = t * plane;
        for cell in 0..plane {
            if valid[offset + cell] {
                sums[cell] += values[offset + cell];
                counts[cell] += 1;
            }
        }
    }

    let means = sums
        .iter()
        .zip(&counts)
        .map(|(s, &n)| if n > 0 { s / n as f64 } else { f64::NAN })
        .collect();
    let valid = counts.iter().map(|&n| n > 0).collect();
    (means, valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_weights_constant_values_exact() {
        let c = 0.1 + 0.2;
        let values = vec![c; 7];
        let valid = vec![true; 7];
        let weights = vec![0.1; 7];
        let m = weighted_mean(&values, &valid, &weights).unwrap();
        assert_eq!(m.mean, c);
        assert_eq!(weighted_variance(&values, &valid, &weights, None), Some(0.0));
    }

    #[test]
    fn test_weighted_mean_returns_weight_sum() {
        let m = weighted_mean(&[1.0, 3.0], &[true, true], &[1.0, 3.0]).unwrap();
        assert_eq!(m.mean, 2.5);
        assert_eq!(m.weight_sum, 4.0);
    }

    #[test]
    fn test_weighted_variance() {
        // Σw·x²/Σw = (1 + 27)/4 = 7, mean = 2.5
        let v = weighted_variance(&[1.0, 3.0], &[true, true], &[1.0, 3.0], None).unwrap();
        assert!((v - 0.75).abs() < 1e-12);

        // Given mean: 7 - 2² = 3
        let v = weighted_variance(&[1.0, 3.0], &[true, true], &[1.0, 3.0], Some(2.0)).unwrap();
        assert!((v - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_variance_about_distant_mean_stays_negative() {
        // Σw·x²/Σw = 7, given mean 5: 7 - 25
        let v = weighted_variance(&[1.0, 3.0], &[true, true], &[1.0, 3.0], Some(5.0)).unwrap();
        assert!((v + 18.0).abs() < 1e-12);
    }

    #[test]
    fn test_variance_rounding_noise_clamped() {
        let values = [0.1, 0.2, 0.3];
        let valid = [true; 3];
        let weights = [0.3, 0.3, 0.3];
        let rms = ((0.01 + 0.04 + 0.09) / 3.0_f64).sqrt();
        let v = weighted_variance(&values, &valid, &weights, Some(rms)).unwrap();
        assert!(v >= 0.0 && v < 1e-15, "{v}");
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let values = [1.0, 1.0e20, 3.0, f64::NAN];
        let valid = [true, false, true, false];
        let weights = [1.0, 1.0, 1.0, 1.0];
        assert_eq!(weighted_mean(&values, &valid, &weights).unwrap().mean, 2.0);
        assert_eq!(minimum(&values, &valid), Some(1.0));
        assert_eq!(maximum(&values, &valid), Some(3.0));
    }

    #[test]
    fn test_no_valid_entries() {
        let values = [1.0, 2.0];
        let valid = [false, false];
        let weights = [1.0, 1.0];
        for stat in Statistic::ALL {
            assert_eq!(compute(stat, &values, &valid, &weights, None), None);
        }
    }

    #[test]
    fn test_conservation() {
        assert!(check_weight_conservation("globe", FULL_SPHERE_SR, 10, 10, 1e-3).is_ok());
        assert!(check_weight_conservation("north", FULL_SPHERE_SR / 2.0, 5, 10, 1e-3).is_ok());
        assert!(check_weight_conservation("globe", FULL_SPHERE_SR * 1.01, 10, 10, 1e-3).is_err());
        assert!(check_weight_conservation("nothing", 0.0, 0, 10, 1e-3).is_err());
        assert!(check_weight_conservation("bad", f64::NAN, 10, 10, 1e-3).is_err());
    }

    #[test]
    fn test_temporal_mean_skips_invalid_samples() {
        // two steps, three cells
        let values = [1.0, 2.0, 9.0, 3.0, f64::NAN, 9.0];
        let valid = [true, true, false, true, false, false];
        let (means, ok) = temporal_mean(&values, &valid, 2, 3);
        assert_eq!(means[0], 2.0);
        assert_eq!(means[1], 2.0);
        assert!(means[2].is_nan());
        assert_eq!(ok, vec![true, true, false]);
    }
}
