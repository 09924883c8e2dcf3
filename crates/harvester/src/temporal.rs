//! Representative time of a batch of forecast files.
//!
//! Each forecast timestamp marks the end of its averaging window. The window
//! length at every sample is estimated with a centred finite difference
//! (one-sided at the ends), each endpoint is shifted back by half a window to
//! get its midpoint, and the batch is represented by the median midpoint.

use chrono::{DateTime, Utc};
use harvest_common::{TimeAxisError, TimeUnits};

/// Finite-difference gradient with unit spacing.
///
/// Interior points use `(x[i+1] - x[i-1]) / 2`, the ends use the one-sided
/// difference. Fewer than two points have no gradient (all zeros).
pub fn gradient(x: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n < 2 {
        return vec![0.0; n];
    }
    (0..n)
        .map(|i| {
            if i == 0 {
                x[1] - x[0]
            } else if i == n - 1 {
                x[n - 1] - x[n - 2]
            } else {
                (x[i + 1] - x[i - 1]) / 2.0
            }
        })
        .collect()
}

/// Midpoints of the windows ending at `endpoints` (in hours).
pub fn window_midpoints(endpoints: &[f64]) -> Vec<f64> {
    endpoints
        .iter()
        .zip(gradient(endpoints))
        .map(|(t, dt)| t - dt / 2.0)
        .collect()
}

/// Median; the mean of the two middle values for an even count.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Representative time of forecast windows ending at `endpoints`.
///
/// `endpoints` must be sorted ascending. A single endpoint is returned as is.
pub fn representative_time(endpoints: &[DateTime<Utc>]) -> Result<DateTime<Utc>, TimeAxisError> {
    match endpoints {
        [] => return Err(TimeAxisError::Empty),
        [only] => return Ok(*only),
        _ => {}
    }
    if let Some(i) = endpoints.windows(2).position(|w| w[1] < w[0]) {
        return Err(TimeAxisError::Unsorted(i + 1));
    }

    let epoch = TimeUnits::hours_epoch();
    let hours: Vec<f64> = endpoints.iter().map(|t| epoch.encode(t)).collect();
    let midpoints = window_midpoints(&hours);
    let centre = median(&midpoints).ok_or(TimeAxisError::Empty)?;
    epoch.decode(centre)
}
