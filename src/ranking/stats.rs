//! Sample statistics and the Rinott stage-2 formulas.

use crate::demand::MAX_REPLICATIONS;
use crate::error::{Result, SarsError};

/// Arithmetic mean. Returns `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample mean and Bessel-corrected variance (divides by `n - 1`).
///
/// A variance within rounding of zero relative to the mean, at most
/// `f64::EPSILON * mean^2`, is reported as exactly zero. Identical
/// observations whose mean picked up a last-bit error therefore count as
/// zero-variance samples.
pub fn mean_variance(values: &[f64]) -> Result<(f64, f64)> {
    if values.len() < 2 {
        return Err(SarsError::DegenerateStatistics {
            observations: values.len(),
        });
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    let variance = ss / (values.len() - 1) as f64;
    if variance <= f64::EPSILON * m * m {
        return Ok((m, 0.0));
    }
    Ok((m, variance))
}

/// Total replications `n1 = max(n0 + 1, 1 + floor(variance * h^2 / delta^2))`.
///
/// Fails with [`SarsError::ReplicationLimit`] when `n1` would exceed
/// [`MAX_REPLICATIONS`], including for a non-finite variance.
pub fn second_stage_size(n0: usize, variance: f64, h: f64, delta: f64) -> Result<usize> {
    let required = (variance * h * h / (delta * delta)).floor();
    if !(required < MAX_REPLICATIONS as f64) {
        return Err(SarsError::ReplicationLimit {
            requested: if required.is_nan() { usize::MAX } else { required as usize },
            limit: MAX_REPLICATIONS,
        });
    }
    let n1 = (1 + required.max(0.0) as usize).max(n0.saturating_add(1));
    if n1 > MAX_REPLICATIONS {
        return Err(SarsError::ReplicationLimit {
            requested: n1,
            limit: MAX_REPLICATIONS,
        });
    }
    Ok(n1)
}

/// Weight of the stage-1 mean in the final estimate.
///
/// `x = 1 - (n1 - n0) * delta^2 / (variance * h^2)` and
/// `w = (1 + sqrt(1 - x * n1 / n0)) * n0 / n1`.
///
/// Zero variance makes `x` unbounded; every stage-1 observation is then
/// identical and the stage-1 mean gets the full weight.
pub fn rinott_weight(n0: usize, n1: usize, delta: f64, variance: f64, h: f64) -> f64 {
    if variance <= 0.0 {
        return 1.0;
    }
    let (n0, n1) = (n0 as f64, n1 as f64);
    let x = 1.0 - (n1 - n0) * delta * delta / (variance * h * h);
    // With n1 sized by `second_stage_size` the radicand is non-negative; clamp
    // rounding noise only.
    let radicand = (1.0 - x * n1 / n0).max(0.0);
    (1.0 + radicand.sqrt()) * n0 / n1
}
