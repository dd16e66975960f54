//! Statistical helpers shared by the aggregation and correlation stages.
//!
//! Every function returns `None` when the input cannot support the
//! statistic, so absence stays explicit and never degrades into NaN or a
//! silent zero.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1 denominator). `None` below 2 values;
/// dispersion cannot be estimated from a single observation.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Pearson correlation coefficient over paired slices.
///
/// `None` when the slices differ in length, hold fewer than 2 pairs, or
/// either side has zero variance (a constant series has no defined
/// correlation).
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..x.len() {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    // Floating point can push |r| marginally past 1.
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Two-sided p-value for a Pearson coefficient from n paired observations,
/// via the Student's t distribution with n − 2 degrees of freedom.
///
/// `None` when n < 3. |r| of exactly 1 yields p = 0.
pub fn pearson_p_value(r: f64, n: usize) -> Option<f64> {
    if n < 3 {
        return None;
    }
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        return Some(0.0);
    }
    let t = r * (df / denom).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some(2.0 * dist.cdf(-t.abs()))
}

/// Pearson coefficient and its two-sided p-value in one call.
pub fn pearson_with_p(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let r = pearson(x, y)?;
    let p = pearson_p_value(r, x.len())?;
    Some((r, p))
}
