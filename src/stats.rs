//! Numeric helpers shared across the pipeline stages.
//!
//! Everything here is a pure function over f64 slices. Degenerate inputs
//! (empty, single sample where a spread is needed) resolve to `None` so a
//! downstream metric can gate itself instead of propagating NaN.

use std::f64::consts::PI;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance.
pub fn variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    Some(values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64)
}

pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

/// Percentile by linear interpolation between closest ranks.
/// `sorted` must be ascending; `p` in [0, 100].
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    let weight = rank - low as f64;
    Some(sorted[low] + (sorted[high] - sorted[low]) * weight)
}

pub fn median(sorted: &[f64]) -> Option<f64> {
    percentile(sorted, 50.0)
}

/// Drops values outside `[q1 - k*iqr, q3 + k*iqr]`. Returns the surviving
/// values, still ascending. With fewer than four samples there is no stable
/// quartile estimate and the input passes through untouched.
pub fn iqr_filter(sorted: &[f64], k: f64) -> Vec<f64> {
    if sorted.len() < 4 {
        return sorted.to_vec();
    }
    let q1 = percentile(sorted, 25.0).unwrap_or(sorted[0]);
    let q3 = percentile(sorted, 75.0).unwrap_or(sorted[sorted.len() - 1]);
    let iqr = q3 - q1;
    let low = q1 - k * iqr;
    let high = q3 + k * iqr;
    sorted
        .iter()
        .copied()
        .filter(|v| *v >= low && *v <= high)
        .collect()
}

/// Mean after dropping `trim` of the mass from each tail (e.g. 0.1 = 10%).
pub fn trimmed_mean(sorted: &[f64], trim: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let drop = ((sorted.len() as f64) * trim).floor() as usize;
    let kept = &sorted[drop..sorted.len() - drop];
    if kept.is_empty() {
        return median(sorted);
    }
    mean(kept)
}

/// Ordinary least-squares slope of `y` against `x`.
/// `None` for fewer than two points or a degenerate (constant) x.
pub fn ols_slope(points: &[(f64, f64)]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in points {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    if sxx == 0.0 {
        return None;
    }
    Some(sxy / sxx)
}

/// Circular mean of hour-of-day values (0..24) via vector summation, so
/// 23:30 and 00:30 average to midnight rather than noon.
pub fn circular_mean_hour(hours: &[f64]) -> Option<f64> {
    if hours.is_empty() {
        return None;
    }
    let mut sin_sum = 0.0;
    let mut cos_sum = 0.0;
    for h in hours {
        let angle = h * 2.0 * PI / 24.0;
        sin_sum += angle.sin();
        cos_sum += angle.cos();
    }
    if sin_sum.abs() < f64::EPSILON && cos_sum.abs() < f64::EPSILON {
        // Perfectly opposed mass has no defined mean direction.
        return None;
    }
    let angle = sin_sum.atan2(cos_sum);
    let mut hour = angle * 24.0 / (2.0 * PI);
    if hour < 0.0 {
        hour += 24.0;
    }
    Some(hour)
}

/// Shortest distance around the 24h clock, always in [0, 12].
pub fn circular_distance_hours(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 24.0;
    if diff > 12.0 {
        24.0 - diff
    } else {
        diff
    }
}
