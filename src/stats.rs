//! Descriptive statistics and bootstrap resampling.
//!
//! Everything here operates on plain `f64` slices; callers are responsible
//! for missing-value filtering (see [`remove_na`]). Resampling draws from a
//! caller-supplied RNG so confidence intervals are reproducible under a
//! fixed seed.

use rand::Rng;

/// Filter out NaN values.
#[must_use]
pub fn remove_na(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Arithmetic mean. NaN for empty input.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median via linear-interpolation percentile. NaN for empty input.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    percentile_of(values, 50.0)
}

/// Population standard deviation. NaN for empty input.
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Calculate a percentile of pre-sorted data using linear interpolation.
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let k = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let f = k.floor() as usize;
    let c = k.ceil() as usize;

    if f == c || c >= sorted.len() {
        sorted[f.min(sorted.len() - 1)]
    } else {
        let d = k - f as f64;
        sorted[f] * (1.0 - d) + sorted[c] * d
    }
}

/// Calculate a percentile of unsorted data.
#[must_use]
pub fn percentile_of(values: &[f64], p: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    percentile(&sorted, p)
}

/// Empirical percentile band for a confidence level in (0, 100): the
/// [(100-level)/2, 100-(100-level)/2] percentiles of `values`.
#[must_use]
pub fn percentile_interval(values: &[f64], level: f64) -> (f64, f64) {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let low_p = (100.0 - level) / 2.0;
    (percentile(&sorted, low_p), percentile(&sorted, 100.0 - low_p))
}

/// Bootstrap distribution of `estimator` over `n_boot` resamples with
/// replacement. Empty input yields an empty distribution.
pub fn bootstrap<R, F>(data: &[f64], n_boot: usize, estimator: F, rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
    F: Fn(&[f64]) -> f64,
{
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sample = Vec::with_capacity(n);
    (0..n_boot)
        .map(|_| {
            sample.clear();
            sample.extend((0..n).map(|_| data[rng.gen_range(0..n)]));
            estimator(&sample)
        })
        .collect()
}

/// Block bootstrap for repeated-measure data: each resample draws whole
/// statistical-unit blocks with replacement and concatenates their
/// observations before applying the estimator.
pub fn bootstrap_units<R, F>(
    blocks: &[Vec<f64>],
    n_boot: usize,
    estimator: F,
    rng: &mut R,
) -> Vec<f64>
where
    R: Rng + ?Sized,
    F: Fn(&[f64]) -> f64,
{
    let k = blocks.len();
    if k == 0 {
        return Vec::new();
    }
    let mut sample = Vec::new();
    (0..n_boot)
        .map(|_| {
            sample.clear();
            for _ in 0..k {
                sample.extend_from_slice(&blocks[rng.gen_range(0..k)]);
            }
            estimator(&sample)
        })
        .collect()
}
