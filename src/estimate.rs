//! Statistic estimation over a normalized plot spec.
//!
//! The second pipeline stage: consumes a [`PlotSpec`] and computes, per
//! group (and per hue level within a group), a point estimate and an
//! optional confidence interval. Missing data degrades to NaN sentinels
//! rather than errors so partial plots can still render.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::data::DataValue;
use crate::error::{Error, Result};
use crate::normalize::PlotSpec;
use crate::stats;

/// Point-estimate function applied to each group's filtered values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Estimator {
    /// Arithmetic mean.
    Mean,
    /// Median (50th percentile, linear interpolation).
    Median,
    /// Caller-supplied vector-to-scalar function.
    Custom(fn(&[f64]) -> f64),
}

impl Default for Estimator {
    fn default() -> Self {
        Estimator::Mean
    }
}

impl Estimator {
    /// Apply the estimator to a vector of values.
    #[must_use]
    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            Estimator::Mean => stats::mean(values),
            Estimator::Median => stats::median(values),
            Estimator::Custom(f) => f(values),
        }
    }
}

/// Confidence-interval policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CiSpec {
    /// No interval.
    None,
    /// Estimate plus/minus one population standard deviation.
    StdDev,
    /// Bootstrap percentile band at a confidence level in (0, 100).
    Percentile(f64),
}

impl Default for CiSpec {
    fn default() -> Self {
        CiSpec::Percentile(95.0)
    }
}

impl CiSpec {
    fn requested(self) -> bool {
        !matches!(self, CiSpec::None)
    }

    fn validate(self) -> Result<()> {
        match self {
            CiSpec::Percentile(level) if !(level > 0.0 && level < 100.0) => {
                Err(Error::InvalidCiLevel { level })
            }
            _ => Ok(()),
        }
    }
}

/// Estimation configuration with enumerated defaults: mean estimator, 95%
/// bootstrap interval, 1000 resamples, entropy-seeded RNG.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateConfig {
    /// Point-estimate function.
    pub estimator: Estimator,
    /// Confidence-interval policy.
    pub ci: CiSpec,
    /// Bootstrap resample count.
    pub n_boot: usize,
    /// RNG seed for reproducible intervals; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self { estimator: Estimator::Mean, ci: CiSpec::default(), n_boot: 1000, seed: None }
    }
}

/// A closed interval around a point estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

impl Interval {
    /// The missing-interval sentinel.
    #[must_use]
    pub fn nan() -> Self {
        Self { low: f64::NAN, high: f64::NAN }
    }

    /// Interval width.
    #[must_use]
    pub fn width(self) -> f64 {
        self.high - self.low
    }

    /// Whether both bounds are missing.
    #[must_use]
    pub fn is_nan(self) -> bool {
        self.low.is_nan() && self.high.is_nan()
    }
}

/// Per-group point estimates: flat, or nested by hue level.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValues {
    /// One estimate per group.
    Flat(Vec<f64>),
    /// One row per group, one estimate per hue level.
    Nested(Vec<Vec<f64>>),
}

impl StatValues {
    /// The flat estimates, when not hue-nested.
    #[must_use]
    pub fn as_flat(&self) -> Option<&[f64]> {
        match self {
            StatValues::Flat(v) => Some(v),
            StatValues::Nested(_) => None,
        }
    }

    /// The nested `[group][hue]` estimates.
    #[must_use]
    pub fn as_nested(&self) -> Option<&[Vec<f64>]> {
        match self {
            StatValues::Flat(_) => None,
            StatValues::Nested(v) => Some(v),
        }
    }

    /// Number of groups.
    #[must_use]
    pub fn n_groups(&self) -> usize {
        match self {
            StatValues::Flat(v) => v.len(),
            StatValues::Nested(v) => v.len(),
        }
    }
}

/// Per-group confidence intervals, parallel to [`StatValues`].
#[derive(Debug, Clone, PartialEq)]
pub enum IntervalValues {
    /// One interval per group.
    Flat(Vec<Interval>),
    /// One row per group, one interval per hue level.
    Nested(Vec<Vec<Interval>>),
}

impl IntervalValues {
    /// The flat intervals, when not hue-nested.
    #[must_use]
    pub fn as_flat(&self) -> Option<&[Interval]> {
        match self {
            IntervalValues::Flat(v) => Some(v),
            IntervalValues::Nested(_) => None,
        }
    }

    /// The nested `[group][hue]` intervals.
    #[must_use]
    pub fn as_nested(&self) -> Option<&[Vec<Interval>]> {
        match self {
            IntervalValues::Flat(_) => None,
            IntervalValues::Nested(v) => Some(v),
        }
    }
}

/// Result of statistic estimation: point estimates and, when requested,
/// parallel confidence intervals. Recomputed fresh on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateResult {
    /// Point estimates, NaN where a group or hue cell had no data.
    pub statistic: StatValues,
    /// Confidence intervals, absent when not requested.
    pub confint: Option<IntervalValues>,
}

/// Estimate a statistic (and optional confidence interval) for every group
/// and hue cell of a normalized plot spec.
///
/// # Errors
///
/// Returns [`Error::InvalidCiLevel`] when a percentile level lies outside
/// (0, 100). Degenerate data is not an error.
pub fn estimate_statistic(spec: &PlotSpec, config: &EstimateConfig) -> Result<EstimateResult> {
    config.ci.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let result = match &spec.plot_hues {
        None => estimate_flat(spec, config, &mut rng),
        Some(hues) => estimate_nested(spec, hues, config, &mut rng),
    };

    debug!(
        groups = result.statistic.n_groups(),
        ci = ?config.ci,
        n_boot = config.n_boot,
        "estimated statistics"
    );
    Ok(result)
}

/// Single layer of grouping: one estimate per group.
fn estimate_flat(spec: &PlotSpec, config: &EstimateConfig, rng: &mut StdRng) -> EstimateResult {
    let mut statistic = Vec::with_capacity(spec.n_groups());
    let mut confint = Vec::with_capacity(spec.n_groups());

    for (i, group_data) in spec.plot_data.iter().enumerate() {
        let units = spec.plot_units.as_ref().map(|u| u[i].as_slice());
        let (stat_data, unit_blocks) = filter_group(group_data, units, None);
        let cell = estimate_cell(&stat_data, unit_blocks.as_deref(), config, rng);
        statistic.push(cell.0);
        if let Some(interval) = cell.1 {
            confint.push(interval);
        }
    }

    EstimateResult {
        statistic: StatValues::Flat(statistic),
        confint: config.ci.requested().then_some(IntervalValues::Flat(confint)),
    }
}

/// Hue nesting: estimates assemble as `[group][hue]`.
fn estimate_nested(
    spec: &PlotSpec,
    hues: &[Vec<DataValue>],
    config: &EstimateConfig,
    rng: &mut StdRng,
) -> EstimateResult {
    let hue_names: &[DataValue] = spec.hue_names.as_deref().unwrap_or(&[]);
    let mut statistic = Vec::with_capacity(spec.n_groups());
    let mut confint = Vec::with_capacity(spec.n_groups());

    for (i, group_data) in spec.plot_data.iter().enumerate() {
        let mut group_stats = Vec::with_capacity(hue_names.len());
        let mut group_ints = Vec::with_capacity(hue_names.len());

        for hue_level in hue_names {
            // An empty hue vector for this group short-circuits to sentinels
            if hues[i].is_empty() {
                group_stats.push(f64::NAN);
                if config.ci.requested() {
                    group_ints.push(Interval::nan());
                }
                continue;
            }

            let mask: Vec<bool> = hues[i].iter().map(|h| h == hue_level).collect();
            let units = spec.plot_units.as_ref().map(|u| u[i].as_slice());
            let (stat_data, unit_blocks) = filter_group(group_data, units, Some(&mask));
            let cell = estimate_cell(&stat_data, unit_blocks.as_deref(), config, rng);
            group_stats.push(cell.0);
            if let Some(interval) = cell.1 {
                group_ints.push(interval);
            }
        }

        statistic.push(group_stats);
        confint.push(group_ints);
    }

    EstimateResult {
        statistic: StatValues::Nested(statistic),
        confint: config.ci.requested().then_some(IntervalValues::Nested(confint)),
    }
}

/// Estimate one cell: point estimate plus optional interval.
fn estimate_cell(
    stat_data: &[f64],
    unit_blocks: Option<&[Vec<f64>]>,
    config: &EstimateConfig,
    rng: &mut StdRng,
) -> (f64, Option<Interval>) {
    let estimate =
        if stat_data.is_empty() { f64::NAN } else { config.estimator.apply(stat_data) };

    let interval = match config.ci {
        CiSpec::None => None,
        _ if stat_data.len() < 2 => Some(Interval::nan()),
        CiSpec::StdDev => {
            let sd = stats::std_dev(stat_data);
            Some(Interval { low: estimate - sd, high: estimate + sd })
        }
        CiSpec::Percentile(level) => {
            let estimator = config.estimator;
            let boots = match unit_blocks {
                Some(blocks) => stats::bootstrap_units(
                    blocks,
                    config.n_boot,
                    |v| estimator.apply(v),
                    rng,
                ),
                None => stats::bootstrap(stat_data, config.n_boot, |v| estimator.apply(v), rng),
            };
            let (low, high) = stats::percentile_interval(&boots, level);
            Some(Interval { low, high })
        }
    };

    (estimate, interval)
}

/// Joint missing-value filter for one group.
///
/// A row is kept when it passes the optional hue mask, its value is not
/// NaN, and (when units are present) its paired unit is not null. When
/// units are present the kept values are additionally grouped into unit
/// blocks in first-seen unit order for block resampling.
fn filter_group(
    values: &[f64],
    units: Option<&[DataValue]>,
    mask: Option<&[bool]>,
) -> (Vec<f64>, Option<Vec<Vec<f64>>>) {
    let keep = |idx: usize, value: f64| -> bool {
        if mask.is_some_and(|m| !m.get(idx).copied().unwrap_or(false)) {
            return false;
        }
        if value.is_nan() {
            return false;
        }
        if units.is_some_and(|u| u.get(idx).map_or(true, DataValue::is_null)) {
            return false;
        }
        true
    };

    match units {
        None => {
            let kept =
                values.iter().enumerate().filter(|&(i, &v)| keep(i, v)).map(|(_, &v)| v).collect();
            (kept, None)
        }
        Some(unit_labels) => {
            let mut kept = Vec::new();
            let mut block_keys: Vec<&DataValue> = Vec::new();
            let mut blocks: Vec<Vec<f64>> = Vec::new();
            for (i, &value) in values.iter().enumerate() {
                if !keep(i, value) {
                    continue;
                }
                kept.push(value);
                let unit = &unit_labels[i];
                match block_keys.iter().position(|k| *k == unit) {
                    Some(pos) => blocks[pos].push(value),
                    None => {
                        block_keys.push(unit);
                        blocks.push(vec![value]);
                    }
                }
            }
            (kept, Some(blocks))
        }
    }
}
