//! Bar plot: per-category point estimates with confidence-interval whiskers.
//!
//! [`BarPlot`] is the builder front door to the normalize/estimate
//! pipeline. The built plot does not render anything itself; it emits a
//! backend-agnostic draw specification ([`BarSeries`], [`ErrorBar`],
//! [`AxisAnnotations`]) that an external bar-chart renderer consumes.

use crate::data::{ColumnRef, DataInput, DataValue};
use crate::error::Result;
use crate::estimate::{
    estimate_statistic, CiSpec, EstimateConfig, EstimateResult, Estimator, Interval,
};
use crate::normalize::{normalize, Orient, PlotInput, PlotSpec};

/// Builder for a grouped/hued bar plot with confidence intervals.
#[derive(Debug, Clone)]
pub struct BarPlot {
    input: PlotInput,
    config: EstimateConfig,
    bar_width: f64,
    dodge: bool,
    capsize: Option<f64>,
}

impl Default for BarPlot {
    fn default() -> Self {
        Self::new()
    }
}

impl BarPlot {
    /// Create a new bar plot builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: PlotInput::default(),
            config: EstimateConfig::default(),
            bar_width: 0.8,
            dodge: true,
            capsize: None,
        }
    }

    /// Set the long-form x variable.
    #[must_use]
    pub fn x(mut self, x: impl Into<ColumnRef>) -> Self {
        self.input.x = Some(x.into());
        self
    }

    /// Set the long-form y variable.
    #[must_use]
    pub fn y(mut self, y: impl Into<ColumnRef>) -> Self {
        self.input.y = Some(y.into());
        self
    }

    /// Set the hue variable for nested sub-bars.
    #[must_use]
    pub fn hue(mut self, hue: impl Into<ColumnRef>) -> Self {
        self.input.hue = Some(hue.into());
        self
    }

    /// Set the statistical-unit variable for block resampling.
    #[must_use]
    pub fn units(mut self, units: impl Into<ColumnRef>) -> Self {
        self.input.units = Some(units.into());
        self
    }

    /// Set the input data (wide-form payload or long-form lookup table).
    #[must_use]
    pub fn data(mut self, data: impl Into<DataInput>) -> Self {
        self.input.data = Some(data.into());
        self
    }

    /// Set an explicit group order.
    #[must_use]
    pub fn order<T>(mut self, order: &[T]) -> Self
    where
        T: Clone + Into<DataValue>,
    {
        self.input.order = Some(order.iter().cloned().map(Into::into).collect());
        self
    }

    /// Set an explicit hue level order.
    #[must_use]
    pub fn hue_order<T>(mut self, hue_order: &[T]) -> Self
    where
        T: Clone + Into<DataValue>,
    {
        self.input.hue_order = Some(hue_order.iter().cloned().map(Into::into).collect());
        self
    }

    /// Request an explicit orientation instead of inferring one.
    #[must_use]
    pub fn orient(mut self, orient: Orient) -> Self {
        self.input.orient = Some(orient);
        self
    }

    /// Set the point-estimate function.
    #[must_use]
    pub fn estimator(mut self, estimator: Estimator) -> Self {
        self.config.estimator = estimator;
        self
    }

    /// Set the confidence-interval policy.
    #[must_use]
    pub fn ci(mut self, ci: CiSpec) -> Self {
        self.config.ci = ci;
        self
    }

    /// Set the bootstrap resample count.
    #[must_use]
    pub fn n_boot(mut self, n_boot: usize) -> Self {
        self.config.n_boot = n_boot;
        self
    }

    /// Seed the bootstrap RNG for reproducible intervals.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set bar width as a fraction of one category slot (0.1 to 1.0).
    #[must_use]
    pub fn bar_width(mut self, width: f64) -> Self {
        self.bar_width = width.clamp(0.1, 1.0);
        self
    }

    /// Dodge hue sub-bars side by side instead of overlaying them.
    #[must_use]
    pub fn dodge(mut self, dodge: bool) -> Self {
        self.dodge = dodge;
        self
    }

    /// Set error-bar cap width in category-axis units.
    #[must_use]
    pub fn capsize(mut self, capsize: f64) -> Self {
        self.capsize = Some(capsize);
        self
    }

    /// Normalize the input and estimate per-bar statistics.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed input; see [`crate::Error`].
    pub fn build(self) -> Result<BuiltBarPlot> {
        let spec = normalize(self.input)?;
        let result = estimate_statistic(&spec, &self.config)?;
        Ok(BuiltBarPlot {
            spec,
            result,
            bar_width: self.bar_width,
            dodge: self.dodge,
            capsize: self.capsize,
        })
    }
}

/// A built bar plot: normalized spec, estimates, and draw geometry.
#[derive(Debug, Clone)]
pub struct BuiltBarPlot {
    spec: PlotSpec,
    result: EstimateResult,
    bar_width: f64,
    dodge: bool,
    capsize: Option<f64>,
}

impl BuiltBarPlot {
    /// The normalized plot spec.
    #[must_use]
    pub fn plot_spec(&self) -> &PlotSpec {
        &self.spec
    }

    /// The estimated statistics and intervals.
    #[must_use]
    pub fn estimate(&self) -> &EstimateResult {
        &self.result
    }

    /// Number of category groups.
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.spec.n_groups()
    }

    /// Display labels for the category groups, in plot order.
    #[must_use]
    pub fn group_labels(&self) -> Vec<String> {
        self.spec.group_names.iter().map(ToString::to_string).collect()
    }

    /// Display labels for the hue levels, when hue nesting is present.
    #[must_use]
    pub fn hue_labels(&self) -> Option<Vec<String>> {
        self.spec
            .hue_names
            .as_ref()
            .map(|names| names.iter().map(ToString::to_string).collect())
    }

    /// Center offsets for hue sub-bars within one category slot: evenly
    /// spaced across the bar width and centered on the group position, or
    /// all zero when not dodging.
    fn hue_offsets(&self) -> Vec<f64> {
        let n_levels = self.spec.hue_names.as_ref().map_or(0, Vec::len);
        if n_levels == 0 {
            return Vec::new();
        }
        if !self.dodge {
            return vec![0.0; n_levels];
        }

        let each = self.bar_width / n_levels as f64;
        let span = self.bar_width - each;
        let mut offsets: Vec<f64> = if n_levels == 1 {
            vec![0.0]
        } else {
            (0..n_levels).map(|j| span * j as f64 / (n_levels - 1) as f64).collect()
        };
        let center = offsets.iter().sum::<f64>() / n_levels as f64;
        for offset in &mut offsets {
            *offset -= center;
        }
        offsets
    }

    /// Width of one sub-bar when hue nesting is used.
    fn nested_width(&self) -> f64 {
        match self.spec.hue_names.as_ref().map(Vec::len) {
            Some(n_levels) if self.dodge && n_levels > 0 => self.bar_width / n_levels as f64,
            _ => self.bar_width,
        }
    }

    /// The renderer-ready bar series: one series for the whole plot, or
    /// one per hue level with dodge offsets applied.
    ///
    /// NaN heights mark missing cells; the renderer skips the bar but the
    /// category slot is kept so positions stay aligned.
    #[must_use]
    pub fn draw_data(&self) -> Vec<BarSeries> {
        let n_groups = self.num_groups();
        let cap_half = self.capsize.map(|c| c / 2.0);

        match self.result.statistic.as_nested() {
            None => {
                let heights =
                    self.result.statistic.as_flat().map(<[f64]>::to_vec).unwrap_or_default();
                let positions: Vec<f64> = (0..n_groups).map(|i| i as f64).collect();
                let error_bars = self
                    .result
                    .confint
                    .as_ref()
                    .and_then(|confint| confint.as_flat())
                    .map(|intervals| error_bars_at(&positions, intervals, cap_half));
                vec![BarSeries {
                    label: None,
                    positions,
                    heights,
                    width: self.bar_width,
                    error_bars,
                }]
            }
            Some(nested) => {
                let offsets = self.hue_offsets();
                let width = self.nested_width();
                let hue_names = self.spec.hue_names.as_deref().unwrap_or(&[]);

                hue_names
                    .iter()
                    .enumerate()
                    .map(|(j, level)| {
                        let positions: Vec<f64> =
                            (0..n_groups).map(|i| i as f64 + offsets[j]).collect();
                        let heights: Vec<f64> =
                            nested.iter().map(|row| row.get(j).copied().unwrap_or(f64::NAN)).collect();
                        let error_bars = self
                            .result
                            .confint
                            .as_ref()
                            .and_then(|confint| confint.as_nested())
                            .map(|rows| {
                                let intervals: Vec<Interval> = rows
                                    .iter()
                                    .map(|row| row.get(j).copied().unwrap_or(Interval::nan()))
                                    .collect();
                                error_bars_at(&positions, &intervals, cap_half)
                            });
                        BarSeries {
                            label: Some(level.to_string()),
                            positions,
                            heights,
                            width,
                            error_bars,
                        }
                    })
                    .collect()
            }
        }
    }

    /// Descriptive axis metadata for the external renderer.
    #[must_use]
    pub fn annotations(&self) -> AxisAnnotations {
        let n_groups = self.num_groups();
        let (x_label, y_label) = match self.spec.orient {
            Orient::Vertical => (self.spec.group_label.clone(), self.spec.value_label.clone()),
            Orient::Horizontal => (self.spec.value_label.clone(), self.spec.group_label.clone()),
        };

        AxisAnnotations {
            x_label,
            y_label,
            tick_positions: (0..n_groups).map(|i| i as f64).collect(),
            tick_labels: self.group_labels(),
            category_limits: (-0.5, n_groups as f64 - 0.5),
            legend_title: if self.spec.hue_names.is_some() {
                self.spec.hue_title.clone()
            } else {
                None
            },
            invert_category_axis: self.spec.orient.is_horizontal(),
        }
    }
}

fn error_bars_at(positions: &[f64], intervals: &[Interval], cap_half: Option<f64>) -> Vec<ErrorBar> {
    positions
        .iter()
        .zip(intervals)
        .map(|(&at, interval)| ErrorBar {
            at,
            low: interval.low,
            high: interval.high,
            cap_half_width: cap_half,
        })
        .collect()
}

/// One renderable series of bars: the whole plot, or one hue level.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    /// Legend label (the hue level), absent for the ungrouped series.
    pub label: Option<String>,
    /// Center position of each bar on the category axis.
    pub positions: Vec<f64>,
    /// Bar length along the value axis; NaN marks a missing cell.
    pub heights: Vec<f64>,
    /// Bar width as a fraction of one category slot.
    pub width: f64,
    /// Whisker geometry parallel to `positions`, when intervals were computed.
    pub error_bars: Option<Vec<ErrorBar>>,
}

/// Whisker geometry for one bar's confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBar {
    /// Category-axis position of the whisker.
    pub at: f64,
    /// Lower interval bound on the value axis.
    pub low: f64,
    /// Upper interval bound on the value axis.
    pub high: f64,
    /// Half-width of the whisker caps, when caps were requested.
    pub cap_half_width: Option<f64>,
}

/// Axis and legend metadata for the external renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisAnnotations {
    /// Label for the x axis.
    pub x_label: Option<String>,
    /// Label for the y axis.
    pub y_label: Option<String>,
    /// Tick positions on the category axis.
    pub tick_positions: Vec<f64>,
    /// Tick labels parallel to `tick_positions`.
    pub tick_labels: Vec<String>,
    /// Category-axis limits.
    pub category_limits: (f64, f64),
    /// Legend title, when hue nesting is present.
    pub legend_title: Option<String>,
    /// Horizontal plots draw categories top-to-bottom.
    pub invert_category_axis: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataFrame, Series};
    use approx::assert_relative_eq;

    fn tips() -> DataFrame {
        let mut df = DataFrame::new();
        df.add_column_str("day", &["thur", "thur", "fri", "fri", "sat", "sat"]);
        df.add_column_f64("bill", &[17.0, 21.0, 15.0, 19.0, 25.0, 18.0]);
        df.add_column_str("sex", &["m", "f", "m", "f", "m", "f"]);
        df
    }

    #[test]
    fn test_barplot_long_form() {
        let plot = BarPlot::new()
            .x("day")
            .y("bill")
            .data(tips())
            .ci(CiSpec::None)
            .build()
            .unwrap();
        assert_eq!(plot.num_groups(), 3);
        assert_eq!(plot.group_labels(), vec!["thur", "fri", "sat"]);
        let stats = plot.estimate().statistic.as_flat().unwrap();
        assert_relative_eq!(stats[0], 19.0);
        assert_relative_eq!(stats[1], 17.0);
        assert_relative_eq!(stats[2], 21.5);
    }

    #[test]
    fn test_barplot_wide_form() {
        let mut df = DataFrame::new();
        df.add_column_f64("A", &[1.0, 2.0, 3.0]);
        df.add_column_f64("B", &[4.0, 5.0, 6.0]);
        let plot = BarPlot::new().data(df).ci(CiSpec::None).build().unwrap();
        assert_eq!(plot.group_labels(), vec!["A", "B"]);
        let stats = plot.estimate().statistic.as_flat().unwrap();
        assert_relative_eq!(stats[0], 2.0);
        assert_relative_eq!(stats[1], 5.0);
    }

    #[test]
    fn test_barplot_literal_series() {
        let plot = BarPlot::new()
            .x(Series::from_strs(&["a", "a", "b"]))
            .y(Series::from_f64(&[1.0, 2.0, 3.0]))
            .ci(CiSpec::None)
            .build()
            .unwrap();
        let stats = plot.estimate().statistic.as_flat().unwrap();
        assert_relative_eq!(stats[0], 1.5);
        assert_relative_eq!(stats[1], 3.0);
    }

    #[test]
    fn test_draw_data_flat() {
        let plot = BarPlot::new()
            .x("day")
            .y("bill")
            .data(tips())
            .ci(CiSpec::StdDev)
            .capsize(0.2)
            .build()
            .unwrap();
        let series = plot.draw_data();
        assert_eq!(series.len(), 1);
        let s = &series[0];
        assert_eq!(s.label, None);
        assert_eq!(s.positions, vec![0.0, 1.0, 2.0]);
        assert_relative_eq!(s.width, 0.8);
        let bars = s.error_bars.as_ref().unwrap();
        assert_eq!(bars.len(), 3);
        assert_relative_eq!(bars[1].at, 1.0);
        assert_eq!(bars[0].cap_half_width, Some(0.1));
        assert!(bars[0].low < bars[0].high);
    }

    #[test]
    fn test_draw_data_hue_dodge() {
        let plot = BarPlot::new()
            .x("day")
            .y("bill")
            .hue("sex")
            .data(tips())
            .ci(CiSpec::None)
            .build()
            .unwrap();
        let series = plot.draw_data();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label.as_deref(), Some("m"));
        assert_eq!(series[1].label.as_deref(), Some("f"));

        // Two levels at width 0.8: offsets -0.2 and +0.2, sub-bars 0.4 wide
        assert_relative_eq!(series[0].positions[0], -0.2);
        assert_relative_eq!(series[1].positions[0], 0.2);
        assert_relative_eq!(series[0].width, 0.4);

        // Offsets center on the group position
        let offset_sum: f64 = series.iter().map(|s| s.positions[0]).sum();
        assert_relative_eq!(offset_sum, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_draw_data_hue_no_dodge_overlays() {
        let plot = BarPlot::new()
            .x("day")
            .y("bill")
            .hue("sex")
            .data(tips())
            .dodge(false)
            .ci(CiSpec::None)
            .build()
            .unwrap();
        let series = plot.draw_data();
        assert_relative_eq!(series[0].positions[0], 0.0);
        assert_relative_eq!(series[1].positions[0], 0.0);
        assert_relative_eq!(series[0].width, 0.8);
    }

    #[test]
    fn test_draw_data_missing_hue_cell_keeps_slot() {
        let mut df = DataFrame::new();
        df.add_column_str("g", &["a", "a", "b"]);
        df.add_column_str("h", &["x", "y", "x"]);
        df.add_column_f64("v", &[1.0, 2.0, 3.0]);
        let plot =
            BarPlot::new().x("g").y("v").hue("h").data(df).ci(CiSpec::None).build().unwrap();
        let series = plot.draw_data();
        // Level "y" has no data in group "b": NaN height, slot retained
        assert_eq!(series[1].heights.len(), 2);
        assert!(series[1].heights[1].is_nan());
    }

    #[test]
    fn test_annotations_vertical() {
        let plot = BarPlot::new()
            .x("day")
            .y("bill")
            .hue("sex")
            .data(tips())
            .ci(CiSpec::None)
            .build()
            .unwrap();
        let ann = plot.annotations();
        assert_eq!(ann.x_label.as_deref(), Some("day"));
        assert_eq!(ann.y_label.as_deref(), Some("bill"));
        assert_eq!(ann.tick_positions, vec![0.0, 1.0, 2.0]);
        assert_eq!(ann.tick_labels, vec!["thur", "fri", "sat"]);
        assert_eq!(ann.category_limits, (-0.5, 2.5));
        assert_eq!(ann.legend_title.as_deref(), Some("sex"));
        assert!(!ann.invert_category_axis);
    }

    #[test]
    fn test_annotations_horizontal_swaps_labels() {
        let plot = BarPlot::new()
            .x("bill")
            .y("day")
            .data(tips())
            .ci(CiSpec::None)
            .build()
            .unwrap();
        let ann = plot.annotations();
        assert_eq!(ann.x_label.as_deref(), Some("bill"));
        assert_eq!(ann.y_label.as_deref(), Some("day"));
        assert!(ann.invert_category_axis);
    }

    #[test]
    fn test_explicit_orders() {
        let plot = BarPlot::new()
            .x("day")
            .y("bill")
            .hue("sex")
            .data(tips())
            .order(&["sat", "thur"])
            .hue_order(&["f", "m"])
            .ci(CiSpec::None)
            .build()
            .unwrap();
        assert_eq!(plot.group_labels(), vec!["sat", "thur"]);
        assert_eq!(plot.hue_labels(), Some(vec!["f".to_string(), "m".to_string()]));
    }

    #[test]
    fn test_bar_width_clamp() {
        let plot = BarPlot::new().bar_width(2.0);
        assert_relative_eq!(plot.bar_width, 1.0);
        let plot = BarPlot::new().bar_width(0.0);
        assert_relative_eq!(plot.bar_width, 0.1);
    }

    #[test]
    fn test_single_hue_level_centered() {
        let mut df = DataFrame::new();
        df.add_column_str("g", &["a", "b"]);
        df.add_column_str("h", &["x", "x"]);
        df.add_column_f64("v", &[1.0, 2.0]);
        let plot =
            BarPlot::new().x("g").y("v").hue("h").data(df).ci(CiSpec::None).build().unwrap();
        let series = plot.draw_data();
        assert_eq!(series.len(), 1);
        assert_relative_eq!(series[0].positions[0], 0.0);
        assert_relative_eq!(series[0].width, 0.8);
    }

    #[test]
    fn test_barplot_default_and_debug_clone() {
        let plot = BarPlot::default().data(vec![1.0, 2.0]).ci(CiSpec::None);
        let plot2 = plot.clone();
        let _ = format!("{plot2:?}");
        let built = plot2.build().unwrap();
        let _ = format!("{built:?}");
    }

    #[test]
    fn test_seeded_build_reproducible() {
        let make = || {
            BarPlot::new()
                .x("day")
                .y("bill")
                .data(tips())
                .seed(21)
                .n_boot(200)
                .build()
                .unwrap()
        };
        let a = make();
        let b = make();
        assert_eq!(a.estimate(), b.estimate());
    }
}
