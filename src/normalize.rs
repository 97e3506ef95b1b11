//! Input normalization: wide- and long-form data into a uniform plot spec.
//!
//! This is the first of the two pipeline stages. It accepts heterogeneous
//! input shapes (labeled tables, 1-D/2-D arrays, nested vectors, or
//! long-form column references with optional hue/units grouping) and
//! produces a [`PlotSpec`]: an ordered list of per-group numeric vectors
//! plus parallel label/unit vectors and axis metadata.

use tracing::debug;

use crate::data::{ColumnRef, DataFrame, DataInput, DataValue, Series};
use crate::error::{Error, Result};

/// Plot orientation: which axis carries the numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orient {
    /// Categories on x, values on y.
    #[default]
    Vertical,
    /// Categories on y, values on x.
    Horizontal,
}

impl Orient {
    /// Parse an orientation request by prefix: `"v"`/`"vertical"` and
    /// `"h"`/`"horizontal"` both work. Anything else is no request.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.starts_with('v') {
            Some(Orient::Vertical)
        } else if s.starts_with('h') {
            Some(Orient::Horizontal)
        } else {
            None
        }
    }

    /// Whether categories run along the y axis.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        self == Orient::Horizontal
    }
}

/// Caller input to [`normalize`].
///
/// Leaving both `x` and `y` unset selects wide-form mode over `data`;
/// setting either selects long-form mode with column-reference resolution.
#[derive(Debug, Clone, Default)]
pub struct PlotInput {
    /// Long-form x variable.
    pub x: Option<ColumnRef>,
    /// Long-form y variable.
    pub y: Option<ColumnRef>,
    /// Secondary grouping variable for hue nesting.
    pub hue: Option<ColumnRef>,
    /// Statistical-unit identifiers for block resampling.
    pub units: Option<ColumnRef>,
    /// Wide-form data, or the lookup table for long-form references.
    pub data: Option<DataInput>,
    /// Explicit orientation request; wins over inference.
    pub orient: Option<Orient>,
    /// Explicit group order.
    pub order: Option<Vec<DataValue>>,
    /// Explicit hue level order.
    pub hue_order: Option<Vec<DataValue>>,
}

/// The normalized plot description shared by all categorical estimators.
///
/// Invariant: `plot_data`, `plot_hues` (if present), and `plot_units` (if
/// present) have the same group count and identical per-group lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    /// Plot orientation.
    pub orient: Orient,
    /// Ordered group identifiers (column labels, indices, or category keys).
    pub group_names: Vec<DataValue>,
    /// One numeric vector per group.
    pub plot_data: Vec<Vec<f64>>,
    /// Hue labels parallel to `plot_data`, when hue nesting is requested.
    pub plot_hues: Option<Vec<Vec<DataValue>>>,
    /// Ordered hue levels, when hue nesting is requested.
    pub hue_names: Option<Vec<DataValue>>,
    /// Statistical-unit identifiers parallel to `plot_data`.
    pub plot_units: Option<Vec<Vec<DataValue>>>,
    /// Label for the value axis.
    pub value_label: Option<String>,
    /// Label for the category axis.
    pub group_label: Option<String>,
    /// Legend title for hue nesting.
    pub hue_title: Option<String>,
}

impl PlotSpec {
    /// Number of groups.
    #[must_use]
    pub fn n_groups(&self) -> usize {
        self.plot_data.len()
    }

    fn ungrouped(orient: Orient) -> Self {
        Self {
            orient,
            group_names: Vec::new(),
            plot_data: Vec::new(),
            plot_hues: None,
            hue_names: None,
            plot_units: None,
            value_label: None,
            group_label: None,
            hue_title: None,
        }
    }
}

/// Convert an input specification into the common representation.
///
/// # Errors
///
/// Returns an error for malformed caller input: hue without an axis, a
/// reorder request on unlabeled data, arrays above rank 2, column
/// references that do not resolve, mismatched variable lengths, or
/// long-form grouping where neither axis is numeric.
pub fn normalize(input: PlotInput) -> Result<PlotSpec> {
    if input.x.is_none() && input.y.is_none() {
        normalize_wide(input)
    } else {
        normalize_long(input)
    }
}

/// Wide-form mode: every column (or array slice) is its own group.
fn normalize_wide(input: PlotInput) -> Result<PlotSpec> {
    if input.hue.is_some() {
        return Err(Error::HueWithoutAxes);
    }

    let orient = input.orient.unwrap_or(Orient::Vertical);
    let mut spec = PlotSpec::ungrouped(orient);

    match input.data {
        Some(DataInput::Table(table)) => {
            let selected: Vec<String> = match &input.order {
                Some(order) => {
                    let mut names = Vec::with_capacity(order.len());
                    for key in order {
                        let name = key.to_string();
                        if !table.has_column(&name) {
                            return Err(Error::UnresolvedColumn { name });
                        }
                        names.push(name);
                    }
                    names
                }
                None => table.numeric_columns().iter().map(ToString::to_string).collect(),
            };

            spec.plot_data = selected
                .iter()
                .filter_map(|name| table.series(name))
                .map(|s| s.to_f64())
                .collect();
            spec.group_names = selected.into_iter().map(DataValue::Text).collect();
        }
        other => {
            // Unlabeled data cannot be reordered
            if input.order.is_some() {
                return Err(Error::ReorderRequiresTable);
            }
            spec.plot_data = match other {
                Some(DataInput::Array(array)) => array.into_groups()?,
                Some(DataInput::Nested(groups)) => groups,
                Some(DataInput::Table(_)) => unreachable!("table handled above"),
                None => vec![Vec::new()],
            };
            spec.group_names =
                (0..spec.plot_data.len()).map(|i| DataValue::Number(i as f64)).collect();
        }
    }

    debug!(groups = spec.n_groups(), orient = ?spec.orient, "normalized wide-form input");
    Ok(spec)
}

/// Long-form mode: one variable holds values, another the group keys.
fn normalize_long(input: PlotInput) -> Result<PlotSpec> {
    let table = match &input.data {
        Some(DataInput::Table(t)) => Some(t),
        _ => None,
    };

    let x = resolve_opt(input.x.as_ref(), table)?;
    let y = resolve_opt(input.y.as_ref(), table)?;
    let hue = resolve_opt(input.hue.as_ref(), table)?;
    let units = resolve_opt(input.units.as_ref(), table)?;

    let orient = infer_orient(x.as_ref(), y.as_ref(), input.orient)?;

    match (x, y) {
        // A single set of values with no grouping
        (Some(vals), None) | (None, Some(vals)) => {
            let mut spec = PlotSpec::ungrouped(orient);
            spec.value_label = vals.name().map(String::from);
            spec.plot_data = vec![vals.to_f64()];
            debug!(orient = ?spec.orient, "normalized ungrouped long-form input");
            Ok(spec)
        }

        // Values grouped by the categorical variable
        (Some(xs), Some(ys)) => {
            let (vals, groups) = match orient {
                Orient::Vertical => (ys, xs),
                Orient::Horizontal => (xs, ys),
            };

            check_len(&vals, &groups)?;

            let mut spec = PlotSpec::ungrouped(orient);
            spec.group_label = groups.name().map(String::from);
            spec.group_names = categorical_order(&groups, input.order.as_deref());

            let (grouped_vals, value_label) = group_longform(&vals, &groups, &spec.group_names);
            spec.value_label = value_label;
            spec.plot_data = grouped_vals
                .into_iter()
                .map(|g| g.iter().map(|v| v.coerce_f64().unwrap_or(f64::NAN)).collect())
                .collect();

            if let Some(hue) = hue {
                check_len(&vals, &hue)?;
                spec.hue_names = Some(categorical_order(&hue, input.hue_order.as_deref()));
                let (plot_hues, hue_title) = group_longform(&hue, &groups, &spec.group_names);
                spec.plot_hues = Some(plot_hues);
                spec.hue_title = hue_title;
            }

            if let Some(units) = units {
                check_len(&vals, &units)?;
                let (plot_units, _) = group_longform(&units, &groups, &spec.group_names);
                spec.plot_units = Some(plot_units);
            }

            debug!(
                groups = spec.n_groups(),
                hues = spec.hue_names.as_ref().map_or(0, Vec::len),
                orient = ?spec.orient,
                "normalized grouped long-form input"
            );
            Ok(spec)
        }

        (None, None) => unreachable!("wide-form handled by caller"),
    }
}

fn resolve_opt(r: Option<&ColumnRef>, table: Option<&DataFrame>) -> Result<Option<Series>> {
    r.map(|r| r.resolve(table)).transpose()
}

fn check_len(vals: &Series, other: &Series) -> Result<()> {
    if vals.len() == other.len() {
        Ok(())
    } else {
        Err(Error::LengthMismatch { expected: vals.len(), actual: other.len() })
    }
}

/// Determine how the plot should be oriented based on the data.
///
/// An explicit request wins. Otherwise a missing axis decides, and with
/// both axes present the non-numeric one is treated as categorical.
///
/// # Errors
///
/// Returns [`Error::NoNumericAxis`] when both axes are non-numeric.
pub fn infer_orient(
    x: Option<&Series>,
    y: Option<&Series>,
    requested: Option<Orient>,
) -> Result<Orient> {
    if let Some(orient) = requested {
        return Ok(orient);
    }
    match (x, y) {
        (None, _) => Ok(Orient::Vertical),
        (_, None) => Ok(Orient::Horizontal),
        (Some(xs), Some(ys)) => {
            if ys.is_numeric() {
                Ok(Orient::Vertical)
            } else if xs.is_numeric() {
                Ok(Orient::Horizontal)
            } else {
                Err(Error::NoNumericAxis)
            }
        }
    }
}

/// The ordered category levels of a variable: the explicit order when
/// given, else first-seen order of non-null values.
#[must_use]
pub fn categorical_order(series: &Series, order: Option<&[DataValue]>) -> Vec<DataValue> {
    match order {
        Some(order) => order.to_vec(),
        None => {
            let mut seen: Vec<DataValue> = Vec::new();
            for value in series.values() {
                if value.is_null() {
                    continue;
                }
                if !seen.contains(value) {
                    seen.push(value.clone());
                }
            }
            seen
        }
    }
}

/// Partition a long-form variable by the grouping variable, one sub-vector
/// per declared group key. A key with no matching rows yields an empty
/// vector. Also returns the variable's name for axis/legend labeling.
fn group_longform(
    vals: &Series,
    grouper: &Series,
    order: &[DataValue],
) -> (Vec<Vec<DataValue>>, Option<String>) {
    let out = order
        .iter()
        .map(|key| {
            grouper
                .values()
                .iter()
                .zip(vals.values())
                .filter(|(g, _)| *g == key)
                .map(|(_, v)| v.clone())
                .collect()
        })
        .collect();
    (out, vals.name().map(String::from))
}
