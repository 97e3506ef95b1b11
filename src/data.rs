//! Columnar data model for plot input.
//!
//! Wide-form input is a [`DataInput`] variant resolved once at the API
//! boundary; long-form variables arrive as [`ColumnRef`]s that resolve to
//! named [`Series`] against an optional [`DataFrame`].

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// A value in a data frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// A numeric value.
    Number(f64),
    /// A text value.
    Text(String),
    /// A missing value.
    Null,
}

impl DataValue {
    /// Get as f64, or None if not a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Whether this value is missing.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Numeric coercion: numbers pass through, parseable text is parsed,
    /// missing values coerce to NaN. Non-numeric text does not coerce.
    #[must_use]
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            DataValue::Text(s) => s.trim().parse::<f64>().ok(),
            DataValue::Null => Some(f64::NAN),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            DataValue::Number(n) => write!(f, "{n}"),
            DataValue::Text(s) => f.write_str(s),
            DataValue::Null => Ok(()),
        }
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Number(v)
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Number(v as f64)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

/// An optionally named vector of values: the long-form variable carrier.
///
/// The name, when present, feeds axis and legend labels downstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    name: Option<String>,
    values: Vec<DataValue>,
}

impl Series {
    /// Create an unnamed series.
    #[must_use]
    pub fn new(values: Vec<DataValue>) -> Self {
        Self { name: None, values }
    }

    /// Create a named series.
    #[must_use]
    pub fn named(name: &str, values: Vec<DataValue>) -> Self {
        Self { name: Some(name.to_string()), values }
    }

    /// Create an unnamed numeric series.
    #[must_use]
    pub fn from_f64(values: &[f64]) -> Self {
        Self::new(values.iter().map(|&v| DataValue::Number(v)).collect())
    }

    /// Create a named numeric series.
    #[must_use]
    pub fn named_f64(name: &str, values: &[f64]) -> Self {
        let mut s = Self::from_f64(values);
        s.name = Some(name.to_string());
        s
    }

    /// Create an unnamed text series.
    #[must_use]
    pub fn from_strs(values: &[&str]) -> Self {
        Self::new(values.iter().map(|&s| DataValue::Text(s.to_string())).collect())
    }

    /// Series name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The underlying values.
    #[must_use]
    pub fn values(&self) -> &[DataValue] {
        &self.values
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether every value coerces to a float (missing values count as
    /// numeric; they coerce to NaN).
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.values.iter().all(|v| v.coerce_f64().is_some())
    }

    /// Coerce all values to floats; values that do not coerce become NaN.
    #[must_use]
    pub fn to_f64(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.coerce_f64().unwrap_or(f64::NAN)).collect()
    }
}

impl From<Vec<DataValue>> for Series {
    fn from(values: Vec<DataValue>) -> Self {
        Self::new(values)
    }
}

/// A simple columnar data frame with observable column order.
///
/// Column order matters: wide-form normalization without an explicit
/// `order` walks numeric columns in insertion order.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    names: Vec<String>,
    columns: HashMap<String, Vec<DataValue>>,
    n_rows: usize,
}

impl DataFrame {
    /// Create a new empty data frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column of values. Replacing a column keeps its original position.
    pub fn add_column(&mut self, name: &str, values: Vec<DataValue>) {
        if !self.columns.contains_key(name) {
            self.names.push(name.to_string());
        }
        self.n_rows = self.n_rows.max(values.len());
        self.columns.insert(name.to_string(), values);
    }

    /// Add a numeric column.
    pub fn add_column_f64(&mut self, name: &str, data: &[f64]) {
        self.add_column(name, data.iter().map(|&v| DataValue::Number(v)).collect());
    }

    /// Add a text column.
    pub fn add_column_str(&mut self, name: &str, data: &[&str]) {
        self.add_column(name, data.iter().map(|&s| DataValue::Text(s.to_string())).collect());
    }

    /// Get a column's values.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[DataValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Get a column as a named series.
    #[must_use]
    pub fn series(&self, name: &str) -> Option<Series> {
        self.columns.get(name).map(|values| Series {
            name: Some(name.to_string()),
            values: values.clone(),
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn nrow(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[must_use]
    pub fn ncol(&self) -> usize {
        self.names.len()
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in insertion order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.names
    }

    /// Names of fully numeric-castable columns, in insertion order.
    #[must_use]
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.names
            .iter()
            .filter(|name| {
                self.columns
                    .get(name.as_str())
                    .is_some_and(|col| col.iter().all(|v| v.coerce_f64().is_some()))
            })
            .map(String::as_str)
            .collect()
    }
}

/// A numeric buffer with an explicit row-major shape.
///
/// Ranks 1 and 2 are accepted by the normalizer; higher ranks are rejected
/// with [`Error::UnsupportedShape`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayData {
    data: Vec<f64>,
    shape: Vec<usize>,
}

impl ArrayData {
    /// Create a 1-D array.
    #[must_use]
    pub fn from_vec(data: Vec<f64>) -> Self {
        let shape = vec![data.len()];
        Self { data, shape }
    }

    /// Create an array with an explicit shape over a row-major buffer.
    #[must_use]
    pub fn from_shape(shape: Vec<usize>, data: Vec<f64>) -> Self {
        Self { data, shape }
    }

    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// The shape vector.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Split into per-group vectors per the wide-form rules: rank 1 is a
    /// single group, rank 2 is one group per column (or a single flattened
    /// group when either dimension is 1), higher ranks are an error.
    pub(crate) fn into_groups(self) -> Result<Vec<Vec<f64>>> {
        match self.shape.len() {
            0 | 1 => Ok(vec![self.data]),
            2 => {
                let (nr, nc) = (self.shape[0], self.shape[1]);
                if nr == 1 || nc == 1 {
                    Ok(vec![self.data])
                } else {
                    Ok((0..nc)
                        .map(|j| {
                            (0..nr)
                                .map(|i| self.data.get(i * nc + j).copied().unwrap_or(f64::NAN))
                                .collect()
                        })
                        .collect())
                }
            }
            ndim => Err(Error::UnsupportedShape { ndim }),
        }
    }
}

/// Wide-form plot input, resolved to a tagged variant at the API boundary.
#[derive(Debug, Clone)]
pub enum DataInput {
    /// A labeled columnar table.
    Table(DataFrame),
    /// A 1-D or 2-D numeric array.
    Array(ArrayData),
    /// A list of per-group vectors (1-D input with non-scalar elements).
    Nested(Vec<Vec<f64>>),
}

impl From<DataFrame> for DataInput {
    fn from(table: DataFrame) -> Self {
        DataInput::Table(table)
    }
}

impl From<ArrayData> for DataInput {
    fn from(array: ArrayData) -> Self {
        DataInput::Array(array)
    }
}

impl From<Vec<Vec<f64>>> for DataInput {
    fn from(groups: Vec<Vec<f64>>) -> Self {
        DataInput::Nested(groups)
    }
}

impl From<Vec<f64>> for DataInput {
    fn from(values: Vec<f64>) -> Self {
        DataInput::Array(ArrayData::from_vec(values))
    }
}

impl From<&[f64]> for DataInput {
    fn from(values: &[f64]) -> Self {
        DataInput::Array(ArrayData::from_vec(values.to_vec()))
    }
}

/// A long-form variable reference: either a column name to look up in the
/// input table, or literal values supplied directly.
///
/// Resolution is explicit: a [`ColumnRef::Name`] that cannot be looked up is
/// [`Error::UnresolvedColumn`], never a silent fallback to a literal.
#[derive(Debug, Clone)]
pub enum ColumnRef {
    /// A column name resolved against the input table.
    Name(String),
    /// Literal values used as-is.
    Values(Series),
}

impl ColumnRef {
    /// Reference a column by name.
    #[must_use]
    pub fn name(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }

    /// Supply literal values.
    #[must_use]
    pub fn values(series: Series) -> Self {
        ColumnRef::Values(series)
    }

    /// Resolve against an optional table.
    pub(crate) fn resolve(&self, table: Option<&DataFrame>) -> Result<Series> {
        match self {
            ColumnRef::Name(name) => table
                .and_then(|t| t.series(name))
                .ok_or_else(|| Error::UnresolvedColumn { name: name.clone() }),
            ColumnRef::Values(series) => Ok(series.clone()),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<Series> for ColumnRef {
    fn from(series: Series) -> Self {
        ColumnRef::Values(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_value_conversions() {
        let num: DataValue = 42.0f64.into();
        assert_eq!(num.as_f64(), Some(42.0));

        let text: DataValue = "hello".into();
        assert_eq!(text.as_str(), Some("hello"));
    }

    #[test]
    fn test_data_value_coerce() {
        assert_eq!(DataValue::Number(1.5).coerce_f64(), Some(1.5));
        assert_eq!(DataValue::Text("2.5".into()).coerce_f64(), Some(2.5));
        assert_eq!(DataValue::Text(" 3 ".into()).coerce_f64(), Some(3.0));
        assert_eq!(DataValue::Text("abc".into()).coerce_f64(), None);
        assert!(DataValue::Null.coerce_f64().is_some_and(f64::is_nan));
    }

    #[test]
    fn test_data_value_display() {
        assert_eq!(DataValue::Number(3.0).to_string(), "3");
        assert_eq!(DataValue::Number(3.25).to_string(), "3.25");
        assert_eq!(DataValue::Text("sat".into()).to_string(), "sat");
        assert_eq!(DataValue::Null.to_string(), "");
    }

    #[test]
    fn test_series_numeric() {
        let s = Series::from_f64(&[1.0, 2.0]);
        assert!(s.is_numeric());

        let t = Series::from_strs(&["a", "b"]);
        assert!(!t.is_numeric());

        let mixed = Series::new(vec![DataValue::Number(1.0), DataValue::Null]);
        assert!(mixed.is_numeric());
    }

    #[test]
    fn test_series_to_f64() {
        let s = Series::new(vec![
            DataValue::Number(1.0),
            DataValue::Text("2".into()),
            DataValue::Text("x".into()),
            DataValue::Null,
        ]);
        let vals = s.to_f64();
        assert_eq!(vals[0], 1.0);
        assert_eq!(vals[1], 2.0);
        assert!(vals[2].is_nan());
        assert!(vals[3].is_nan());
    }

    #[test]
    fn test_series_named() {
        let s = Series::named("bill", vec![DataValue::Number(1.0)]);
        assert_eq!(s.name(), Some("bill"));
        assert_eq!(s.len(), 1);
        assert!(!s.is_empty());
    }

    #[test]
    fn test_dataframe_column_order() {
        let mut df = DataFrame::new();
        df.add_column_f64("b", &[1.0]);
        df.add_column_f64("a", &[2.0]);
        assert_eq!(df.columns(), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_dataframe_replace_keeps_position() {
        let mut df = DataFrame::new();
        df.add_column_f64("a", &[1.0]);
        df.add_column_f64("b", &[2.0]);
        df.add_column_f64("a", &[3.0]);
        assert_eq!(df.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(df.ncol(), 2);
    }

    #[test]
    fn test_dataframe_numeric_columns() {
        let mut df = DataFrame::new();
        df.add_column_f64("x", &[1.0, 2.0]);
        df.add_column_str("label", &["a", "b"]);
        df.add_column("coded", vec![DataValue::Text("1".into()), DataValue::Null]);
        assert_eq!(df.numeric_columns(), vec!["x", "coded"]);
    }

    #[test]
    fn test_dataframe_series_named() {
        let mut df = DataFrame::new();
        df.add_column_f64("x", &[1.0, 2.0]);
        let s = df.series("x").unwrap();
        assert_eq!(s.name(), Some("x"));
        assert_eq!(s.len(), 2);
        assert!(df.series("missing").is_none());
    }

    #[test]
    fn test_dataframe_nrow_ncol() {
        let mut df = DataFrame::new();
        df.add_column_f64("x", &[1.0, 2.0, 3.0]);
        df.add_column_str("g", &["a", "b", "c"]);
        assert_eq!(df.nrow(), 3);
        assert_eq!(df.ncol(), 2);
        assert!(df.has_column("x"));
        assert!(!df.has_column("y"));
    }

    #[test]
    fn test_array_1d_groups() {
        let groups = ArrayData::from_vec(vec![1.0, 2.0, 3.0]).into_groups().unwrap();
        assert_eq!(groups, vec![vec![1.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_array_2d_groups_by_column() {
        let arr = ArrayData::from_shape(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let groups = arr.into_groups().unwrap();
        assert_eq!(groups, vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
    }

    #[test]
    fn test_array_2d_degenerate_flattens() {
        let row = ArrayData::from_shape(vec![1, 4], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(row.into_groups().unwrap(), vec![vec![1.0, 2.0, 3.0, 4.0]]);

        let col = ArrayData::from_shape(vec![4, 1], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(col.into_groups().unwrap(), vec![vec![1.0, 2.0, 3.0, 4.0]]);
    }

    #[test]
    fn test_array_3d_rejected() {
        let arr = ArrayData::from_shape(vec![2, 2, 2], vec![0.0; 8]);
        assert!(matches!(arr.into_groups(), Err(Error::UnsupportedShape { ndim: 3 })));
    }

    #[test]
    fn test_column_ref_resolves_name() {
        let mut df = DataFrame::new();
        df.add_column_f64("x", &[1.0]);
        let series = ColumnRef::name("x").resolve(Some(&df)).unwrap();
        assert_eq!(series.name(), Some("x"));
    }

    #[test]
    fn test_column_ref_unresolved_name() {
        let result = ColumnRef::name("x").resolve(None);
        assert!(matches!(result, Err(Error::UnresolvedColumn { name }) if name == "x"));
    }

    #[test]
    fn test_column_ref_literal_values() {
        let series = Series::from_f64(&[1.0, 2.0]);
        let resolved = ColumnRef::values(series.clone()).resolve(None).unwrap();
        assert_eq!(resolved, series);
    }

    #[test]
    fn test_data_input_from_impls() {
        let _: DataInput = DataFrame::new().into();
        let _: DataInput = ArrayData::from_vec(vec![1.0]).into();
        let _: DataInput = vec![vec![1.0], vec![2.0]].into();
        let _: DataInput = vec![1.0, 2.0].into();
    }
}
