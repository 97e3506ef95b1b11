//! # Catplot
//!
//! Categorical bar-plot statistics for plotting backends: wide/long-form
//! input normalization, grouped and hue-nested point estimates, and
//! bootstrap confidence intervals.
//!
//! The crate is the statistical front half of a bar chart. It normalizes
//! heterogeneous input shapes (labeled tables, 1-D/2-D arrays, long-form
//! column references) into an ordered per-group representation, estimates
//! a statistic per bar with optional confidence-interval whiskers, and
//! emits a backend-agnostic draw specification. Rendering stays external:
//! any backend that can draw rectangles and line segments can consume the
//! output.
//!
//! ## Quick Start
//!
//! ```rust
//! use catplot::prelude::*;
//!
//! let mut table = DataFrame::new();
//! table.add_column_str("day", &["thur", "thur", "fri", "fri"]);
//! table.add_column_f64("bill", &[17.0, 21.0, 15.0, 19.0]);
//!
//! let plot = BarPlot::new()
//!     .x("day")
//!     .y("bill")
//!     .data(table)
//!     .ci(CiSpec::StdDev)
//!     .build()?;
//!
//! assert_eq!(plot.num_groups(), 2);
//! let series = plot.draw_data();
//! assert_eq!(series[0].positions, vec![0.0, 1.0]);
//! # Ok::<(), catplot::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in statistics code
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Columnar data model for plot input.
pub mod data;

/// Input normalization into the uniform plot spec.
pub mod normalize;

/// Descriptive statistics and bootstrap resampling.
pub mod stats;

/// Statistic estimation over a normalized plot spec.
pub mod estimate;

// ============================================================================
// Visualization Modules
// ============================================================================

/// High-level plot types (bar plots with confidence intervals).
pub mod plots;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for catplot operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use catplot::prelude::*;
/// ```
pub mod prelude {
    pub use crate::data::{ArrayData, ColumnRef, DataFrame, DataInput, DataValue, Series};
    pub use crate::error::{Error, Result};
    pub use crate::estimate::{
        estimate_statistic, CiSpec, EstimateConfig, EstimateResult, Estimator, Interval,
        IntervalValues, StatValues,
    };
    pub use crate::normalize::{normalize, Orient, PlotInput, PlotSpec};
    pub use crate::plots::{AxisAnnotations, BarPlot, BarSeries, BuiltBarPlot, ErrorBar};
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #[test]
    fn test_library_compiles() {
        // Smoke test to ensure the library compiles
        assert!(true);
    }
}
