//! High-level plot types.
//!
//! Provides ready-to-use plot builders over the normalize/estimate pipeline.

mod bar;

pub use bar::{AxisAnnotations, BarPlot, BarSeries, BuiltBarPlot, ErrorBar};
