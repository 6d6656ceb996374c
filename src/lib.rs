//! Data preparation for two chart families: circle-packing hierarchies and
//! small-multiple line charts.
//!
//! Load a [`Dataset`] (or build one in memory), then hand it to
//! [`prepare_lines`] or [`prepare_hierarchy`] together with its config.

pub mod config;
pub mod data;
pub mod error;
pub mod prep;

pub use config::{HierarchyConfig, LineConfig, PipelineConfig};
pub use data::model::{CellValue, Dataset, Row, XValue};
pub use error::{PrepError, Result};
pub use prep::extent::Extent;
pub use prep::hierarchy::HierarchyNode;
pub use prep::intervals::IntervalBand;
pub use prep::lines::{LineEntry, LinePoint, SeriesLine};
pub use prep::{prepare_hierarchy, prepare_lines, HierarchyData, LineChartData};
