/// Preparation pipeline: turns a loaded [`Dataset`] into chart-ready shapes.
///
/// ```text
///                  ┌─────────┐
///   Dataset ──────▶│ catalog │ series names
///                  └─────────┘
///                    │     │
///          lines ◀───┘     └───▶ hierarchy
///   ┌──────────────────────┐   ┌──────────────────────┐
///   │ extent / lines /     │   │ root + group nodes,  │
///   │ annotations / bands /│   │ stratify, sum values │
///   │ highlight ordering   │   │                      │
///   └──────────────────────┘   └──────────────────────┘
/// ```
///
/// Every step reads the dataset through a shared reference and returns new
/// values; the caller's rows are never modified.

pub mod annotations;
pub mod axis;
pub mod catalog;
pub mod extent;
pub mod hierarchy;
pub mod intervals;
pub mod lines;
pub mod ordering;

use log::{debug, info};
use serde::Serialize;

use crate::config::{HierarchyConfig, LineConfig};
use crate::data::model::{Dataset, Row, RESERVED_FIELDS};
use crate::error::{PrepError, Result};

use self::axis::XAxis;
use self::extent::Extent;
use self::hierarchy::HierarchyNode;
use self::intervals::IntervalBand;
use self::lines::SeriesLine;

// ---------------------------------------------------------------------------
// Output shapes
// ---------------------------------------------------------------------------

/// Input for a small-multiple line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChartData {
    pub series_names: Vec<String>,
    /// One entry per series, highlighted series last.
    pub plot_data: Vec<SeriesLine>,
    pub value_extent: Option<Extent>,
    pub highlights: Vec<IntervalBand>,
    pub annotations: Vec<Row>,
}

/// Input for a circle-packing chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyData {
    /// Input rows followed by the synthesized root and group rows.
    pub data: Vec<Row>,
    pub plot_data: HierarchyNode,
    /// Extent of the value column over the input rows only.
    pub value_extent: Option<Extent>,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub fn prepare_lines(dataset: &Dataset, config: &LineConfig) -> Result<LineChartData> {
    info!(
        "preparing line chart data: {} rows, join_points={}",
        dataset.len(),
        config.join_points
    );
    let axis = XAxis::from_config(config);

    let mut reserved: Vec<&str> = RESERVED_FIELDS.to_vec();
    reserved.push(axis.field());
    let series_names = catalog::series_names(&dataset.columns, &reserved[..]);

    let value_extent = extent::extent_multi(dataset, &series_names, config.y_min)?;

    let plot_data = lines::series_lines(
        dataset,
        &series_names,
        config.join_points,
        &config.highlight_names,
        &axis,
    )?;
    let plot_data = ordering::order_by_highlight(plot_data, &config.highlight_names);

    let annotations = annotations::annotations(dataset);
    let highlights = intervals::highlight_bands(dataset, &axis)?;

    info!(
        "prepared {} series, {} highlight bands, {} annotations",
        series_names.len(),
        highlights.len(),
        annotations.len()
    );
    Ok(LineChartData {
        series_names,
        plot_data,
        value_extent,
        highlights,
        annotations,
    })
}

pub fn prepare_hierarchy(dataset: &Dataset, config: &HierarchyConfig) -> Result<HierarchyData> {
    info!(
        "preparing hierarchy '{}' over '{}': {} rows",
        config.root_name,
        config.attr_to_show,
        dataset.len()
    );
    // The summed column must be a data column, not a name/group marker.
    let value_columns = catalog::series_names(&dataset.columns, &RESERVED_FIELDS[..]);
    if dataset.columns.contains(&config.attr_to_show)
        && !value_columns.contains(&config.attr_to_show)
    {
        return Err(PrepError::InputShape {
            column: config.attr_to_show.clone(),
        });
    }
    debug!("value columns available: {value_columns:?}");

    let hierarchy = hierarchy::build_hierarchy(dataset, config)?;
    info!(
        "hierarchy total {} across {} nodes",
        hierarchy.root.aggregate_value,
        hierarchy.rows.len()
    );
    Ok(HierarchyData {
        data: hierarchy.rows,
        plot_data: hierarchy.root,
        value_extent: hierarchy.value_extent,
    })
}
