use log::{debug, warn};
use serde::Serialize;

use super::axis::XAxis;
use super::ordering::Named;
use crate::data::model::{Dataset, XValue};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Line model
// ---------------------------------------------------------------------------

/// One defined sample of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub series: String,
    pub x: Option<XValue>,
    pub value: f64,
    pub annotate: Option<String>,
    pub highlight: Option<String>,
    /// Set from the row's own `highlight` marker.
    pub highlighted: bool,
}

/// A point, or a break in the line. Gaps serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LineEntry {
    Point(LinePoint),
    Gap,
}

impl LineEntry {
    pub fn point(&self) -> Option<&LinePoint> {
        match self {
            LineEntry::Point(p) => Some(p),
            LineEntry::Gap => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, LineEntry::Gap)
    }
}

/// Everything the renderer needs to draw one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesLine {
    pub name: String,
    pub line_data: Vec<LineEntry>,
    /// Whether the series is listed in `highlightNames`.
    pub highlight_line: bool,
}

impl Named for SeriesLine {
    fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Walk the rows in order and emit the points of `series`.
///
/// A missing cell becomes an explicit [`LineEntry::Gap`] unless
/// `join_points` is set, in which case the row is skipped and the line
/// runs straight from the previous point to the next one.
pub fn series_line(
    dataset: &Dataset,
    series: &str,
    join_points: bool,
    axis: &XAxis<'_>,
) -> Result<Vec<LineEntry>> {
    let mut line = Vec::with_capacity(dataset.len());

    for (i, row) in dataset.rows.iter().enumerate() {
        if row.is_missing(series) {
            if !join_points {
                line.push(LineEntry::Gap);
            }
            continue;
        }

        let value = row.number_or(i, series, 0.0)?;
        let x = axis.resolve(i, row)?;
        if x.is_none() {
            warn!("row {i}: '{series}' has a value but no '{}'", axis.field());
        }
        let highlight = row.highlight();

        line.push(LineEntry::Point(LinePoint {
            series: series.to_string(),
            x,
            value,
            annotate: row.annotate(),
            highlighted: highlight.is_some(),
            highlight,
        }));
    }

    debug!(
        "series '{series}': {} entries, {} gaps",
        line.len(),
        line.iter().filter(|e| e.is_gap()).count()
    );
    Ok(line)
}

/// Build one [`SeriesLine`] per name, in the order given.
pub fn series_lines(
    dataset: &Dataset,
    names: &[String],
    join_points: bool,
    highlight_names: &[String],
    axis: &XAxis<'_>,
) -> Result<Vec<SeriesLine>> {
    names
        .iter()
        .map(|name| {
            Ok(SeriesLine {
                name: name.clone(),
                line_data: series_line(dataset, name, join_points, axis)?,
                highlight_line: highlight_names.contains(name),
            })
        })
        .collect()
}
