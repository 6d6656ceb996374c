use log::warn;
use serde::Serialize;

use super::axis::XAxis;
use crate::data::filter::{boundary_indices, Boundary};
use crate::data::model::{Dataset, XValue};
use crate::error::{PrepError, Result};

/// A shaded band on the x axis, `begin` strictly before `end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalBand {
    pub begin: XValue,
    pub end: XValue,
}

/// Pair every `begin` row with the boundary row that immediately follows
/// it, which must be an `end`.
///
/// An `end` that does not close a `begin` is skipped with a warning.
pub fn highlight_bands(dataset: &Dataset, axis: &XAxis<'_>) -> Result<Vec<IntervalBand>> {
    let boundaries = boundary_indices(dataset);
    let mut bands = Vec::new();
    let mut pos = 0;

    while pos < boundaries.len() {
        let (begin_idx, kind) = boundaries[pos];
        if kind == Boundary::End {
            warn!("row {begin_idx}: highlight 'end' without a matching 'begin', ignored");
            pos += 1;
            continue;
        }

        let end_idx = match boundaries.get(pos + 1) {
            Some(&(idx, Boundary::End)) => idx,
            Some(&(idx, Boundary::Begin)) => {
                return Err(PrepError::MalformedHighlightRange {
                    row: begin_idx,
                    reason: format!("next boundary at row {idx} is another 'begin'"),
                })
            }
            None => {
                return Err(PrepError::MalformedHighlightRange {
                    row: begin_idx,
                    reason: "'begin' is never closed by an 'end'".to_string(),
                })
            }
        };

        let begin = boundary_x(dataset, axis, begin_idx)?;
        let end = boundary_x(dataset, axis, end_idx)?;
        if begin.precedes(&end) == Some(false) {
            return Err(PrepError::MalformedHighlightRange {
                row: begin_idx,
                reason: format!("begin {begin} is not before end {end}"),
            });
        }

        bands.push(IntervalBand { begin, end });
        pos += 2;
    }

    Ok(bands)
}

fn boundary_x(dataset: &Dataset, axis: &XAxis<'_>, idx: usize) -> Result<XValue> {
    axis.resolve(idx, &dataset.rows[idx])?
        .ok_or_else(|| PrepError::MalformedHighlightRange {
            row: idx,
            reason: format!("boundary row has no '{}' value", axis.field()),
        })
}
