use log::debug;
use serde::Serialize;

use crate::data::model::Dataset;
use crate::error::Result;

/// `[min, max]` of a set of numbers. `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Extent of `values`, `None` when there are none.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Extent> {
        values.into_iter().fold(None, |acc, v| {
            Some(match acc {
                None => Extent { min: v, max: v },
                Some(e) => e.include(v),
            })
        })
    }

    pub fn include(self, v: f64) -> Extent {
        Extent {
            min: self.min.min(v),
            max: self.max.max(v),
        }
    }

    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }
}

/// Flat min/max over every selected cell of every row. Missing and `*`
/// cells count as `substitute`.
pub fn extent_multi<S: AsRef<str>>(
    dataset: &Dataset,
    columns: &[S],
    substitute: f64,
) -> Result<Option<Extent>> {
    let mut extent: Option<Extent> = None;
    for (i, row) in dataset.rows.iter().enumerate() {
        for col in columns {
            let v = row.number_or(i, col.as_ref(), substitute)?;
            extent = Some(match extent {
                None => Extent { min: v, max: v },
                Some(e) => e.include(v),
            });
        }
    }
    debug!("value extent over {} columns: {:?}", columns.len(), extent);
    Ok(extent)
}
