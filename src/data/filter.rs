use super::model::{Dataset, Row};

// ---------------------------------------------------------------------------
// Row predicates over the markup columns
// ---------------------------------------------------------------------------

/// Which end of a highlight band a row marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Begin,
    End,
}

impl Boundary {
    /// Only the exact markers `begin` and `end` count; anything else in the
    /// `highlight` column is ignored.
    pub fn of(row: &Row) -> Option<Boundary> {
        match row.highlight()?.as_str() {
            "begin" => Some(Boundary::Begin),
            "end" => Some(Boundary::End),
            _ => None,
        }
    }
}

/// Return indices of rows carrying a non-empty `annotate` marker.
pub fn annotated_indices(dataset: &Dataset) -> Vec<usize> {
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.annotate().is_some())
        .map(|(i, _)| i)
        .collect()
}

/// Return the boundary sequence: indices of rows flagged `begin`/`end`,
/// in dataset order.
pub fn boundary_indices(dataset: &Dataset) -> Vec<(usize, Boundary)> {
    dataset
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| Boundary::of(row).map(|b| (i, b)))
        .collect()
}
