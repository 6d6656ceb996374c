use crate::data::filter::annotated_indices;
use crate::data::model::{Dataset, Row};

/// Copies of the rows carrying an `annotate` marker, in dataset order.
pub fn annotations(dataset: &Dataset) -> Vec<Row> {
    annotated_indices(dataset)
        .into_iter()
        .map(|i| dataset.rows[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_annotated_rows_in_order() {
        let ds = Dataset::from_rows(vec![
            Row::new().with("date", "1").with("annotate", "first"),
            Row::new().with("date", "2"),
            Row::new().with("date", "3").with("annotate", "second"),
        ]);
        let annos = annotations(&ds);
        assert_eq!(annos.len(), 2);
        assert_eq!(annos[0].annotate().as_deref(), Some("first"));
        assert_eq!(annos[1].text("date"), "3");
    }

    #[test]
    fn whitespace_annotation_is_kept_verbatim() {
        let ds = Dataset::from_rows(vec![
            Row::new().with("date", "1").with("annotate", "  "),
            Row::new().with("date", "2").with("annotate", ""),
        ]);
        let annos = annotations(&ds);
        assert_eq!(annos.len(), 1);
        assert_eq!(annos[0].annotate().as_deref(), Some("  "));
    }
}
