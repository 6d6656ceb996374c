use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::LineConfig;
use crate::data::model::{CellValue, Row, XValue};
use crate::error::{PrepError, Result};

/// Reads the x position of a row, parsing dates when a format is set.
#[derive(Debug, Clone, Copy)]
pub struct XAxis<'a> {
    field: &'a str,
    date_format: Option<&'a str>,
}

impl<'a> XAxis<'a> {
    pub fn new(field: &'a str, date_format: Option<&'a str>) -> Self {
        Self { field, date_format }
    }

    pub fn from_config(config: &'a LineConfig) -> Self {
        Self::new(&config.x_field, config.date_format.as_deref())
    }

    pub fn field(&self) -> &str {
        self.field
    }

    /// `None` when the row has no x value at all.
    pub fn resolve(&self, row_idx: usize, row: &Row) -> Result<Option<XValue>> {
        let Some(cell) = row.get(self.field) else {
            return Ok(None);
        };
        match (cell, self.date_format) {
            (CellValue::Null, _) => Ok(None),
            (CellValue::Date(d), _) => Ok(Some(XValue::Date(*d))),
            (cell, Some(format)) => {
                let text = cell.to_string();
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                parse_date(text, format)
                    .map(|d| Some(XValue::Date(d)))
                    .ok_or_else(|| PrepError::DateParse {
                        row: row_idx,
                        value: text.to_string(),
                        format: format.to_string(),
                    })
            }
            (cell, None) => Ok(XValue::from_cell(cell)),
        }
    }
}

/// Date-only formats land at midnight.
fn parse_date(text: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}
