use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::model::DATE;

// ---------------------------------------------------------------------------
// Per-invocation configuration
// ---------------------------------------------------------------------------

/// Options for the small-multiple line variant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineConfig {
    /// Substituted for missing or `*` cells when computing the value extent.
    pub y_min: f64,
    /// Bridge gaps by dropping missing points instead of breaking the line.
    pub join_points: bool,
    /// Series drawn on top, last entry topmost.
    pub highlight_names: Vec<String>,
    /// `strftime` pattern for the x column; raw cells are used when unset.
    pub date_format: Option<String>,
    /// Column holding the x position of each row.
    pub x_field: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            y_min: 0.0,
            join_points: false,
            highlight_names: Vec::new(),
            date_format: None,
            x_field: DATE.to_string(),
        }
    }
}

impl LineConfig {
    pub fn with_y_min(mut self, y_min: f64) -> Self {
        self.y_min = y_min;
        self
    }

    pub fn with_join_points(mut self, join_points: bool) -> Self {
        self.join_points = join_points;
        self
    }

    pub fn with_highlight_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.highlight_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = Some(format.to_string());
        self
    }

    pub fn with_x_field(mut self, field: &str) -> Self {
        self.x_field = field.to_string();
        self
    }
}

/// Options for the circle-packing hierarchy variant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HierarchyConfig {
    /// Name of the synthesized root node.
    pub root_name: String,
    /// Column summed up the tree.
    pub attr_to_show: String,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            root_name: "root".to_string(),
            attr_to_show: "value".to_string(),
        }
    }
}

impl HierarchyConfig {
    pub fn with_root_name(mut self, root_name: &str) -> Self {
        self.root_name = root_name.to_string();
        self
    }

    pub fn with_attr_to_show(mut self, attr: &str) -> Self {
        self.attr_to_show = attr.to_string();
        self
    }
}

/// A config file names the chart variant it is meant for.
///
/// ```json
/// { "kind": "lines", "yMin": 0, "joinPoints": true, "highlightNames": ["UK"] }
/// { "kind": "hierarchy", "rootName": "world", "attrToShow": "population" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PipelineConfig {
    Lines(LineConfig),
    Hierarchy(HierarchyConfig),
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing pipeline config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_config_defaults_fill_missing_fields() {
        let cfg = PipelineConfig::from_json(r#"{"kind": "lines", "joinPoints": true}"#).unwrap();
        let PipelineConfig::Lines(lines) = cfg else {
            panic!("expected line config");
        };
        assert!(lines.join_points);
        assert_eq!(lines.y_min, 0.0);
        assert_eq!(lines.x_field, "date");
        assert!(lines.highlight_names.is_empty());
    }

    #[test]
    fn hierarchy_config_reads_camel_case() {
        let cfg = PipelineConfig::from_json(
            r#"{"kind": "hierarchy", "rootName": "world", "attrToShow": "pop"}"#,
        )
        .unwrap();
        assert_eq!(
            cfg,
            PipelineConfig::Hierarchy(
                HierarchyConfig::default()
                    .with_root_name("world")
                    .with_attr_to_show("pop")
            )
        );
    }

    #[test]
    fn unknown_kind_is_an_error() {
        assert!(PipelineConfig::from_json(r#"{"kind": "pie"}"#).is_err());
    }
}
