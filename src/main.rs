use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use chart_prep::data::loader::load_file;
use chart_prep::{prepare_hierarchy, prepare_lines, HierarchyConfig, LineConfig, PipelineConfig};

#[derive(Parser)]
#[command(name = "chart-prep")]
#[command(about = "Prepare tabular data for circle-packing and small-multiple line charts")]
#[command(version = "0.1.0")]
struct Cli {
    /// Input file (.csv, .tsv, .json or .parquet)
    input: PathBuf,

    /// JSON config file with a "kind" of "lines" or "hierarchy"
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the prepared JSON here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare per-series lines, extent, bands and annotations
    Lines {
        /// Value substituted for missing cells in the extent
        #[arg(long)]
        y_min: Option<f64>,
        /// Bridge missing values instead of breaking lines
        #[arg(long)]
        join_points: bool,
        /// Series to draw on top (comma-separated, last is topmost)
        #[arg(long, value_delimiter = ',')]
        highlight: Vec<String>,
        /// strftime pattern of the x column, e.g. %Y-%m-%d
        #[arg(long)]
        date_format: Option<String>,
        /// Column holding the x position
        #[arg(long)]
        x_field: Option<String>,
    },
    /// Prepare a root/group/leaf tree with summed values
    Hierarchy {
        /// Name of the synthesized root node
        #[arg(long)]
        root_name: Option<String>,
        /// Column to sum up the tree
        #[arg(long)]
        attr: Option<String>,
    },
}

/// Command-line flags win over the config file.
fn resolve_config(file: Option<PipelineConfig>, command: Option<Commands>) -> Result<PipelineConfig> {
    match (file, command) {
        (None, None) => bail!("pass --config or a subcommand (lines | hierarchy)"),
        (Some(cfg), None) => Ok(cfg),
        (
            base,
            Some(Commands::Lines {
                y_min,
                join_points,
                highlight,
                date_format,
                x_field,
            }),
        ) => {
            let mut cfg = match base {
                None => LineConfig::default(),
                Some(PipelineConfig::Lines(cfg)) => cfg,
                Some(PipelineConfig::Hierarchy(_)) => {
                    bail!("config file is for a hierarchy, not lines")
                }
            };
            if let Some(y_min) = y_min {
                cfg = cfg.with_y_min(y_min);
            }
            if join_points {
                cfg = cfg.with_join_points(true);
            }
            if !highlight.is_empty() {
                cfg = cfg.with_highlight_names(highlight);
            }
            if let Some(format) = date_format {
                cfg = cfg.with_date_format(&format);
            }
            if let Some(field) = x_field {
                cfg = cfg.with_x_field(&field);
            }
            Ok(PipelineConfig::Lines(cfg))
        }
        (base, Some(Commands::Hierarchy { root_name, attr })) => {
            let mut cfg = match base {
                None => HierarchyConfig::default(),
                Some(PipelineConfig::Hierarchy(cfg)) => cfg,
                Some(PipelineConfig::Lines(_)) => {
                    bail!("config file is for lines, not a hierarchy")
                }
            };
            if let Some(name) = root_name {
                cfg = cfg.with_root_name(&name);
            }
            if let Some(attr) = attr {
                cfg = cfg.with_attr_to_show(&attr);
            }
            Ok(PipelineConfig::Hierarchy(cfg))
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let file_config = cli
        .config
        .as_deref()
        .map(PipelineConfig::load)
        .transpose()?;
    let config = resolve_config(file_config, cli.command)?;

    let dataset = load_file(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;

    let output = match &config {
        PipelineConfig::Lines(cfg) => {
            let prepared = prepare_lines(&dataset, cfg)?;
            to_json(&prepared, cli.pretty)?
        }
        PipelineConfig::Hierarchy(cfg) => {
            let prepared = prepare_hierarchy(&dataset, cfg)?;
            to_json(&prepared, cli.pretty)?
        }
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, output)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.context("serializing prepared data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_config() {
        let file = PipelineConfig::Lines(LineConfig::default().with_y_min(5.0));
        let cmd = Commands::Lines {
            y_min: None,
            join_points: true,
            highlight: vec!["UK".to_string()],
            date_format: None,
            x_field: None,
        };
        let PipelineConfig::Lines(cfg) = resolve_config(Some(file), Some(cmd)).unwrap() else {
            panic!("expected line config");
        };
        assert_eq!(cfg.y_min, 5.0);
        assert!(cfg.join_points);
        assert_eq!(cfg.highlight_names, vec!["UK"]);
    }

    #[test]
    fn mismatched_kind_is_rejected() {
        let file = PipelineConfig::Lines(LineConfig::default());
        let cmd = Commands::Hierarchy {
            root_name: None,
            attr: None,
        };
        assert!(resolve_config(Some(file), Some(cmd)).is_err());
    }

    #[test]
    fn needs_some_config() {
        assert!(resolve_config(None, None).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
