//! `invite-layout`: inspect section offsets and drag resolution from the shell.

mod input;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use canvas::LayoutError;
use canvas::config::LayoutConfig;
use canvas::consts::DEFAULT_VIEWPORT_HEIGHT_PX;
use canvas::doc::validate_sections;
use canvas::offset::OffsetIndex;
use canvas::resolve::{locate_in, resolve_with_fallback};
use clap::{Parser, Subcommand};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Parser, Debug)]
#[command(name = "invite-layout", about = "Section offsets and drag resolution for invitation canvases")]
struct Cli {
    /// Viewport height in pixels, used to size `vh` sections.
    #[arg(long, global = true, env = "LAYOUT_VIEWPORT_HEIGHT_PX", default_value_t = DEFAULT_VIEWPORT_HEIGHT_PX)]
    viewport_height: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print each section's offset and the total canvas height.
    Offsets {
        /// Sections JSON file, or `-` for stdin.
        file: PathBuf,
    },
    /// Resolve an absolute Y for an element in `--current`.
    ///
    /// A `--current` section missing from the file follows `LAYOUT_UNKNOWN_SECTION`.
    Resolve {
        file: PathBuf,
        #[arg(long)]
        current: String,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        /// Overrides `LAYOUT_BOTTOM_MARGIN_PX`.
        #[arg(long)]
        bottom_margin: Option<f64>,
    },
    /// Place an absolute Y with no current section.
    Locate {
        file: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        #[arg(long)]
        bottom_margin: Option<f64>,
    },
    /// Check a sections file and exit non-zero if it is invalid.
    Validate { file: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "invite-layout failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    let viewport_height = cli.viewport_height;
    let value = match cli.command {
        Command::Offsets { file } => {
            let sections = input::read_sections(&file)?;
            validate_sections(&sections)?;
            let index = OffsetIndex::build(&sections, viewport_height);
            let offsets: BTreeMap<_, _> = index.offsets().into_iter().collect();
            json!({ "offsets": offsets, "total_height": index.total_height() })
        }
        Command::Resolve { file, current, y, bottom_margin } => {
            let sections = input::read_sections(&file)?;
            validate_sections(&sections)?;
            let config = layout_config(bottom_margin)?;
            let index = OffsetIndex::build(&sections, viewport_height);
            serde_json::to_value(resolve_with_fallback(&index, y, &current, &config)?)?
        }
        Command::Locate { file, y, bottom_margin } => {
            let sections = input::read_sections(&file)?;
            validate_sections(&sections)?;
            let config = layout_config(bottom_margin)?;
            let index = OffsetIndex::build(&sections, viewport_height);
            serde_json::to_value(locate_in(&index, y, &config)?)?
        }
        Command::Validate { file } => {
            let sections = input::read_sections(&file)?;
            validate_sections(&sections)?;
            tracing::info!(count = sections.len(), "sections valid");
            json!({ "valid": true, "count": sections.len() })
        }
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Environment config with the command-line margin layered on top.
fn layout_config(bottom_margin: Option<f64>) -> Result<LayoutConfig, CliError> {
    let config = LayoutConfig::from_env()?;
    match bottom_margin {
        Some(margin) => Ok(config.with_bottom_margin(margin)?),
        None => Ok(config),
    }
}
