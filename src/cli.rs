//! Command-line surface of the catalog runner.

use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use colored::Colorize;
use tracing::debug;

use crate::config::Config;
use crate::dispatch::{Dispatcher, ReportFormat};
use crate::error::CatalogError;
use crate::logging::LoggingConfig;
use crate::scenarios::{self, RunSummary, SCENARIOS};

/// Trigger every failure category once and report how each was handled.
#[derive(Parser, Debug)]
#[command(name = "failure-catalog")]
#[command(version)]
pub struct Cli {
    /// Run only the named scenario (repeatable)
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,

    /// List scenarios and exit
    #[arg(long)]
    pub list: bool,

    /// TOML file with trigger inputs and output settings
    #[arg(long, short, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report format (overrides the config file)
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Colorize report labels
    #[arg(long)]
    pub color: bool,

    /// Prefix log lines with timestamps
    #[arg(long)]
    pub timestamps: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_verbosity(self.verbose).with_timestamps(self.timestamps)
    }

    /// Config file (or defaults) with command-line overrides applied.
    pub fn effective_config(&self) -> Result<Config, CatalogError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(format) = self.format {
            config.output.format = format;
        }
        config.output.color |= self.color;
        Ok(config)
    }
}

/// Run the catalog, writing report lines (or the listing) to `out`.
///
/// Handled failures are part of a successful run; only setup problems
/// come back as `Err`.
pub fn run<W: Write>(cli: &Cli, mut out: W) -> Result<RunSummary, CatalogError> {
    if cli.list {
        for scenario in &SCENARIOS {
            writeln!(out, "{:<30} {}", scenario.name.bold(), scenario.summary)
                .map_err(CatalogError::Output)?;
        }
        return Ok(RunSummary::default());
    }

    let config = cli.effective_config()?;
    debug!(?config, "effective config");
    let selected = scenarios::select(&cli.only)?;

    if config.output.color {
        colored::control::set_override(true);
    }
    let mut dispatcher = Dispatcher::new(out)
        .with_format(config.output.format)
        .with_color(config.output.color);
    Ok(scenarios::run_all(&selected, &config, &mut dispatcher))
}

/// Process exit status for the outcome of [`run`].
pub fn exit_code(result: &Result<RunSummary, CatalogError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(err) => err.exit_code(),
    }
}
