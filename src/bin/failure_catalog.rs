use std::io;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use failure_catalog::cli::{self, Cli};
use failure_catalog::logging::init_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.logging_config());

    let result = cli::run(&cli, io::stdout().lock());
    if let Err(err) = &result {
        eprintln!("{} {}", "error:".red().bold(), err);
    }
    ExitCode::from(cli::exit_code(&result))
}
