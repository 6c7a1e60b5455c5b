#![deny(unsafe_code)]
//! mrt-probe: two-pass offscreen rendering smoke test.
//!
//! Pass A draws a blue quad into attachment 1 of a two-attachment
//! framebuffer; pass B samples attachment 1 onto the window. Escape or
//! closing the window ends the run; `--frames N` ends it unattended.

mod app;
mod args;
mod error;
mod logging;
mod window;

use args::Cli;
use clap::Parser;
use error::CliError;
use logging::{init_logging, LoggingConfig};
use mrt_probe_core::RunSummary;
use std::process;

fn run(cli: &Cli) -> Result<Option<RunSummary>, CliError> {
    let config = cli.resolve_config()?;

    if cli.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(None);
    }

    let summary = app::run(&config, cli.probe)?;

    if let Some(probe) = &summary.probe {
        let mismatches = probe.mismatches(config.clear_color, summary.frames);
        if !mismatches.is_empty() {
            let detail = mismatches
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CliError::ProbeMismatch(detail));
        }
    }

    Ok(Some(summary))
}

fn main() {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_verbosity(cli.verbose));

    match run(&cli) {
        Ok(Some(summary)) => {
            if cli.json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(json) => println!("{json}"),
                    Err(e) => log::error!("could not serialize summary: {e}"),
                }
            } else {
                eprintln!("{summary}");
            }
        }
        Ok(None) => {}
        Err(e) => {
            if cli.json {
                let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
                eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
            } else {
                eprintln!("Error: {e}");
            }
            process::exit(e.exit_code());
        }
    }
}
