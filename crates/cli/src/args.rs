//! Command-line arguments and effective configuration.

use crate::error::CliError;
use clap::Parser;
use mrt_probe_core::ProbeConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "mrt-probe",
    about = "Render a quad into attachment 1 of an offscreen framebuffer, then show it"
)]
pub struct Cli {
    /// Output the run summary and errors as JSON.
    #[arg(long)]
    pub json: bool,

    /// JSON config file; command-line values override it.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Window and attachment width in pixels.
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Window and attachment height in pixels.
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Window title.
    #[arg(long)]
    pub title: Option<String>,

    /// Close the window after this many frames.
    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,

    /// Read back attachment 1 before shutdown and fail if it is wrong.
    #[arg(long)]
    pub probe: bool,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Builds the configuration: defaults, then `--config`, then flags.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` if the file cannot be read or parsed, or
    /// the final values do not validate.
    pub fn resolve_config(&self) -> Result<ProbeConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    CliError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                ProbeConfig::from_json(&text)?
            }
            None => ProbeConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if self.frames.is_some() {
            config.frame_limit = self.frames;
        }

        config.validate()?;
        Ok(config)
    }
}
