//! `kako tripcode` command implementation.

use std::path::PathBuf;

use clap::Args;
use kako_config::Config;
use kako_tripcode::parse_name;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tripcode command.
#[derive(Args)]
pub(crate) struct TripcodeArgs {
    /// Name field, e.g. `anon#secret` or `anon##secret`.
    name: String,

    /// Path to configuration file (default: auto-discover kako.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl TripcodeArgs {
    /// Execute the tripcode command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        let parsed = parse_name(&self.name, &config.secure_salt);
        if parsed.trip.is_empty() {
            output.warning("No tripcode secret in name");
        }
        output.result(&format!("{}{}", parsed.name, parsed.trip))?;

        Ok(())
    }
}
