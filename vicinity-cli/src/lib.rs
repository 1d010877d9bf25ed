//! Command-line interface for persona-weighted location scoring.
#![forbid(unsafe_code)]

mod analyse;
mod error;
mod telemetry;

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;
use vicinity_core::{all_profiles, profile_summaries};

use analyse::{AnalyseArgs, run_analyse};
pub use error::CliError;
pub use telemetry::init_logging;

const ARG_LAT: &str = "lat";
const ARG_LON: &str = "lon";
const ARG_RADIUS: &str = "radius";
const ARG_PROFILE: &str = "profile";
const ARG_QUIET: &str = "quiet";
const ARG_ENDPOINT: &str = "endpoint";
const ARG_TIMEOUT: &str = "timeout-secs";
const ENV_LAT: &str = "VICINITY_CMDS_ANALYSE_LAT";
const ENV_LON: &str = "VICINITY_CMDS_ANALYSE_LON";

/// Run the vicinity CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, the
/// Overpass client cannot be built, or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Analyse(args) => run_analyse(args, writer),
        Command::Profiles(args) => run_profiles(&args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "vicinity",
    about = "Persona-weighted scoring of a location's surroundings",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score the amenities around a coordinate for one profile.
    Analyse(AnalyseArgs),
    /// List the available scoring profiles.
    Profiles(ProfilesArgs),
}

/// CLI arguments for the `profiles` subcommand.
#[derive(Debug, Clone, Parser, Default)]
struct ProfilesArgs {
    /// Include weights, radii, caps and thresholds.
    #[arg(long)]
    detailed: bool,
}

fn run_profiles(args: &ProfilesArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    if args.detailed {
        write_json(writer, &all_profiles())
    } else {
        write_json(writer, &profile_summaries())
    }
}

fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
