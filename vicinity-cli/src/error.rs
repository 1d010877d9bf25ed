//! Error types emitted by the vicinity CLI.
//!
//! Keep this error type reasonably small; most CLI helpers return
//! `Result<_, CliError>`.

use std::sync::Arc;

use thiserror::Error;
use vicinity_data::ClientBuildError;

/// Errors emitted by the vicinity CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A coordinate is not a finite value within its range.
    #[error("{field} {value} must lie within [-{limit}, {limit}]")]
    InvalidCoordinate {
        field: &'static str,
        value: f64,
        limit: f64,
    },
    /// The quiet score is not within 0 to 100.
    #[error("quiet score {value} must lie within [0, 100]")]
    InvalidQuietScore { value: f64 },
    /// The fetch radius is zero.
    #[error("radius must be at least one metre")]
    InvalidRadius,
    /// Constructing the Overpass client failed.
    #[error("failed to build Overpass client: {0}")]
    BuildClient(#[source] ClientBuildError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
