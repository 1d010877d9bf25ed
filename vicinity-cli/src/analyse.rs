//! Analyse command implementation for the vicinity CLI.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use geo::Coord;
use log::warn;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use vicinity_core::{AnalysisReport, PoiSource, ProfileKey, analyse_location, profile};
use vicinity_data::{DEFAULT_ENDPOINTS, OverpassClient, OverpassConfig};

use crate::{
    ARG_ENDPOINT, ARG_LAT, ARG_LON, ARG_PROFILE, ARG_QUIET, ARG_RADIUS, ARG_TIMEOUT, CliError,
    ENV_LAT, ENV_LON, write_json,
};

/// Quiet score assumed when none is measured.
pub(crate) const DEFAULT_QUIET_SCORE: f64 = 50.0;

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// CLI arguments for the `analyse` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Fetch nearby points of interest from Overpass and score the \
                 location for one profile. Options can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Score a location for a profile"
)]
#[ortho_config(prefix = "VICINITY")]
pub(crate) struct AnalyseArgs {
    /// Latitude of the reference point (WGS84 degrees).
    #[arg(long = ARG_LAT, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the reference point (WGS84 degrees).
    #[arg(long = ARG_LON, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Fetch radius in metres; defaults to the profile's widest category radius.
    #[arg(long = ARG_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<u32>,
    /// Profile key, e.g. `family`, `urban` or `quiet_green`.
    #[arg(long = ARG_PROFILE, value_name = "key")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Externally measured quiet score (0 to 100).
    #[arg(long = ARG_QUIET, value_name = "score")]
    #[serde(default)]
    pub(crate) quiet: Option<f64>,
    /// Overpass interpreter URL tried before the public pool.
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default)]
    pub(crate) endpoint: Option<String>,
    /// Base per-attempt timeout in seconds.
    #[arg(long = ARG_TIMEOUT, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl AnalyseArgs {
    pub(crate) fn into_config(self) -> Result<AnalyseConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AnalyseConfig::try_from(merged)
    }
}

/// Resolved `analyse` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AnalyseConfig {
    /// Reference point (`x = lon`, `y = lat`).
    pub(crate) centre: Coord<f64>,
    /// Overpass fetch radius.
    pub(crate) radius_m: u32,
    pub(crate) profile: ProfileKey,
    pub(crate) quiet: f64,
    pub(crate) overpass: OverpassConfig,
}

fn coordinate(
    value: Option<f64>,
    field: &'static str,
    env: &'static str,
    limit: f64,
) -> Result<f64, CliError> {
    let value = value.ok_or(CliError::MissingArgument { field, env })?;
    if value.is_finite() && value.abs() <= limit {
        Ok(value)
    } else {
        Err(CliError::InvalidCoordinate {
            field,
            value,
            limit,
        })
    }
}

fn resolve_profile(raw: Option<&str>) -> ProfileKey {
    let Some(raw) = raw else {
        return ProfileKey::DEFAULT;
    };
    ProfileKey::lookup(raw).unwrap_or_else(|| {
        warn!("unknown profile {raw:?}; using {}", ProfileKey::DEFAULT);
        ProfileKey::DEFAULT
    })
}

impl TryFrom<AnalyseArgs> for AnalyseConfig {
    type Error = CliError;

    fn try_from(args: AnalyseArgs) -> Result<Self, Self::Error> {
        let lat = coordinate(args.lat, ARG_LAT, ENV_LAT, MAX_LATITUDE)?;
        let lon = coordinate(args.lon, ARG_LON, ENV_LON, MAX_LONGITUDE)?;

        let quiet = args.quiet.unwrap_or(DEFAULT_QUIET_SCORE);
        if !(0.0..=100.0).contains(&quiet) {
            return Err(CliError::InvalidQuietScore { value: quiet });
        }

        let profile_key = resolve_profile(args.profile.as_deref());
        let radius_m = args
            .radius
            .unwrap_or_else(|| profile(profile_key).max_radius_m());
        if radius_m == 0 {
            return Err(CliError::InvalidRadius);
        }

        let endpoints = args
            .endpoint
            .into_iter()
            .chain(DEFAULT_ENDPOINTS.iter().map(|e| (*e).to_owned()));
        let mut overpass = OverpassConfig::new(endpoints);
        if let Some(secs) = args.timeout_secs {
            overpass = overpass.with_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            centre: Coord { x: lon, y: lat },
            radius_m,
            profile: profile_key,
            quiet,
            overpass,
        })
    }
}

/// Builds the POI source for the current analyse invocation.
pub(crate) trait PoiSourceBuilder {
    fn build(&self, config: &AnalyseConfig) -> Result<Box<dyn PoiSource>, CliError>;
}

pub(crate) struct OverpassSourceBuilder;

impl PoiSourceBuilder for OverpassSourceBuilder {
    fn build(&self, config: &AnalyseConfig) -> Result<Box<dyn PoiSource>, CliError> {
        let client =
            OverpassClient::with_config(config.overpass.clone()).map_err(CliError::BuildClient)?;
        Ok(Box::new(client))
    }
}

pub(crate) fn run_analyse(args: AnalyseArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    run_analyse_with(args, &OverpassSourceBuilder, writer)
}

pub(crate) fn run_analyse_with(
    args: AnalyseArgs,
    builder: &dyn PoiSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let report = execute_analyse(args, builder)?;
    write_json(writer, &report)
}

fn execute_analyse(
    args: AnalyseArgs,
    builder: &dyn PoiSourceBuilder,
) -> Result<AnalysisReport, CliError> {
    let config = args.into_config()?;
    let source = builder.build(&config)?;
    Ok(analyse_location(
        source.as_ref(),
        config.centre,
        config.radius_m,
        config.quiet,
        profile(config.profile),
    ))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<AnalyseConfig, CliError> {
    let merged = AnalyseArgs::merge_from_layers(layers).map_err(CliError::from)?;
    AnalyseConfig::try_from(merged)
}
