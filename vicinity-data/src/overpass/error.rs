//! Error types for the Overpass client.

use thiserror::Error;

/// Failure of a single Overpass attempt.
///
/// These never escape [`super::OverpassClient::fetch_pois_around`]; they
/// drive endpoint rotation and are logged.
#[derive(Debug, Error)]
pub enum OverpassError {
    /// The attempt exceeded its timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint URL.
        url: String,
        /// Timeout applied to the attempt.
        timeout_secs: u64,
    },
    /// The endpoint answered with a non-success status.
    #[error("{url} responded with HTTP {status}")]
    Http {
        /// Endpoint URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// Connection or transfer failure.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Endpoint URL.
        url: String,
        /// Underlying error text.
        message: String,
    },
    /// The body was not an Overpass JSON payload.
    #[error("undecodable payload from {url}: {message}")]
    Decode {
        /// Endpoint URL.
        url: String,
        /// Decoder error text.
        message: String,
    },
}

/// Failure to construct an [`super::OverpassClient`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The endpoint pool is empty.
    #[error("no Overpass endpoints configured")]
    NoEndpoints,
    /// An endpoint is not a valid URL.
    #[error("invalid Overpass endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        /// The rejected value.
        endpoint: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}
