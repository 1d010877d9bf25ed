//! Data access for the vicinity scorer.
//!
//! Responsibilities:
//! - Fetch nearby points of interest from Overpass-compatible services.
//! - Classify raw OpenStreetMap elements into scoring categories.
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `vicinity-core`).
//! - Never surface upstream failures to callers; degrade to empty results.
//!
//! Invariants:
//! - No global mutable state; endpoint rotation is scoped to one request.

pub mod overpass;

pub use overpass::{
    ClientBuildError, DEFAULT_ENDPOINTS, DEFAULT_USER_AGENT, EndpointCursor, MAX_ATTEMPTS,
    OverpassClient, OverpassConfig, OverpassError,
};
