//! Facade crate for the vicinity location scoring engine.
//!
//! This crate re-exports the core scoring domain and, behind the `overpass`
//! feature, the Overpass-backed point-of-interest source.

#![forbid(unsafe_code)]

pub use vicinity_core::{
    AnalysisReport, Category, PerCategory, PoiSource, PoisByCategory, PointOfInterest,
    ProfileConfig, ProfileKey, ScoringEngine, ScoringResult, Verdict, VerdictGenerator,
    VerdictLevel, all_profiles, analyse, analyse_location, get_profile, profile,
    profile_summaries,
};

#[cfg(feature = "overpass")]
pub use vicinity_data::{OverpassClient, OverpassConfig, OverpassError};
