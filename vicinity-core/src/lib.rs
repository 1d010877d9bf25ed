//! Core domain for persona-weighted location scoring.
//!
//! Nearby points of interest are grouped by [`Category`], turned into 0–100
//! utilities by distance-decay curves, weighted by a [`ProfileConfig`] and
//! finally classified into a [`Verdict`]. The crate performs no I/O; POIs
//! arrive through the [`PoiSource`] trait.
//!
//! ```
//! use vicinity_core::{PerCategory, ProfileKey, ScoringEngine, VerdictGenerator, profile};
//!
//! let urban = profile(ProfileKey::Urban);
//! let scores = PerCategory { transport: 95.0, food: 90.0, shops: 80.0, ..PerCategory::default() };
//! let result = ScoringEngine::new(urban).calculate(&scores, 45.0);
//! let verdict = VerdictGenerator.generate(&result, urban);
//! assert!(verdict.score > 0.0);
//! ```

pub mod category;
pub mod decay;
pub mod nature;
pub mod poi;
pub mod profile;
pub mod report;
mod rounding;
pub mod scoring;
pub mod source;
pub mod verdict;

#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_support;

pub use category::{Category, ParseCategoryError, PerCategory};
pub use decay::{CategoryScore, DecayMode, ScoredPoi, distance_score, score_categories, score_category};
pub use nature::{GreeneryLevel, NatureMetrics, NatureSummary};
pub use poi::{PoisByCategory, PointOfInterest, Tags, haversine_m, poi_counts, sort_by_distance};
pub use profile::{
    CriticalCap, NarrativeTemplates, ProfileConfig, ProfileKey, ProfileSummary, QuietConfig,
    UxContext, VerdictThresholds, all_profiles, get_profile, profile, profile_summaries,
};
pub use report::{AnalysisReport, analyse, analyse_location};
pub use rounding::round_to;
pub use scoring::{
    CategoryAnalysis, CustomWeights, DEALBREAKER_CEILING, Rating, ScoringEngine, ScoringResult,
    normalize_weights, quiet_modifier,
};
pub use source::PoiSource;
pub use verdict::{
    PersonaMatch, Verdict, VerdictGenerator, VerdictLevel, generate_verdict_for_analysis,
};
