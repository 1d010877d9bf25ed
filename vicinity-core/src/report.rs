//! End-to-end analysis of one location.
//!
//! [`analyse`] chains decay scoring, the weighted engine, the verdict and the
//! nature summary into a single serialisable [`AnalysisReport`].

use geo::Coord;
use log::info;
use serde::{Serialize, Serializer};

use crate::category::PerCategory;
use crate::decay::{CategoryScore, score_categories};
use crate::nature::NatureMetrics;
use crate::poi::{PoisByCategory, poi_counts, serialize_coord};
use crate::profile::{ProfileConfig, ProfileSummary, UxContext};
use crate::scoring::{ScoringEngine, ScoringResult};
use crate::source::PoiSource;
use crate::verdict::{Verdict, VerdictGenerator};

/// Everything known about a location for one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    #[serde(serialize_with = "serialize_coord")]
    pub centre: Coord<f64>,
    pub fetch_radius_m: u32,
    pub profile: ProfileSummary,
    pub ux: UxContext,
    pub category_scores: PerCategory<CategoryScore>,
    pub scoring: ScoringResult,
    pub verdict: Verdict,
    #[serde(serialize_with = "nature_with_labels")]
    pub nature: NatureMetrics,
    pub poi_counts: PerCategory<usize>,
}

fn nature_with_labels<S: Serializer>(
    metrics: &NatureMetrics,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    metrics.summary().serialize(serializer)
}

/// Analyse already-fetched POIs around `centre` (`x = lon`, `y = lat`).
///
/// # Examples
/// ```
/// use geo::Coord;
/// use vicinity_core::{PoisByCategory, ProfileKey, VerdictLevel, analyse, profile};
///
/// let report = analyse(
///     &PoisByCategory::default(),
///     50.0,
///     profile(ProfileKey::Urban),
///     Coord { x: 21.0, y: 52.2 },
///     1000,
/// );
/// assert_eq!(report.scoring.total_score, 0.0);
/// assert_eq!(report.verdict.level, VerdictLevel::NotRecommended);
/// ```
#[must_use]
pub fn analyse(
    pois: &PoisByCategory,
    quiet_score: f64,
    profile: &ProfileConfig,
    centre: Coord<f64>,
    fetch_radius_m: u32,
) -> AnalysisReport {
    let category_scores = score_categories(pois, profile);
    let scoring = ScoringEngine::new(profile)
        .calculate(&CategoryScore::raw_scores(&category_scores), quiet_score);
    let verdict = VerdictGenerator.generate(&scoring, profile);
    let nature = NatureMetrics::from_pois(&pois.nature, fetch_radius_m);

    info!(
        "analysed ({:.5}, {:.5}) for {}: {:.1} -> {:?}",
        centre.y, centre.x, profile.key, scoring.total_score, verdict.level
    );

    AnalysisReport {
        centre,
        fetch_radius_m,
        profile: profile.summary(),
        ux: profile.ux,
        category_scores,
        scoring,
        verdict,
        nature,
        poi_counts: poi_counts(pois),
    }
}

/// Fetch POIs from `source` and analyse them.
pub fn analyse_location<S: PoiSource + ?Sized>(
    source: &S,
    centre: Coord<f64>,
    fetch_radius_m: u32,
    quiet_score: f64,
    profile: &ProfileConfig,
) -> AnalysisReport {
    let pois = source.get_pois_around(centre.y, centre.x, fetch_radius_m);
    analyse(&pois, quiet_score, profile, centre, fetch_radius_m)
}
