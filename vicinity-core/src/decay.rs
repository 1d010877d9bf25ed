//! Distance-decay utility curves.
//!
//! A POI's usefulness falls off with distance. Each [`DecayMode`] is a step
//! function of `ratio = distance / max_radius` with four plateaus; reaching
//! the radius drops the utility to zero. Plateau boundaries are inclusive of
//! the higher value, so `ratio == 0.25` under [`DecayMode::Daily`] still
//! scores `100.0`.
//!
//! A category keeps its single best POI and earns a small coverage bonus for
//! every further in-radius POI. The bonus is scaled by the best utility and
//! capped, so a cluster of distant features never outranks one close by.

use serde::Serialize;

use crate::category::{Category, PerCategory};
use crate::poi::{PoisByCategory, PointOfInterest};
use crate::profile::ProfileConfig;
use crate::rounding::{one_decimal, optional_whole_meters, whole_meters};

/// Bonus earned per in-radius POI beyond the first.
pub const COVERAGE_BONUS_PER_POI: f64 = 2.5;
/// Upper bound on the coverage bonus before scaling.
pub const COVERAGE_BONUS_CAP: f64 = 10.0;
/// Number of POIs reported per category.
pub const TOP_POIS: usize = 3;

/// Shape of the utility curve applied to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayMode {
    /// Routine, frequent trips (shops, stops); utility degrades quickly.
    Daily,
    /// Occasional purposeful trips (schools, parks, restaurants).
    Destination,
    /// Ambient presence (greenery, water); only matters very close by.
    Background,
}

impl DecayMode {
    /// Plateaus as `(upper ratio, utility)` pairs, nearest first.
    const fn plateaus(self) -> [(f64, f64); 4] {
        match self {
            Self::Daily => [(0.25, 100.0), (0.5, 70.0), (0.8, 40.0), (1.0, 15.0)],
            Self::Destination => [(0.3, 100.0), (0.6, 75.0), (0.9, 45.0), (1.0, 20.0)],
            Self::Background => [(0.2, 100.0), (0.4, 60.0), (0.6, 25.0), (1.0, 10.0)],
        }
    }
}

/// Utility in `0.0..=100.0` of a POI `distance_m` away given the category's
/// `max_radius_m`.
///
/// Returns `0.0` once the distance reaches the radius and for degenerate
/// input (non-positive radius, negative or non-finite values).
///
/// # Examples
/// ```
/// use vicinity_core::{DecayMode, distance_score};
///
/// assert_eq!(distance_score(100.0, 400.0, DecayMode::Daily), 100.0);
/// assert_eq!(distance_score(101.0, 400.0, DecayMode::Daily), 70.0);
/// assert_eq!(distance_score(400.0, 400.0, DecayMode::Daily), 0.0);
/// ```
#[must_use]
pub fn distance_score(distance_m: f64, max_radius_m: f64, mode: DecayMode) -> f64 {
    if !distance_m.is_finite() || !max_radius_m.is_finite() {
        return 0.0;
    }
    if max_radius_m <= 0.0 || distance_m < 0.0 || distance_m >= max_radius_m {
        return 0.0;
    }
    let ratio = distance_m / max_radius_m;
    mode.plateaus()
        .into_iter()
        .find(|&(upper, _)| ratio <= upper)
        .map_or(0.0, |(_, utility)| utility)
}

/// A single POI's contribution to its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPoi {
    pub name: String,
    pub subcategory: String,
    #[serde(serialize_with = "whole_meters")]
    pub distance_m: f64,
    #[serde(serialize_with = "one_decimal")]
    pub score: f64,
}

/// Decay outcome for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    /// Final raw score fed to the scoring engine.
    #[serde(serialize_with = "one_decimal")]
    pub score: f64,
    /// Utility of the best POI.
    #[serde(serialize_with = "one_decimal")]
    pub utility_score: f64,
    #[serde(serialize_with = "one_decimal")]
    pub coverage_bonus: f64,
    /// POIs strictly inside the radius.
    pub poi_count: usize,
    #[serde(serialize_with = "optional_whole_meters")]
    pub nearest_distance_m: Option<f64>,
    pub radius_used: u32,
    pub decay_mode: DecayMode,
    pub top_pois: Vec<ScoredPoi>,
}

impl CategoryScore {
    /// Score for a category with nothing in range.
    #[must_use]
    pub const fn empty(category: Category, radius_m: u32, mode: DecayMode) -> Self {
        Self {
            category,
            score: 0.0,
            utility_score: 0.0,
            coverage_bonus: 0.0,
            poi_count: 0,
            nearest_distance_m: None,
            radius_used: radius_m,
            decay_mode: mode,
            top_pois: Vec::new(),
        }
    }

    /// Extract the raw scores the engine consumes.
    #[must_use]
    pub fn raw_scores(scores: &PerCategory<Self>) -> PerCategory<f64> {
        scores.map(|_, score| score.score)
    }
}

/// Coverage bonus for `in_radius` qualifying POIs whose best utility is
/// `best`.
#[must_use]
pub fn coverage_bonus(in_radius: usize, best: f64) -> f64 {
    let extra = in_radius.saturating_sub(1);
    if extra == 0 || best <= 0.0 {
        return 0.0;
    }
    let raw = (COVERAGE_BONUS_PER_POI * extra as f64).min(COVERAGE_BONUS_CAP);
    raw * best / 100.0
}

/// Score one category's POIs against its radius and decay mode.
///
/// `pois` need not be sorted; the best utility wins regardless of order.
#[must_use]
pub fn score_category(
    category: Category,
    pois: &[PointOfInterest],
    radius_m: u32,
    mode: DecayMode,
) -> CategoryScore {
    let radius = f64::from(radius_m);
    let mut scored: Vec<ScoredPoi> = pois
        .iter()
        .filter_map(|poi| {
            let utility = distance_score(poi.distance_m, radius, mode);
            (utility > 0.0).then(|| ScoredPoi {
                name: poi.name.clone(),
                subcategory: poi.subcategory.clone(),
                distance_m: poi.distance_m,
                score: utility,
            })
        })
        .collect();

    if scored.is_empty() {
        return CategoryScore::empty(category, radius_m, mode);
    }

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.distance_m.total_cmp(&b.distance_m))
    });
    let best = scored.first().map_or(0.0, |poi| poi.score);
    let nearest = scored
        .iter()
        .map(|poi| poi.distance_m)
        .min_by(f64::total_cmp);
    let bonus = coverage_bonus(scored.len(), best);
    let poi_count = scored.len();
    scored.truncate(TOP_POIS);

    CategoryScore {
        category,
        score: (best + bonus).min(100.0),
        utility_score: best,
        coverage_bonus: bonus,
        poi_count,
        nearest_distance_m: nearest,
        radius_used: radius_m,
        decay_mode: mode,
        top_pois: scored,
    }
}

/// Score every category using the profile's radii and decay modes.
#[must_use]
pub fn score_categories(
    pois: &PoisByCategory,
    profile: &ProfileConfig,
) -> PerCategory<CategoryScore> {
    PerCategory::from_fn(|category| {
        score_category(
            category,
            pois.get(category),
            *profile.radius_m.get(category),
            *profile.decay_modes.get(category),
        )
    })
}
