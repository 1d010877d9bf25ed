//! Persona-weighted aggregation of category scores.
//!
//! [`ScoringEngine`] binds a [`ProfileConfig`](crate::ProfileConfig) and turns
//! raw 0–100 category scores plus an external quiet score into a
//! [`ScoringResult`]. Every step is a pure function of its inputs, so the
//! engine can be shared freely between threads.

mod engine;

use serde::Serialize;

use crate::category::{Category, PerCategory};
use crate::profile::QuietConfig;
use crate::rounding::{one_decimal, three_decimals};

pub use engine::{CustomWeights, DEALBREAKER_CEILING, ScoringEngine};

/// Upper bound of the quiet modifier.
pub const MAX_QUIET_MODIFIER: f64 = 1.15;
/// Lower bound of the quiet modifier.
pub const MIN_QUIET_MODIFIER: f64 = 0.70;

/// Scale weights so the positive ones sum to `1.0`.
///
/// Negative (penalty) weights are divided by the same sum. Non-finite
/// weights count as zero, and a table without positive weights normalises to
/// all zeros.
///
/// # Examples
/// ```
/// use vicinity_core::{PerCategory, normalize_weights};
///
/// let raw = PerCategory { shops: 30.0, food: 10.0, roads: -4.0, ..PerCategory::default() };
/// let weights = normalize_weights(&raw);
/// assert_eq!(weights.shops, 0.75);
/// assert_eq!(weights.roads, -0.1);
/// ```
#[must_use]
pub fn normalize_weights(weights: &PerCategory<f64>) -> PerCategory<f64> {
    let finite = weights.map(|_, w| if w.is_finite() { *w } else { 0.0 });
    let divisor: f64 = finite
        .iter()
        .map(|(_, w)| *w)
        .filter(|w| *w > 0.0)
        .sum();
    if divisor <= 0.0 {
        return PerCategory::default();
    }
    finite.map(|_, w| w / divisor)
}

/// Multiplier derived from the quiet score, within
/// [`MIN_QUIET_MODIFIER`]`..=`[`MAX_QUIET_MODIFIER`].
#[must_use]
pub fn quiet_modifier(quiet_score: f64, config: &QuietConfig) -> f64 {
    if quiet_score >= config.threshold {
        let excess = quiet_score - config.threshold;
        (1.0 + excess / 100.0 * config.bonus_rate).min(MAX_QUIET_MODIFIER)
    } else {
        let deficit = config.threshold - quiet_score;
        (1.0 - deficit / 100.0 * config.penalty_rate).max(MIN_QUIET_MODIFIER)
    }
}

/// Clamp a score into `0.0..=100.0`, mapping non-finite values to `0.0`.
#[must_use]
pub fn sanitise_score(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Qualitative bucket of a raw category score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Poor,
    Critical,
}

impl Rating {
    /// Bucket a 0–100 score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            Self::Excellent
        } else if score >= 50.0 {
            Self::Good
        } else if score >= 25.0 {
            Self::Poor
        } else {
            Self::Critical
        }
    }
}

/// One category's contribution to the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAnalysis {
    pub category: Category,
    #[serde(serialize_with = "one_decimal")]
    pub raw_score: f64,
    /// Normalised weight.
    #[serde(serialize_with = "three_decimals")]
    pub weight: f64,
    #[serde(serialize_with = "three_decimals")]
    pub weighted_score: f64,
    pub is_critical: bool,
    pub is_dealbreaker: bool,
    pub rating: Rating,
}

/// Full breakdown of a scoring run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringResult {
    /// Profile key, suffixed with `_custom` for caller-supplied weights.
    pub profile: String,
    pub category_breakdown: Vec<CategoryAnalysis>,
    #[serde(serialize_with = "one_decimal")]
    pub base_score: f64,
    #[serde(serialize_with = "one_decimal")]
    pub quiet_score: f64,
    #[serde(serialize_with = "three_decimals")]
    pub quiet_modifier: f64,
    #[serde(serialize_with = "one_decimal")]
    pub total_score: f64,
    pub has_dealbreaker: bool,
    /// Categories whose critical cap limited the total, in rule order.
    pub critical_caps_applied: Vec<Category>,
    pub warnings: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl ScoringResult {
    /// Analysis row for `category`, if it took part in scoring.
    #[must_use]
    pub fn analysis(&self, category: Category) -> Option<&CategoryAnalysis> {
        self.category_breakdown
            .iter()
            .find(|row| row.category == category)
    }

    /// Categories flagged as dealbreakers.
    pub fn dealbreakers(&self) -> impl Iterator<Item = Category> + '_ {
        self.category_breakdown
            .iter()
            .filter(|row| row.is_dealbreaker)
            .map(|row| row.category)
    }
}
