use log::debug;

use super::{
    CategoryAnalysis, Rating, ScoringResult, normalize_weights, quiet_modifier, sanitise_score,
};
use crate::category::{Category, PerCategory};
use crate::profile::ProfileConfig;

/// Highest total a location with any dealbreaker can reach.
pub const DEALBREAKER_CEILING: f64 = 40.0;

const MAX_HIGHLIGHTS: usize = 4;
const STRENGTH_SCORE: f64 = 70.0;
const WEAKNESS_SCORE: f64 = 30.0;
const QUIET_STRENGTH: f64 = 70.0;
const QUIET_WEAKNESS: f64 = 35.0;
const CRITICAL_WARNING_SCORE: f64 = 40.0;

/// Caller-supplied raw weights for an ad-hoc recomputation.
pub type CustomWeights = PerCategory<f64>;

/// Scores locations for one profile.
///
/// Normalised weights are computed once at construction and never change.
///
/// # Examples
/// ```
/// use vicinity_core::{PerCategory, ProfileKey, ScoringEngine, profile};
///
/// let engine = ScoringEngine::new(profile(ProfileKey::Balanced));
/// let scores = PerCategory { roads: 0.0, ..PerCategory::from_fn(|_| 60.0) };
/// let result = engine.calculate(&scores, 60.0);
/// assert!(!result.has_dealbreaker);
/// assert!((55.0..=65.0).contains(&result.total_score));
/// ```
#[derive(Debug, Clone)]
pub struct ScoringEngine<'a> {
    profile: &'a ProfileConfig,
    weights: PerCategory<f64>,
}

impl<'a> ScoringEngine<'a> {
    /// Bind an engine to `profile`.
    #[must_use]
    pub fn new(profile: &'a ProfileConfig) -> Self {
        let weights = profile.normalized_weights();
        debug!("scoring engine for {} with weights {weights:?}", profile.key);
        Self { profile, weights }
    }

    /// The bound profile.
    #[must_use]
    pub const fn profile(&self) -> &'a ProfileConfig {
        self.profile
    }

    /// Normalised weights used by [`calculate`](Self::calculate).
    #[must_use]
    pub const fn weights(&self) -> &PerCategory<f64> {
        &self.weights
    }

    /// Score `category_scores` and `quiet_score` with the profile's weights.
    #[must_use]
    pub fn calculate(&self, category_scores: &PerCategory<f64>, quiet_score: f64) -> ScoringResult {
        self.evaluate(
            category_scores,
            quiet_score,
            &self.weights,
            self.profile.key.as_str().to_owned(),
        )
    }

    /// Score with caller-supplied weights instead of the profile's.
    ///
    /// `weights` are normalised like profile weights. Everything else (caps,
    /// dealbreakers, quiet handling, narrative) still comes from the bound
    /// profile. The engine itself is not modified.
    #[must_use]
    pub fn calculate_with_weights(
        &self,
        category_scores: &PerCategory<f64>,
        quiet_score: f64,
        weights: &CustomWeights,
    ) -> ScoringResult {
        let normalized = normalize_weights(weights);
        self.evaluate(
            category_scores,
            quiet_score,
            &normalized,
            format!("{}_custom", self.profile.key),
        )
    }

    fn participates(&self, weights: &PerCategory<f64>, category: Category) -> bool {
        *weights.get(category) != 0.0
            || self.profile.is_critical(category)
            || self.profile.dealbreaker_threshold(category).is_some()
    }

    fn evaluate(
        &self,
        category_scores: &PerCategory<f64>,
        quiet_score: f64,
        weights: &PerCategory<f64>,
        label: String,
    ) -> ScoringResult {
        let raw = category_scores.map(|_, score| sanitise_score(*score));
        let quiet = sanitise_score(quiet_score);

        let breakdown: Vec<CategoryAnalysis> = Category::ALL
            .into_iter()
            .filter(|&category| self.participates(weights, category))
            .map(|category| {
                let raw_score = *raw.get(category);
                let weight = *weights.get(category);
                CategoryAnalysis {
                    category,
                    raw_score,
                    weight,
                    weighted_score: weight * raw_score,
                    is_critical: self.profile.is_critical(category),
                    is_dealbreaker: self.profile.is_dealbreaker(category, raw_score),
                    rating: Rating::from_score(raw_score),
                }
            })
            .collect();

        let base_score: f64 = breakdown.iter().map(|row| row.weighted_score).sum();
        let modifier = quiet_modifier(quiet, &self.profile.quiet);
        let mut total = base_score * modifier;

        let mut caps_applied = Vec::new();
        for cap in self.profile.critical_caps {
            if *raw.get(cap.category) < cap.threshold {
                total = total.min(cap.ceiling);
                caps_applied.push(cap.category);
            }
        }

        let has_dealbreaker = breakdown.iter().any(|row| row.is_dealbreaker);
        if has_dealbreaker {
            total = total.min(DEALBREAKER_CEILING);
        }
        let total_score = sanitise_score(total);

        let (strengths, weaknesses) = self.highlights(&breakdown, quiet);
        let warnings = self.warnings(&breakdown, quiet);

        debug!(
            "{label}: base {base_score:.2} x {modifier:.3} -> {total_score:.2} \
             (dealbreaker: {has_dealbreaker}, caps: {caps_applied:?})"
        );

        ScoringResult {
            profile: label,
            category_breakdown: breakdown,
            base_score,
            quiet_score: quiet,
            quiet_modifier: modifier,
            total_score,
            has_dealbreaker,
            critical_caps_applied: caps_applied,
            warnings,
            strengths,
            weaknesses,
        }
    }

    fn highlights(&self, breakdown: &[CategoryAnalysis], quiet: f64) -> (Vec<String>, Vec<String>) {
        let templates = &self.profile.narrative;
        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();

        for row in breakdown {
            let label = row.category.label();
            if row.raw_score >= STRENGTH_SCORE && row.weight > 0.0 {
                strengths.push(templates.high.get(row.category).map_or_else(
                    || format!("✅ {label}: excellent access"),
                    str::to_owned,
                ));
            } else if row.raw_score <= WEAKNESS_SCORE && row.is_critical {
                weaknesses.push(templates.low.get(row.category).map_or_else(
                    || format!("⚠️ {label}: poor access"),
                    str::to_owned,
                ));
            }
        }

        if quiet >= QUIET_STRENGTH {
            strengths.push(
                templates
                    .quiet_high
                    .unwrap_or("🔇 Quiet surroundings")
                    .to_owned(),
            );
        } else if quiet <= QUIET_WEAKNESS {
            weaknesses.push(
                templates
                    .quiet_low
                    .unwrap_or("🔊 Noisy surroundings")
                    .to_owned(),
            );
        }

        strengths.truncate(MAX_HIGHLIGHTS);
        weaknesses.truncate(MAX_HIGHLIGHTS);
        (strengths, weaknesses)
    }

    fn warnings(&self, breakdown: &[CategoryAnalysis], quiet: f64) -> Vec<String> {
        let mut warnings: Vec<String> = breakdown
            .iter()
            .filter(|row| row.is_dealbreaker)
            .map(|row| {
                format!(
                    "🚨 Dealbreaker: {} is below the acceptable minimum for this profile",
                    row.category.label()
                )
            })
            .collect();

        let threshold = self.profile.quiet.threshold;
        if quiet < threshold {
            warnings.push(format!(
                "⚠️ Quiet score ({quiet:.0}) is below this profile's threshold ({threshold:.0})"
            ));
        }

        warnings.extend(
            breakdown
                .iter()
                .filter(|row| {
                    row.is_critical && row.raw_score < CRITICAL_WARNING_SCORE && !row.is_dealbreaker
                })
                .map(|row| {
                    format!(
                        "⚠️ {} is critical for this profile but scores only {:.0}",
                        row.category.label(),
                        row.raw_score
                    )
                }),
        );
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ProfileKey, profile};
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    fn uniform(score: f64) -> PerCategory<f64> {
        PerCategory {
            roads: 0.0,
            ..PerCategory::from_fn(|_| score)
        }
    }

    #[fixture]
    fn family() -> ScoringEngine<'static> {
        ScoringEngine::new(profile(ProfileKey::Family))
    }

    #[rstest]
    fn balanced_profile_lands_near_uniform_score() {
        let engine = ScoringEngine::new(profile(ProfileKey::Balanced));
        let result = engine.calculate(&uniform(60.0), 60.0);
        assert!(!result.has_dealbreaker);
        assert!((55.0..=65.0).contains(&result.total_score));
        assert!((result.quiet_modifier - 1.01).abs() < 1e-12);
    }

    #[rstest]
    fn dealbreaker_caps_total(family: ScoringEngine<'static>) {
        let scores = PerCategory {
            education: 10.0,
            ..uniform(80.0)
        };
        let result = family.calculate(&scores, 80.0);
        assert!(result.has_dealbreaker);
        assert!(result.total_score <= DEALBREAKER_CEILING);
        assert_eq!(result.dealbreakers().collect::<Vec<_>>(), vec![Category::Education]);
        assert!(result.warnings[0].contains("Dealbreaker"));
    }

    #[rstest]
    fn critical_cap_is_recorded(family: ScoringEngine<'static>) {
        let scores = PerCategory {
            nature: 20.0,
            ..uniform(100.0)
        };
        let result = family.calculate(&scores, 100.0);
        assert_eq!(result.critical_caps_applied, vec![Category::Nature]);
        assert!(result.total_score <= 75.0);
        assert!(!result.has_dealbreaker);
    }

    #[rstest]
    fn penalty_category_lowers_base(family: ScoringEngine<'static>) {
        let quiet_street = family.calculate(&uniform(80.0), 50.0);
        let busy_street = family.calculate(
            &PerCategory {
                roads: 100.0,
                ..uniform(80.0)
            },
            50.0,
        );
        assert!(busy_street.base_score < quiet_street.base_score);
        let roads = busy_street.analysis(Category::Roads).expect("roads analysed");
        assert!(roads.weighted_score < 0.0);
    }

    #[rstest]
    fn custom_weights_leave_engine_untouched(family: ScoringEngine<'static>) {
        let before = *family.weights();
        let scores = uniform(55.0);
        let custom = PerCategory {
            transport: 1.0,
            ..PerCategory::default()
        };
        let custom_result = family.calculate_with_weights(&scores, 50.0, &custom);
        assert_eq!(custom_result.profile, "family_custom");
        assert_eq!(before, *family.weights());
        assert_eq!(family.calculate(&scores, 50.0).profile, "family");
    }

    #[rstest]
    fn zero_custom_weights_score_zero(family: ScoringEngine<'static>) {
        let result = family.calculate_with_weights(&uniform(90.0), 90.0, &PerCategory::default());
        assert_eq!(result.base_score, 0.0);
        assert_eq!(result.total_score, 0.0);
    }

    #[rstest]
    fn strengths_prefer_persona_text(family: ScoringEngine<'static>) {
        let result = family.calculate(&uniform(90.0), 90.0);
        assert!(result.strengths.iter().any(|s| s.contains("Schools and kindergartens")));
        assert!(result.strengths.len() <= 4);
    }

    #[rstest]
    fn weaknesses_only_for_critical_categories(family: ScoringEngine<'static>) {
        let result = family.calculate(&uniform(10.0), 50.0);
        assert_eq!(result.weaknesses.len(), 2);
        assert!(result.weaknesses.iter().all(|w| w.starts_with("⚠️")));
    }

    #[rstest]
    fn noisy_area_warns_and_weakens(family: ScoringEngine<'static>) {
        let result = family.calculate(&uniform(60.0), 20.0);
        assert!(result.warnings.iter().any(|w| w.contains("Quiet score (20)")));
        assert!(result.weaknesses.iter().any(|w| w.contains("Noisy area")));
    }

    #[rstest]
    fn low_critical_category_warns_once(family: ScoringEngine<'static>) {
        let scores = PerCategory {
            education: 30.0,
            nature: 35.0,
            ..uniform(70.0)
        };
        let result = family.calculate(&scores, 60.0);
        let critical: Vec<_> = result
            .warnings
            .iter()
            .filter(|w| w.contains("is critical"))
            .collect();
        assert_eq!(critical.len(), 2);
    }

    #[rstest]
    fn calculate_is_deterministic(family: ScoringEngine<'static>) {
        let scores = PerCategory {
            shops: 33.0,
            health: 71.5,
            ..uniform(48.0)
        };
        assert_eq!(family.calculate(&scores, 41.0), family.calculate(&scores, 41.0));
    }

    fn score() -> impl Strategy<Value = f64> {
        prop_oneof![
            8 => -20.0_f64..120.0,
            1 => Just(f64::NAN),
            1 => Just(f64::INFINITY),
        ]
    }

    fn scores() -> impl Strategy<Value = PerCategory<f64>> {
        proptest::collection::vec(score(), 9).prop_map(|values| {
            PerCategory::from_fn(|category| {
                let index = Category::ALL
                    .iter()
                    .position(|c| *c == category)
                    .unwrap_or_default();
                values[index]
            })
        })
    }

    proptest! {
        #[test]
        fn total_stays_within_bounds(scores in scores(), quiet in score()) {
            for config in crate::profile::all_profiles() {
                let result = ScoringEngine::new(config).calculate(&scores, quiet);
                prop_assert!((0.0..=100.0).contains(&result.total_score));
            }
        }

        #[test]
        fn dealbreaker_forces_ceiling(scores in scores(), education in 0.0_f64..25.0, quiet in 0.0_f64..100.0) {
            let scores = PerCategory { education, ..scores };
            let result = ScoringEngine::new(profile(ProfileKey::Family)).calculate(&scores, quiet);
            prop_assert!(result.has_dealbreaker);
            prop_assert!(result.total_score <= DEALBREAKER_CEILING);
        }
    }
}
