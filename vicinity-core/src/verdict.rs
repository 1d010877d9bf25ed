//! Three-level recommendation derived from a scoring result.
//!
//! The level depends only on the total score, the profile's thresholds and
//! the dealbreaker flag. Confidence reflects how far the score sits from the
//! nearest decision boundary.

use serde::Serialize;

use crate::category::PerCategory;
use crate::profile::{ProfileConfig, VerdictThresholds};
use crate::rounding::one_decimal;
use crate::scoring::{ScoringEngine, ScoringResult};

const MAX_KEY_FACTORS: usize = 5;
const MAX_WARNING_FACTORS: usize = 2;
const MAX_HIGHLIGHT_FACTORS: usize = 3;
const DEDUP_PREFIX_CHARS: usize = 30;
const QUIET_CALLOUT_WEIGHT: f64 = 1.0;
const QUIET_CALLOUT_SCORE: f64 = 70.0;

/// Recommendation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictLevel {
    Recommended,
    Conditional,
    NotRecommended,
}

impl VerdictLevel {
    /// Classify a score. A dealbreaker always yields
    /// [`VerdictLevel::NotRecommended`].
    #[must_use]
    pub fn classify(score: f64, thresholds: &VerdictThresholds, has_dealbreaker: bool) -> Self {
        if has_dealbreaker {
            Self::NotRecommended
        } else if score >= thresholds.recommended {
            Self::Recommended
        } else if score >= thresholds.conditional {
            Self::Conditional
        } else {
            Self::NotRecommended
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recommended => "Recommended",
            Self::Conditional => "Conditionally recommended",
            Self::NotRecommended => "Not recommended",
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Recommended => "✅",
            Self::Conditional => "⚠️",
            Self::NotRecommended => "❌",
        }
    }
}

/// How well the location suits the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaMatch {
    Excellent,
    Good,
    Acceptable,
    Poor,
    Mismatch,
}

impl PersonaMatch {
    #[must_use]
    pub fn from_score(score: f64, thresholds: &VerdictThresholds) -> Self {
        if score >= thresholds.recommended + 10.0 {
            Self::Excellent
        } else if score >= thresholds.recommended {
            Self::Good
        } else if score >= thresholds.conditional {
            Self::Acceptable
        } else if score >= thresholds.conditional - 10.0 {
            Self::Poor
        } else {
            Self::Mismatch
        }
    }
}

/// Final recommendation for one location and profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub level: VerdictLevel,
    pub label: &'static str,
    pub emoji: &'static str,
    #[serde(serialize_with = "one_decimal")]
    pub score: f64,
    /// Percentage in `0..=100`.
    pub confidence: u8,
    pub persona_match: PersonaMatch,
    pub explanation: String,
    /// At most five entries, most important first.
    pub key_factors: Vec<String>,
}

/// Confidence in a verdict given the score's distance from the thresholds.
#[must_use]
pub fn confidence(score: f64, thresholds: &VerdictThresholds, has_dealbreaker: bool) -> u8 {
    if has_dealbreaker {
        return 95;
    }
    let distance = (score - thresholds.recommended)
        .abs()
        .min((score - thresholds.conditional).abs());
    match distance {
        d if d >= 20.0 => 90,
        d if d >= 15.0 => 80,
        d if d >= 10.0 => 70,
        d if d >= 5.0 => 55,
        _ => 45,
    }
}

/// Turns scoring results into verdicts.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerdictGenerator;

impl VerdictGenerator {
    /// Build the verdict for `result` under `profile`.
    #[must_use]
    pub fn generate(&self, result: &ScoringResult, profile: &ProfileConfig) -> Verdict {
        let score = result.total_score;
        let thresholds = &profile.thresholds;
        let level = VerdictLevel::classify(score, thresholds, result.has_dealbreaker);

        Verdict {
            level,
            label: level.label(),
            emoji: level.emoji(),
            score,
            confidence: confidence(score, thresholds, result.has_dealbreaker),
            persona_match: PersonaMatch::from_score(score, thresholds),
            explanation: explanation(level, result, profile),
            key_factors: key_factors(level, result, profile),
        }
    }
}

fn explanation(level: VerdictLevel, result: &ScoringResult, profile: &ProfileConfig) -> String {
    let narrative = &profile.narrative;
    let template = match level {
        VerdictLevel::Recommended => narrative.verdict_recommended,
        VerdictLevel::Conditional => narrative.verdict_conditional,
        VerdictLevel::NotRecommended => narrative.verdict_not_recommended,
    };
    if let Some(text) = template {
        return text.to_owned();
    }

    let score = result.total_score;
    let who = format!("{} {}", profile.emoji, profile.name);
    match level {
        VerdictLevel::Recommended => format!(
            "The location scores {score:.0}/100 for your profile ({who}). \
             It meets the main criteria and is worth a closer look."
        ),
        VerdictLevel::Conditional => format!(
            "The location scores {score:.0}/100 for your profile ({who}). \
             There are trade-offs to consider; see the details below."
        ),
        VerdictLevel::NotRecommended if result.has_dealbreaker => format!(
            "The location has a dealbreaker for your profile ({who}) \
             and is not recommended."
        ),
        VerdictLevel::NotRecommended => format!(
            "The location scores only {score:.0}/100 for your profile ({who}). \
             It misses the key criteria."
        ),
    }
}

fn starts_with_marker(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

fn dedup_key(text: &str) -> String {
    text.trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
        .chars()
        .take(DEDUP_PREFIX_CHARS)
        .collect()
}

fn key_factors(level: VerdictLevel, result: &ScoringResult, profile: &ProfileConfig) -> Vec<String> {
    let mut factors: Vec<String> = result
        .warnings
        .iter()
        .take(MAX_WARNING_FACTORS)
        .cloned()
        .collect();

    let (highlights, marker) = match level {
        VerdictLevel::Recommended => (result.strengths.as_slice(), "➕"),
        VerdictLevel::NotRecommended => (result.weaknesses.as_slice(), "➖"),
        VerdictLevel::Conditional => (&[][..], ""),
    };
    factors.extend(
        highlights
            .iter()
            .take(MAX_HIGHLIGHT_FACTORS)
            .map(|text| {
                if starts_with_marker(text) {
                    text.clone()
                } else {
                    format!("{marker} {text}")
                }
            }),
    );

    let quiet = result.quiet_score;
    let quiet_config = &profile.quiet;
    if quiet_config.weight >= QUIET_CALLOUT_WEIGHT {
        if quiet >= QUIET_CALLOUT_SCORE {
            factors.push(format!("🔇 Quiet area (quiet score: {quiet:.0}/100)"));
        } else if quiet < quiet_config.threshold {
            factors.push(format!(
                "🔊 Noisy area (quiet score: {quiet:.0}/100, minimum {:.0})",
                quiet_config.threshold
            ));
        }
    }

    let mut seen = std::collections::HashSet::new();
    factors.retain(|factor| seen.insert(dedup_key(factor)));
    factors.truncate(MAX_KEY_FACTORS);
    factors
}

/// Score `category_scores` with `profile` and produce its verdict in one go.
///
/// # Examples
/// ```
/// use vicinity_core::{PerCategory, ProfileKey, VerdictLevel, generate_verdict_for_analysis, profile};
///
/// let scores = PerCategory { education: 10.0, ..PerCategory::from_fn(|_| 80.0) };
/// let verdict = generate_verdict_for_analysis(&scores, 80.0, profile(ProfileKey::Family));
/// assert_eq!(verdict.level, VerdictLevel::NotRecommended);
/// assert_eq!(verdict.confidence, 95);
/// ```
#[must_use]
pub fn generate_verdict_for_analysis(
    category_scores: &PerCategory<f64>,
    quiet_score: f64,
    profile: &ProfileConfig,
) -> Verdict {
    let result = ScoringEngine::new(profile).calculate(category_scores, quiet_score);
    VerdictGenerator.generate(&result, profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ProfileKey, profile};
    use proptest::prelude::*;
    use rstest::rstest;

    const THRESHOLDS: VerdictThresholds = VerdictThresholds {
        recommended: 70.0,
        conditional: 50.0,
    };

    fn result(total_score: f64, has_dealbreaker: bool) -> ScoringResult {
        ScoringResult {
            profile: "balanced".into(),
            category_breakdown: Vec::new(),
            base_score: total_score,
            quiet_score: 50.0,
            quiet_modifier: 1.0,
            total_score,
            has_dealbreaker,
            critical_caps_applied: Vec::new(),
            warnings: Vec::new(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
        }
    }

    #[rstest]
    #[case(70.0, false, VerdictLevel::Recommended)]
    #[case(69.9, false, VerdictLevel::Conditional)]
    #[case(50.0, false, VerdictLevel::Conditional)]
    #[case(49.9, false, VerdictLevel::NotRecommended)]
    #[case(99.0, true, VerdictLevel::NotRecommended)]
    fn classifies_levels(#[case] score: f64, #[case] dealbreaker: bool, #[case] expected: VerdictLevel) {
        assert_eq!(VerdictLevel::classify(score, &THRESHOLDS, dealbreaker), expected);
    }

    #[rstest]
    #[case(95.0, 90)]
    #[case(85.0, 80)]
    #[case(82.0, 70)]
    #[case(76.0, 55)]
    #[case(60.0, 70)]
    #[case(52.0, 45)]
    fn confidence_grows_with_margin(#[case] score: f64, #[case] expected: u8) {
        assert_eq!(confidence(score, &THRESHOLDS, false), expected);
    }

    #[rstest]
    #[case(80.0, PersonaMatch::Excellent)]
    #[case(70.0, PersonaMatch::Good)]
    #[case(50.0, PersonaMatch::Acceptable)]
    #[case(40.0, PersonaMatch::Poor)]
    #[case(39.9, PersonaMatch::Mismatch)]
    fn persona_match_buckets(#[case] score: f64, #[case] expected: PersonaMatch) {
        assert_eq!(PersonaMatch::from_score(score, &THRESHOLDS), expected);
    }

    #[rstest]
    fn explanation_uses_persona_template() {
        let family = profile(ProfileKey::Family);
        let verdict = VerdictGenerator.generate(&result(90.0, false), family);
        assert_eq!(verdict.level, VerdictLevel::Recommended);
        assert!(verdict.explanation.contains("great fit for families"));
    }

    #[rstest]
    fn explanation_falls_back_to_generic_sentence() {
        let balanced = profile(ProfileKey::Balanced);
        let verdict = VerdictGenerator.generate(&result(30.0, true), balanced);
        assert!(verdict.explanation.contains("dealbreaker"));
        assert!(verdict.explanation.contains("Balanced"));

        let verdict = VerdictGenerator.generate(&result(57.4, false), balanced);
        assert!(verdict.explanation.contains("57/100"));
    }

    #[rstest]
    fn key_factors_are_deduplicated_and_bounded() {
        let mut scored = result(90.0, false);
        scored.warnings = vec!["⚠️ Same warning text that repeats".into(); 2];
        scored.strengths = vec![
            "✅ Same warning text that repeats, again".into(),
            "Plain strength".into(),
            "Another strength".into(),
            "A fourth strength".into(),
        ];
        scored.quiet_score = 90.0;
        let verdict = VerdictGenerator.generate(&scored, profile(ProfileKey::Family));
        assert_eq!(
            verdict.key_factors,
            vec![
                "⚠️ Same warning text that repeats".to_owned(),
                "➕ Plain strength".to_owned(),
                "➕ Another strength".to_owned(),
                "🔇 Quiet area (quiet score: 90/100)".to_owned(),
            ]
        );
    }

    #[rstest]
    fn noisy_callout_for_quiet_sensitive_profile() {
        let mut scored = result(20.0, false);
        scored.quiet_score = 30.0;
        scored.weaknesses = vec!["Few shops".into()];
        let verdict = VerdictGenerator.generate(&scored, profile(ProfileKey::Family));
        assert_eq!(verdict.key_factors[0], "➖ Few shops");
        assert!(verdict.key_factors[1].starts_with("🔊 Noisy area"));
    }

    #[rstest]
    fn no_quiet_callout_for_tolerant_profile() {
        let mut scored = result(20.0, false);
        scored.quiet_score = 5.0;
        let verdict = VerdictGenerator.generate(&scored, profile(ProfileKey::Urban));
        assert!(verdict.key_factors.is_empty());
    }

    proptest! {
        #[test]
        fn dealbreaker_always_not_recommended(score in 0.0_f64..=100.0) {
            let verdict = VerdictGenerator.generate(&result(score, true), profile(ProfileKey::Investor));
            prop_assert_eq!(verdict.level, VerdictLevel::NotRecommended);
        }

        #[test]
        fn above_threshold_without_dealbreaker_is_recommended(score in 62.0_f64..=100.0) {
            let verdict = VerdictGenerator.generate(&result(score, false), profile(ProfileKey::Investor));
            prop_assert_eq!(verdict.level, VerdictLevel::Recommended);
        }
    }
}
