//! Scoring profiles: named bundles of weights, radii and thresholds.
//!
//! Each [`ProfileKey`] maps to one immutable [`ProfileConfig`] held in a
//! process-wide static table. Lookups by string never fail; unrecognised
//! input resolves to [`ProfileKey::DEFAULT`].
//!
//! # Examples
//! ```
//! use vicinity_core::{Category, ProfileKey, get_profile};
//!
//! let profile = get_profile("urban");
//! assert_eq!(profile.key, ProfileKey::Urban);
//! assert!(profile.is_critical(Category::Transport));
//!
//! // Unknown keys fall back to the family profile.
//! assert_eq!(get_profile("astronaut").key, ProfileKey::Family);
//! ```

mod registry;

use serde::Serialize;

use crate::category::{Category, PerCategory};
use crate::decay::DecayMode;
use crate::scoring::normalize_weights;

pub use registry::{all_profiles, get_profile, profile, profile_summaries};

/// Identifier of a built-in profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKey {
    /// Households with children.
    Family,
    /// Car-free city living.
    Urban,
    /// Buy-to-let investment.
    Investor,
    /// Calm surroundings and greenery.
    QuietGreen,
    /// Working from home.
    RemoteWork,
    /// Sport and outdoor activity.
    ActiveSport,
    /// Even-handed weights for a general audience.
    Balanced,
}

impl ProfileKey {
    /// Profile used when a lookup does not match.
    pub const DEFAULT: Self = Self::Family;

    /// Every key in registry order.
    pub const ALL: [Self; 7] = [
        Self::Family,
        Self::Urban,
        Self::Investor,
        Self::QuietGreen,
        Self::RemoteWork,
        Self::ActiveSport,
        Self::Balanced,
    ];

    /// Return the key as its lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Family => "family",
            Self::Urban => "urban",
            Self::Investor => "investor",
            Self::QuietGreen => "quiet_green",
            Self::RemoteWork => "remote_work",
            Self::ActiveSport => "active_sport",
            Self::Balanced => "balanced",
        }
    }

    /// Match an identifier case-insensitively.
    #[must_use]
    pub fn lookup(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|key| key.as_str() == wanted)
    }
}

impl std::fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule capping the total score while a category stays under a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalCap {
    pub category: Category,
    /// Raw category score below which the cap applies.
    pub threshold: f64,
    /// Maximum total score while the rule applies.
    pub ceiling: f64,
}

/// Score boundaries separating the three verdict levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VerdictThresholds {
    pub recommended: f64,
    pub conditional: f64,
}

/// How the external quiet score shapes the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuietConfig {
    /// Relative importance; profiles at `1.0` or above call quiet out in
    /// verdicts.
    pub weight: f64,
    /// Quiet score separating bonus from penalty.
    pub threshold: f64,
    /// Modifier gained per 100 points above the threshold.
    pub bonus_rate: f64,
    /// Modifier lost per 100 points below the threshold.
    pub penalty_rate: f64,
}

/// Persona-specific sentences used in highlights and verdicts.
///
/// Missing entries fall back to generic wording.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NarrativeTemplates {
    pub high: PerCategory<Option<&'static str>>,
    pub low: PerCategory<Option<&'static str>>,
    pub quiet_high: Option<&'static str>,
    pub quiet_low: Option<&'static str>,
    pub verdict_recommended: Option<&'static str>,
    pub verdict_conditional: Option<&'static str>,
    pub verdict_not_recommended: Option<&'static str>,
}

impl NarrativeTemplates {
    /// Templates with no persona text at all.
    pub const EMPTY: Self = Self {
        high: PerCategory {
            shops: None,
            transport: None,
            education: None,
            health: None,
            nature: None,
            leisure: None,
            food: None,
            finance: None,
            roads: None,
        },
        low: PerCategory {
            shops: None,
            transport: None,
            education: None,
            health: None,
            nature: None,
            leisure: None,
            food: None,
            finance: None,
            roads: None,
        },
        quiet_high: None,
        quiet_low: None,
        verdict_recommended: None,
        verdict_conditional: None,
        verdict_not_recommended: None,
    };
}

/// Presentation hints accompanying a report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UxContext {
    pub report_intro: &'static str,
    pub practical_tips: &'static [&'static str],
}

/// A complete scoring persona.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileConfig {
    pub key: ProfileKey,
    pub name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    /// Raw weights; negative values penalise. Normalised at scoring time.
    pub weights: PerCategory<f64>,
    pub radius_m: PerCategory<u32>,
    pub decay_modes: PerCategory<DecayMode>,
    /// Applied in order.
    pub critical_caps: &'static [CriticalCap],
    pub dealbreakers: PerCategory<Option<f64>>,
    pub thresholds: VerdictThresholds,
    pub quiet: QuietConfig,
    #[serde(skip)]
    pub narrative: NarrativeTemplates,
    pub ux: UxContext,
}

impl ProfileConfig {
    /// Whether the category appears in a critical-cap rule.
    #[must_use]
    pub fn is_critical(&self, category: Category) -> bool {
        self.critical_caps
            .iter()
            .any(|cap| cap.category == category)
    }

    /// Dealbreaker threshold for the category, if configured.
    #[must_use]
    pub const fn dealbreaker_threshold(&self, category: Category) -> Option<f64> {
        *self.dealbreakers.get(category)
    }

    /// Whether `raw_score` falls below the category's dealbreaker threshold.
    #[must_use]
    pub fn is_dealbreaker(&self, category: Category, raw_score: f64) -> bool {
        self.dealbreaker_threshold(category)
            .is_some_and(|threshold| raw_score < threshold)
    }

    /// Weights scaled so the positive ones sum to `1.0`.
    #[must_use]
    pub fn normalized_weights(&self) -> PerCategory<f64> {
        normalize_weights(&self.weights)
    }

    /// Largest category radius; a fetch at this radius covers every category.
    #[must_use]
    pub fn max_radius_m(&self) -> u32 {
        self.radius_m
            .iter()
            .map(|(_, radius)| *radius)
            .max()
            .unwrap_or_default()
    }

    /// Display metadata without the scoring tables.
    #[must_use]
    pub const fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            key: self.key,
            name: self.name,
            description: self.description,
            emoji: self.emoji,
        }
    }
}

/// Key and display metadata of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub key: ProfileKey,
    pub name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
}
