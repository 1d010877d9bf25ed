//! Built-in profile catalogue.
//!
//! Tables list values in [`Category::ALL`](crate::Category::ALL) order:
//! shops, transport, education, health, nature, leisure, food, finance,
//! roads.

use log::debug;

use super::{
    CriticalCap, NarrativeTemplates, ProfileConfig, ProfileKey, ProfileSummary, QuietConfig,
    UxContext, VerdictThresholds,
};
use crate::category::{Category, PerCategory};
use crate::decay::DecayMode::{self, Background, Daily, Destination};

const fn table<T: Copy>(
    [shops, transport, education, health, nature, leisure, food, finance, roads]: [T; 9],
) -> PerCategory<T> {
    PerCategory {
        shops,
        transport,
        education,
        health,
        nature,
        leisure,
        food,
        finance,
        roads,
    }
}

const DEFAULT_DECAY: PerCategory<DecayMode> = table([
    Daily,
    Daily,
    Destination,
    Destination,
    Destination,
    Destination,
    Destination,
    Daily,
    Background,
]);

const NO_DEALBREAKERS: PerCategory<Option<f64>> = table([None; 9]);

static FAMILY: ProfileConfig = ProfileConfig {
    key: ProfileKey::Family,
    name: "Family with children",
    description: "Schools, health care and parks come first",
    emoji: "👨‍👩‍👧",
    weights: table([15.0, 12.0, 28.0, 18.0, 22.0, 8.0, 5.0, 2.0, -4.0]),
    radius_m: table([700, 900, 1200, 1500, 900, 700, 700, 900, 300]),
    decay_modes: DEFAULT_DECAY,
    critical_caps: &[
        CriticalCap {
            category: Category::Education,
            threshold: 35.0,
            ceiling: 70.0,
        },
        CriticalCap {
            category: Category::Nature,
            threshold: 30.0,
            ceiling: 75.0,
        },
    ],
    dealbreakers: table([None, None, Some(25.0), None, None, None, None, None, None]),
    thresholds: VerdictThresholds {
        recommended: 72.0,
        conditional: 48.0,
    },
    quiet: QuietConfig {
        weight: 1.5,
        threshold: 50.0,
        bonus_rate: 0.15,
        penalty_rate: 0.25,
    },
    narrative: NarrativeTemplates {
        high: table([
            None,
            Some("🚌 Good public transport, children can get to school on their own"),
            Some("🎓 Schools and kindergartens within walking distance"),
            Some("🏥 Paediatrician and clinic close by"),
            Some("🌳 Parks and playgrounds nearby, ideal for families"),
            None,
            Some("🍽️ Family-friendly places to eat around the corner"),
            None,
            None,
        ]),
        low: table([
            None,
            Some("⚠️ Weak public transport, a car will be needed"),
            Some("⚠️ No schools or kindergartens within walking distance"),
            Some("⚠️ Clinics are far away, a problem in emergencies"),
            Some("⚠️ Little green space for children to play"),
            None,
            None,
            None,
            None,
        ]),
        quiet_high: Some("🔇 Calm neighbourhood, good for children"),
        quiet_low: Some("🚨 Noisy area that may disturb children's sleep"),
        verdict_recommended: Some(
            "✅ A great fit for families: schools, greenery and calm are all in place.",
        ),
        verdict_conditional: Some(
            "⚠️ Acceptable for a family, but it needs compromises. Check the details.",
        ),
        verdict_not_recommended: Some(
            "❌ Not suitable for a family with children: key infrastructure is missing or the area is too loud.",
        ),
    },
    ux: UxContext {
        report_intro: "Assessment from the point of view of a family with children",
        practical_tips: &[
            "Visit nearby playgrounds and pitches and check their condition",
            "Walk to the nearest school or kindergarten and time the trip",
            "Listen to the street noise in the evening when children go to sleep",
        ],
    },
};

static URBAN: ProfileConfig = ProfileConfig {
    key: ProfileKey::Urban,
    name: "City life",
    description: "Everything on foot; transport and food are critical",
    emoji: "🏙️",
    weights: table([18.0, 32.0, 5.0, 8.0, 8.0, 15.0, 22.0, 7.0, -5.0]),
    radius_m: table([400, 500, 900, 1200, 900, 600, 600, 800, 300]),
    decay_modes: DEFAULT_DECAY,
    critical_caps: &[
        CriticalCap {
            category: Category::Transport,
            threshold: 45.0,
            ceiling: 60.0,
        },
        CriticalCap {
            category: Category::Food,
            threshold: 35.0,
            ceiling: 60.0,
        },
    ],
    dealbreakers: table([None, Some(20.0), None, None, None, None, None, None, None]),
    thresholds: VerdictThresholds {
        recommended: 65.0,
        conditional: 42.0,
    },
    quiet: QuietConfig {
        weight: 0.5,
        threshold: 25.0,
        bonus_rate: 0.05,
        penalty_rate: 0.1,
    },
    narrative: NarrativeTemplates {
        high: table([
            None,
            Some("🚇 Excellent transit, you can get anywhere fast without a car"),
            Some("📚 Libraries and coworking spaces close by"),
            Some("💊 Pharmacies and clinics within reach"),
            Some("🌳 A park nearby for a morning run"),
            None,
            Some("🍕 Plenty of restaurants and cafes, no need to cook"),
            None,
            None,
        ]),
        low: table([
            None,
            Some("🚫 Weak public transport, consider a car or a bike"),
            None,
            Some("⚠️ The nearest pharmacy is far away"),
            Some("🏙️ No parks, a thoroughly urban area"),
            None,
            None,
            None,
            None,
        ]),
        quiet_high: Some("🔇 Surprisingly quiet for the city centre"),
        quiet_low: Some("🎉 Lively and loud, great for night owls, hard for light sleepers"),
        verdict_recommended: Some(
            "✅ An ideal base for city life: transit, food and nightlife within reach.",
        ),
        verdict_conditional: Some(
            "⚠️ A decent urban location, but not ideal. Check the transit options.",
        ),
        verdict_not_recommended: Some(
            "❌ A weak location for city life. Transport and services fall short.",
        ),
    },
    ux: UxContext {
        report_intro: "Assessment from the point of view of an urban lifestyle",
        practical_tips: &[
            "Check the transit timetable at the hours you actually travel",
            "See which shops and restaurants are open in the evening and at weekends",
            "Walk around the area at 10 pm and judge the atmosphere",
        ],
    },
};

static INVESTOR: ProfileConfig = ProfileConfig {
    key: ProfileKey::Investor,
    name: "Investor",
    description: "Rental potential: transport, infrastructure, universities",
    emoji: "💰",
    weights: table([12.0, 30.0, 25.0, 8.0, 8.0, 12.0, 15.0, 5.0, -2.0]),
    radius_m: table([700, 800, 1500, 1500, 1200, 1000, 900, 800, 300]),
    decay_modes: DEFAULT_DECAY,
    critical_caps: &[CriticalCap {
        category: Category::Transport,
        threshold: 30.0,
        ceiling: 65.0,
    }],
    dealbreakers: table([None, Some(18.0), None, None, None, None, None, None, None]),
    thresholds: VerdictThresholds {
        recommended: 62.0,
        conditional: 38.0,
    },
    quiet: QuietConfig {
        weight: 0.8,
        threshold: 35.0,
        bonus_rate: 0.08,
        penalty_rate: 0.15,
    },
    narrative: NarrativeTemplates {
        high: table([
            Some("🛒 Everyday shopping on the doorstep, a plus for tenants"),
            Some("🚇 Strong transit links keep vacancy low"),
            Some("🎓 Universities nearby mean steady student demand"),
            None,
            None,
            None,
            Some("☕ Cafes and restaurants make the area attractive to renters"),
            None,
            None,
        ]),
        low: table([
            None,
            Some("🚫 Poor transit will make tenants hard to find"),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        ]),
        quiet_high: None,
        quiet_low: Some("🔊 Noise may shorten tenancies"),
        verdict_recommended: Some(
            "✅ High rental potential: transport and infrastructure are in place.",
        ),
        verdict_conditional: Some("⚠️ Moderate potential; some gaps may limit the return."),
        verdict_not_recommended: Some("❌ Low rental potential; finding tenants will be hard."),
    },
    ux: UxContext {
        report_intro: "Assessment of the location's investment potential",
        practical_tips: &[
            "Compare asking rents per square metre for similar flats nearby",
            "Decide which tenant group the flat targets",
            "Check zoning plans for what will be built in the area",
        ],
    },
};

static QUIET_GREEN: ProfileConfig = ProfileConfig {
    key: ProfileKey::QuietGreen,
    name: "Quiet and green",
    description: "Silence and greenery matter more than services",
    emoji: "🌿",
    weights: table([12.0, 8.0, 5.0, 10.0, 42.0, 10.0, 5.0, 3.0, -12.0]),
    radius_m: table([900, 1200, 1500, 2000, 1000, 1200, 1200, 1000, 400]),
    decay_modes: table([
        Daily,
        Daily,
        Destination,
        Destination,
        Background,
        Destination,
        Destination,
        Daily,
        Background,
    ]),
    critical_caps: &[CriticalCap {
        category: Category::Nature,
        threshold: 35.0,
        ceiling: 75.0,
    }],
    dealbreakers: NO_DEALBREAKERS,
    thresholds: VerdictThresholds {
        recommended: 65.0,
        conditional: 45.0,
    },
    quiet: QuietConfig {
        weight: 1.8,
        threshold: 60.0,
        bonus_rate: 0.15,
        penalty_rate: 0.3,
    },
    narrative: NarrativeTemplates {
        high: table([
            None,
            None,
            None,
            None,
            Some("🌲 Woodland and parks right outside the door"),
            None,
            None,
            None,
            None,
        ]),
        low: table([
            None,
            None,
            None,
            None,
            Some("⚠️ Hardly any greenery within reach"),
            None,
            None,
            None,
            None,
        ]),
        quiet_high: Some("🔇 Genuinely quiet surroundings"),
        quiet_low: Some("🚨 Too loud for a calm life"),
        verdict_recommended: Some("✅ A quiet, green area made for a peaceful life."),
        verdict_conditional: Some("⚠️ There is greenery, but check the noise on site."),
        verdict_not_recommended: Some("❌ This location offers neither calm nor contact with nature."),
    },
    ux: UxContext {
        report_intro: "Assessment from the point of view of someone who values calm and greenery",
        practical_tips: &[
            "Stand by the window for a few minutes at different times of day",
            "Walk to the nearest park or forest and judge the route",
            "Check whether the windows look onto greenery or concrete",
        ],
    },
};

static REMOTE_WORK: ProfileConfig = ProfileConfig {
    key: ProfileKey::RemoteWork,
    name: "Home office",
    description: "Quiet during the day and the basics nearby",
    emoji: "💻",
    weights: table([18.0, 10.0, 3.0, 14.0, 22.0, 10.0, 8.0, 5.0, -10.0]),
    radius_m: table([700, 1000, 1200, 1500, 900, 900, 900, 800, 300]),
    decay_modes: DEFAULT_DECAY,
    critical_caps: &[],
    dealbreakers: NO_DEALBREAKERS,
    thresholds: VerdictThresholds {
        recommended: 65.0,
        conditional: 45.0,
    },
    quiet: QuietConfig {
        weight: 1.2,
        threshold: 50.0,
        bonus_rate: 0.1,
        penalty_rate: 0.2,
    },
    narrative: NarrativeTemplates {
        high: table([
            Some("🛒 Shops for a quick errand between calls"),
            None,
            None,
            None,
            Some("🌳 Green space for a lunchtime walk"),
            None,
            Some("☕ Cafes nearby for a change of scene"),
            None,
            None,
        ]),
        ..NarrativeTemplates::EMPTY
    },
    ux: UxContext {
        report_intro: "Assessment from the point of view of remote work",
        practical_tips: &[
            "Check the noise level during working hours",
            "Look for lunch options within a short walk",
            "Find a cafe with wifi for a change of surroundings",
        ],
    },
};

static ACTIVE_SPORT: ProfileConfig = ProfileConfig {
    key: ProfileKey::ActiveSport,
    name: "Active and sporty",
    description: "Trails, greenery and sports facilities",
    emoji: "🏃",
    weights: table([12.0, 8.0, 0.0, 10.0, 32.0, 22.0, 6.0, 5.0, -5.0]),
    radius_m: table([800, 1000, 1500, 1800, 1200, 1200, 900, 1000, 300]),
    decay_modes: DEFAULT_DECAY,
    critical_caps: &[],
    dealbreakers: NO_DEALBREAKERS,
    thresholds: VerdictThresholds {
        recommended: 65.0,
        conditional: 45.0,
    },
    quiet: QuietConfig {
        weight: 0.8,
        threshold: 40.0,
        bonus_rate: 0.08,
        penalty_rate: 0.12,
    },
    narrative: NarrativeTemplates {
        high: table([
            None,
            None,
            None,
            None,
            Some("🌳 Parks and trails for running and cycling"),
            Some("🏟️ Sports facilities within easy reach"),
            None,
            None,
            None,
        ]),
        ..NarrativeTemplates::EMPTY
    },
    ux: UxContext {
        report_intro: "Assessment from the point of view of an active lifestyle",
        practical_tips: &[
            "Run or walk the local routes and check surfaces and lighting",
            "Check opening hours and prices of the nearest sports venues",
            "See how wide the park paths are for running and cycling",
        ],
    },
};

static BALANCED: ProfileConfig = ProfileConfig {
    key: ProfileKey::Balanced,
    name: "Balanced",
    description: "Even weights across everyday needs",
    emoji: "🎛️",
    weights: table([15.0, 15.0, 12.0, 12.0, 18.0, 10.0, 10.0, 8.0, -5.0]),
    radius_m: table([800, 900, 1200, 1500, 1000, 900, 800, 800, 300]),
    decay_modes: DEFAULT_DECAY,
    critical_caps: &[],
    dealbreakers: NO_DEALBREAKERS,
    thresholds: VerdictThresholds {
        recommended: 65.0,
        conditional: 45.0,
    },
    quiet: QuietConfig {
        weight: 1.0,
        threshold: 50.0,
        bonus_rate: 0.1,
        penalty_rate: 0.2,
    },
    narrative: NarrativeTemplates::EMPTY,
    ux: UxContext {
        report_intro: "Assessment against an even set of everyday needs",
        practical_tips: &[
            "Compare the result with another profile to see what changes",
            "Check the categories that matter most to you during a visit",
        ],
    },
};

/// Profile for a known key.
#[must_use]
pub fn profile(key: ProfileKey) -> &'static ProfileConfig {
    match key {
        ProfileKey::Family => &FAMILY,
        ProfileKey::Urban => &URBAN,
        ProfileKey::Investor => &INVESTOR,
        ProfileKey::QuietGreen => &QUIET_GREEN,
        ProfileKey::RemoteWork => &REMOTE_WORK,
        ProfileKey::ActiveSport => &ACTIVE_SPORT,
        ProfileKey::Balanced => &BALANCED,
    }
}

/// Profile for an identifier, falling back to [`ProfileKey::DEFAULT`].
#[must_use]
pub fn get_profile(key: &str) -> &'static ProfileConfig {
    ProfileKey::lookup(key).map_or_else(
        || {
            debug!("unknown profile '{key}', using {}", ProfileKey::DEFAULT);
            profile(ProfileKey::DEFAULT)
        },
        profile,
    )
}

/// Every built-in profile in registry order.
#[must_use]
pub fn all_profiles() -> [&'static ProfileConfig; 7] {
    ProfileKey::ALL.map(profile)
}

/// Display metadata for every built-in profile.
#[must_use]
pub fn profile_summaries() -> Vec<ProfileSummary> {
    all_profiles()
        .into_iter()
        .map(ProfileConfig::summary)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn keys_resolve_to_matching_profiles() {
        for key in ProfileKey::ALL {
            assert_eq!(profile(key).key, key);
            assert_eq!(get_profile(key.as_str()).key, key);
        }
    }

    #[rstest]
    #[case("")]
    #[case("custom")]
    #[case("nomad")]
    fn unknown_keys_use_default(#[case] raw: &str) {
        assert_eq!(get_profile(raw).key, ProfileKey::Family);
    }

    #[rstest]
    fn lookup_ignores_case_and_padding() {
        assert_eq!(get_profile("  Quiet_Green ").key, ProfileKey::QuietGreen);
    }

    #[rstest]
    fn normalized_positive_weights_sum_to_one() {
        for config in all_profiles() {
            let positive: f64 = config
                .normalized_weights()
                .iter()
                .map(|(_, w)| *w)
                .filter(|w| *w > 0.0)
                .sum();
            assert!((positive - 1.0).abs() < 1e-9, "{}: {positive}", config.key);
        }
    }

    #[rstest]
    #[case(ProfileKey::Family, 1500)]
    #[case(ProfileKey::Urban, 1200)]
    #[case(ProfileKey::QuietGreen, 2000)]
    fn max_radius_covers_widest_category(#[case] key: ProfileKey, #[case] expected: u32) {
        assert_eq!(profile(key).max_radius_m(), expected);
    }

    #[rstest]
    fn thresholds_are_ordered() {
        for config in all_profiles() {
            assert!(config.thresholds.recommended > config.thresholds.conditional);
        }
    }

    #[rstest]
    fn roads_are_penalised_everywhere() {
        for config in all_profiles() {
            assert!(config.weights.roads < 0.0, "{}", config.key);
        }
    }

    #[rstest]
    fn family_rules() {
        let family = profile(ProfileKey::Family);
        assert!(family.is_critical(Category::Education));
        assert!(family.is_critical(Category::Nature));
        assert!(!family.is_critical(Category::Food));
        assert!(family.is_dealbreaker(Category::Education, 24.9));
        assert!(!family.is_dealbreaker(Category::Education, 25.0));
        assert!(!family.is_dealbreaker(Category::Transport, 0.0));
    }

    #[rstest]
    fn summaries_follow_registry_order() {
        let keys: Vec<_> = profile_summaries().iter().map(|s| s.key).collect();
        assert_eq!(keys, ProfileKey::ALL.to_vec());
    }
}
