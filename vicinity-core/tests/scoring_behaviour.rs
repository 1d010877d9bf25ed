//! Behavioural tests for the weighted scoring engine and verdicts.

use std::cell::{Cell, RefCell};

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use vicinity_core::{
    Category, DEALBREAKER_CEILING, PerCategory, ProfileConfig, ProfileKey, ScoringEngine,
    ScoringResult, Verdict, VerdictGenerator, VerdictLevel, profile,
};

/// World state shared by scoring scenarios.
#[derive(Debug)]
struct ScoringWorld {
    profile: Cell<&'static ProfileConfig>,
    scores: RefCell<PerCategory<f64>>,
    quiet: Cell<f64>,
    result: RefCell<Option<ScoringResult>>,
    verdict: RefCell<Option<Verdict>>,
    comparison: Cell<Option<(f64, f64)>>,
}

impl Default for ScoringWorld {
    fn default() -> Self {
        Self {
            profile: Cell::new(profile(ProfileKey::DEFAULT)),
            scores: RefCell::new(PerCategory::default()),
            quiet: Cell::new(50.0),
            result: RefCell::new(None),
            verdict: RefCell::new(None),
            comparison: Cell::new(None),
        }
    }
}

impl ScoringWorld {
    fn total(&self) -> f64 {
        self.result
            .borrow()
            .as_ref()
            .map(|result| result.total_score)
            .expect("location should be scored")
    }
}

#[fixture]
fn world() -> ScoringWorld {
    ScoringWorld::default()
}

fn amenities(score: f64) -> PerCategory<f64> {
    PerCategory {
        roads: 0.0,
        ..PerCategory::from_fn(|_| score)
    }
}

// --- Given steps ---

#[given("the balanced profile")]
fn given_balanced(world: &ScoringWorld) {
    world.profile.set(profile(ProfileKey::Balanced));
}

#[given("the family profile")]
fn given_family(world: &ScoringWorld) {
    world.profile.set(profile(ProfileKey::Family));
}

#[given("every amenity category scores 60")]
fn given_all_sixty(world: &ScoringWorld) {
    world.scores.replace(amenities(60.0));
}

#[given("every amenity category scores 80")]
fn given_all_eighty(world: &ScoringWorld) {
    world.scores.replace(amenities(80.0));
}

#[given("every amenity category scores 100")]
fn given_all_hundred(world: &ScoringWorld) {
    world.scores.replace(amenities(100.0));
}

#[given("education scores 10")]
fn given_weak_education(world: &ScoringWorld) {
    world.scores.borrow_mut().education = 10.0;
}

#[given("nature scores 20")]
fn given_weak_nature(world: &ScoringWorld) {
    world.scores.borrow_mut().nature = 20.0;
}

#[given("category scores favouring transit and food")]
fn given_lively_centre(world: &ScoringWorld) {
    world.scores.replace(PerCategory {
        shops: 70.0,
        transport: 90.0,
        education: 10.0,
        health: 50.0,
        nature: 15.0,
        leisure: 70.0,
        food: 90.0,
        finance: 60.0,
        roads: 40.0,
    });
}

#[given("a quiet score of 20")]
fn given_quiet_twenty(world: &ScoringWorld) {
    world.quiet.set(20.0);
}

#[given("a quiet score of 60")]
fn given_quiet_sixty(world: &ScoringWorld) {
    world.quiet.set(60.0);
}

#[given("a quiet score of 80")]
fn given_quiet_eighty(world: &ScoringWorld) {
    world.quiet.set(80.0);
}

#[given("a quiet score of 100")]
fn given_quiet_hundred(world: &ScoringWorld) {
    world.quiet.set(100.0);
}

// --- When steps ---

#[when("the location is scored")]
fn when_scored(world: &ScoringWorld) {
    let config = world.profile.get();
    let result = ScoringEngine::new(config).calculate(&world.scores.borrow(), world.quiet.get());
    world
        .verdict
        .replace(Some(VerdictGenerator.generate(&result, config)));
    world.result.replace(Some(result));
}

#[when("the location is scored for the urban and family profiles")]
fn when_scored_for_both(world: &ScoringWorld) {
    let scores = world.scores.borrow();
    let quiet = world.quiet.get();
    let urban = ScoringEngine::new(profile(ProfileKey::Urban)).calculate(&scores, quiet);
    let family = ScoringEngine::new(profile(ProfileKey::Family)).calculate(&scores, quiet);
    world
        .comparison
        .set(Some((urban.total_score, family.total_score)));
}

// --- Then steps ---

#[then("no dealbreaker is reported")]
fn then_no_dealbreaker(world: &ScoringWorld) {
    let result = world.result.borrow();
    let result = result.as_ref().expect("location should be scored");
    assert!(!result.has_dealbreaker, "unexpected dealbreaker: {result:?}");
}

#[then("a dealbreaker is reported")]
fn then_dealbreaker(world: &ScoringWorld) {
    let result = world.result.borrow();
    let result = result.as_ref().expect("location should be scored");
    assert!(result.has_dealbreaker);
    assert_eq!(
        result.dealbreakers().collect::<Vec<_>>(),
        vec![Category::Education]
    );
}

#[then("the total score lies between 55 and 65")]
fn then_total_in_band(world: &ScoringWorld) {
    let total = world.total();
    assert!((55.0..=65.0).contains(&total), "total {total} outside [55, 65]");
}

#[then("the total score is at most 40")]
fn then_total_at_most_forty(world: &ScoringWorld) {
    assert!(world.total() <= DEALBREAKER_CEILING);
}

#[then("the total score is at most 75")]
fn then_total_at_most_seventy_five(world: &ScoringWorld) {
    assert!(world.total() <= 75.0);
}

#[then("the nature cap is recorded")]
fn then_nature_cap(world: &ScoringWorld) {
    let result = world.result.borrow();
    let result = result.as_ref().expect("location should be scored");
    assert_eq!(result.critical_caps_applied, vec![Category::Nature]);
}

#[then("the verdict is not recommended with high confidence")]
fn then_not_recommended(world: &ScoringWorld) {
    let verdict = world.verdict.borrow();
    let verdict = verdict.as_ref().expect("verdict should be generated");
    assert_eq!(verdict.level, VerdictLevel::NotRecommended);
    assert_eq!(verdict.confidence, 95);
    assert!(verdict.key_factors.len() <= 5);
}

#[then("the urban total exceeds the family total")]
fn then_urban_wins(world: &ScoringWorld) {
    let (urban, family) = world.comparison.get().expect("profiles should be compared");
    assert!(urban > family, "urban {urban} should exceed family {family}");
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/scoring.feature", name = $title)]
        fn $fn_name(world: ScoringWorld) {
            let _ = world;
        }
    };
}

register_scenario!(
    uniform_scores_balanced,
    "uniform scores under the balanced profile"
);
register_scenario!(
    family_dealbreaker,
    "missing schools are a dealbreaker for families"
);
register_scenario!(family_nature_cap, "weak green space caps the family total");
register_scenario!(
    urban_beats_family,
    "a lively centre suits city life better than family life"
);
