//! Output rounding shared by serialised report types.
//!
//! Scores leave the crate with one decimal place, weights and modifiers with
//! three, and distances as whole meters. Values are kept at full precision
//! internally and rounded only when serialised.

use serde::Serializer;

/// Round to `places` decimal places; non-finite values become `0.0`.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

pub(crate) fn one_decimal<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 1))
}

pub(crate) fn three_decimals<S: Serializer>(
    value: &f64,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 3))
}

// Distances are bounded by the query radius, so the cast cannot truncate.
pub(crate) fn whole_meters<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(round_to(*value, 0) as i64)
}

pub(crate) fn optional_whole_meters<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(distance) => whole_meters(distance, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(61.04, 1, 61.0)]
    #[case(61.05_f64 + 1e-9, 1, 61.1)]
    #[case(0.123_456, 3, 0.123)]
    #[case(149.5, 0, 150.0)]
    fn rounds_half_away_from_zero(#[case] value: f64, #[case] places: i32, #[case] expected: f64) {
        assert!((round_to(value, places) - expected).abs() < 1e-12);
    }

    #[rstest]
    fn non_finite_rounds_to_zero() {
        assert_eq!(round_to(f64::NAN, 1), 0.0);
        assert_eq!(round_to(f64::INFINITY, 1), 0.0);
    }
}
