use std::collections::BTreeMap;

use geo::{Coord, Distance, Haversine, Point};
use serde::Serialize;

use crate::category::{Category, PerCategory};
use crate::rounding::whole_meters;

/// Free-form OpenStreetMap key/value tags.
pub type Tags = BTreeMap<String, String>;

/// A classified feature found near a reference point.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. The
/// distance keeps full precision; it is rounded to whole meters only when
/// serialised.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use vicinity_core::{Category, PointOfInterest, Tags};
///
/// let poi = PointOfInterest::new(
///     Category::Food,
///     "cafe",
///     "Corner Cafe",
///     Coord { x: 21.0, y: 52.0 },
///     149.6,
///     Tags::from([("amenity".into(), "cafe".into())]),
/// );
///
/// assert_eq!(poi.category, Category::Food);
/// assert_eq!(poi.rounded_distance_m(), 150);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointOfInterest {
    pub category: Category,
    pub subcategory: String,
    pub name: String,
    #[serde(serialize_with = "serialize_coord")]
    pub location: Coord<f64>,
    #[serde(serialize_with = "whole_meters")]
    pub distance_m: f64,
    pub tags: Tags,
}

impl PointOfInterest {
    /// Construct a `PointOfInterest` from already-resolved parts.
    pub fn new(
        category: Category,
        subcategory: impl Into<String>,
        name: impl Into<String>,
        location: Coord<f64>,
        distance_m: f64,
        tags: Tags,
    ) -> Self {
        Self {
            category,
            subcategory: subcategory.into(),
            name: name.into(),
            location,
            distance_m,
            tags,
        }
    }

    /// Distance to the reference point rounded to the nearest meter.
    #[must_use]
    pub fn rounded_distance_m(&self) -> u64 {
        // Negative or non-finite distances never come out of `haversine_m`.
        self.distance_m.max(0.0).round() as u64
    }
}

pub(crate) fn serialize_coord<S: serde::Serializer>(
    coord: &Coord<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;

    let mut state = serializer.serialize_struct("Coord", 2)?;
    state.serialize_field("lat", &coord.y)?;
    state.serialize_field("lon", &coord.x)?;
    state.end()
}

/// Great-circle distance in meters between two WGS84 coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use vicinity_core::haversine_m;
///
/// let a = Coord { x: 21.0122, y: 52.2297 };
/// let b = Coord { x: 21.0122, y: 52.2387 };
/// let d = haversine_m(a, b);
/// assert!((d - 1000.0).abs() < 5.0);
/// ```
#[must_use]
pub fn haversine_m(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to))
}

/// POIs grouped by category, each list sorted by ascending distance.
pub type PoisByCategory = PerCategory<Vec<PointOfInterest>>;

/// Sort every list in place by ascending distance.
pub fn sort_by_distance(pois: &mut PoisByCategory) {
    for category in Category::ALL {
        pois.get_mut(category)
            .sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    }
}

/// Number of POIs found per category.
#[must_use]
pub fn poi_counts(pois: &PoisByCategory) -> PerCategory<usize> {
    pois.map(|_, list| list.len())
}
