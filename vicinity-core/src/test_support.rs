//! Test-only `PoiSource` implementations and POI builders used by unit and
//! behaviour tests.

use std::sync::Mutex;

use geo::Coord;

use crate::{Category, PoiSource, PoisByCategory, PointOfInterest, Tags, sort_by_distance};

/// Build a POI located at the origin with only its distance set.
pub fn poi_at(category: Category, subcategory: &str, distance_m: f64) -> PointOfInterest {
    PointOfInterest::new(
        category,
        subcategory,
        subcategory,
        Coord { x: 0.0, y: 0.0 },
        distance_m,
        Tags::new(),
    )
}

/// `PoiSource` returning the same POIs for every query.
///
/// Each call is recorded so tests can assert on the requested area.
#[derive(Debug, Default)]
pub struct FixedPoiSource {
    pois: PoisByCategory,
    calls: Mutex<Vec<(f64, f64, u32)>>,
}

impl FixedPoiSource {
    /// Create a source from POIs in any order.
    pub fn new(mut pois: PoisByCategory) -> Self {
        sort_by_distance(&mut pois);
        Self {
            pois,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a source from a flat list, grouping by category.
    pub fn from_pois<I>(pois: I) -> Self
    where
        I: IntoIterator<Item = PointOfInterest>,
    {
        let mut grouped = PoisByCategory::default();
        for poi in pois {
            grouped.get_mut(poi.category).push(poi);
        }
        Self::new(grouped)
    }

    /// Queries received so far as `(lat, lon, radius_m)`.
    pub fn calls(&self) -> Vec<(f64, f64, u32)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl PoiSource for FixedPoiSource {
    fn get_pois_around(&self, lat: f64, lon: f64, radius_m: u32) -> PoisByCategory {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((lat, lon, radius_m));
        }
        self.pois.clone()
    }
}

/// `PoiSource` that finds nothing, mimicking an unreachable upstream.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyPoiSource;

impl PoiSource for EmptyPoiSource {
    fn get_pois_around(&self, _lat: f64, _lon: f64, _radius_m: u32) -> PoisByCategory {
        PoisByCategory::default()
    }
}
