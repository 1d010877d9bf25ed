//! Greenery and water statistics around a reference point.
//!
//! Unlike the scored categories, landcover is summarised rather than listed:
//! counts per type, the nearest feature of each type, and a density proxy in
//! elements per square kilometre of the search disc.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::poi::PointOfInterest;

/// Density (elements/km²) at or above which greenery counts as high.
pub const HIGH_DENSITY: f64 = 15.0;
/// Density at or above which greenery counts as medium.
pub const MEDIUM_DENSITY: f64 = 5.0;

const LANDCOVER: [&str; 5] = ["forest", "wood", "meadow", "grass", "recreation_ground"];
const PARKS: [&str; 3] = ["park", "garden", "nature_reserve"];
const WATER: [&str; 2] = ["water", "beach"];
const PARK_KEY: &str = "park";

/// Qualitative greenery bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GreeneryLevel {
    High,
    Medium,
    Low,
}

impl GreeneryLevel {
    #[must_use]
    pub fn from_density(density: f64) -> Self {
        if density >= HIGH_DENSITY {
            Self::High
        } else if density >= MEDIUM_DENSITY {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

fn whole_meters(distance_m: f64) -> u64 {
    // Distances come from the haversine helper and are never negative.
    distance_m.max(0.0).round() as u64
}

fn keep_nearest(slot: &mut BTreeMap<String, u64>, kind: &str, distance: u64) {
    slot.entry(kind.to_owned())
        .and_modify(|nearest| *nearest = (*nearest).min(distance))
        .or_insert(distance);
}

/// Accumulated greenery and water statistics.
///
/// # Examples
/// ```
/// use vicinity_core::{GreeneryLevel, NatureMetrics};
///
/// let mut metrics = NatureMetrics::default();
/// for _ in 0..20 {
///     metrics.add_landcover("grass", 300.0);
/// }
/// metrics.add_park(120.4);
/// metrics.calculate_density(1000);
///
/// assert_eq!(metrics.greenery_level(), GreeneryLevel::Medium);
/// assert_eq!(metrics.nearest_park_label(), "Nearest park: 120 m");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NatureMetrics {
    pub green_landcover_counts: BTreeMap<String, usize>,
    pub green_types_present: BTreeSet<String>,
    /// Nearest feature per landcover type, plus `park`.
    pub nearest_distances: BTreeMap<String, u64>,
    pub total_green_elements: usize,
    /// Landcover elements per square kilometre.
    pub green_density_proxy: f64,
    pub water_present: bool,
    pub nearest_water_m: Option<u64>,
    pub water_types_present: BTreeSet<String>,
    pub water_type_distances: BTreeMap<String, u64>,
}

impl NatureMetrics {
    /// Summarise nature-category POIs found within `radius_m`.
    #[must_use]
    pub fn from_pois(pois: &[PointOfInterest], radius_m: u32) -> Self {
        let mut metrics = Self::default();
        for poi in pois {
            let kind = poi.subcategory.as_str();
            if LANDCOVER.contains(&kind) {
                metrics.add_landcover(kind, poi.distance_m);
            } else if PARKS.contains(&kind) {
                metrics.add_park(poi.distance_m);
            } else if WATER.contains(&kind) {
                let water_kind = poi.tags.get("water").map_or(kind, String::as_str);
                metrics.add_water(poi.distance_m, water_kind);
            }
        }
        metrics.calculate_density(radius_m);
        metrics
    }

    pub fn add_landcover(&mut self, kind: &str, distance_m: f64) {
        *self.green_landcover_counts.entry(kind.to_owned()).or_default() += 1;
        self.green_types_present.insert(kind.to_owned());
        self.total_green_elements += 1;
        keep_nearest(&mut self.nearest_distances, kind, whole_meters(distance_m));
    }

    pub fn add_park(&mut self, distance_m: f64) {
        keep_nearest(&mut self.nearest_distances, PARK_KEY, whole_meters(distance_m));
    }

    pub fn add_water(&mut self, distance_m: f64, kind: &str) {
        let distance = whole_meters(distance_m);
        self.water_present = true;
        self.water_types_present.insert(kind.to_owned());
        self.nearest_water_m = Some(self.nearest_water_m.map_or(distance, |d| d.min(distance)));
        keep_nearest(&mut self.water_type_distances, kind, distance);
    }

    /// Derive the density proxy for a search disc of `radius_m`.
    pub fn calculate_density(&mut self, radius_m: u32) {
        let radius_km = f64::from(radius_m) / 1000.0;
        let area_km2 = std::f64::consts::PI * radius_km * radius_km;
        if area_km2 > 0.0 {
            self.green_density_proxy = self.total_green_elements as f64 / area_km2;
        }
    }

    #[must_use]
    pub fn greenery_level(&self) -> GreeneryLevel {
        GreeneryLevel::from_density(self.green_density_proxy)
    }

    #[must_use]
    pub fn greenery_label(&self) -> String {
        format!("Greenery nearby: {}", self.greenery_level().as_str())
    }

    /// Comma-separated landcover names, or `None` when nothing was found.
    ///
    /// Forest and wood are reported once as forest.
    #[must_use]
    pub fn types_label(&self) -> Option<String> {
        if self.green_types_present.is_empty() {
            return None;
        }
        let names: BTreeSet<&str> = self
            .green_types_present
            .iter()
            .map(|kind| match kind.as_str() {
                "forest" | "wood" => "forest",
                "recreation_ground" => "recreation ground",
                other => other,
            })
            .collect();
        let joined: Vec<&str> = names.into_iter().collect();
        Some(format!("Green types: {}", joined.join(", ")))
    }

    #[must_use]
    pub fn nearest_park_label(&self) -> String {
        self.nearest_distances.get(PARK_KEY).map_or_else(
            || "No park within range".to_owned(),
            |distance| format!("Nearest park: {distance} m"),
        )
    }

    /// Nearest body of water by kind, or `None` without water.
    #[must_use]
    pub fn water_label(&self) -> Option<String> {
        if !self.water_present {
            return None;
        }
        let nearest = self
            .water_type_distances
            .iter()
            .min_by_key(|(_, distance)| **distance);
        Some(match nearest {
            Some((kind, distance)) => format!("Nearest {}: {distance} m", water_name(kind)),
            None => "Water nearby".to_owned(),
        })
    }

    /// Metrics together with their derived labels.
    #[must_use]
    pub fn summary(&self) -> NatureSummary<'_> {
        NatureSummary {
            metrics: self,
            greenery_level: self.greenery_level(),
            greenery_label: self.greenery_label(),
            types_label: self.types_label(),
            nearest_park_label: self.nearest_park_label(),
            water_label: self.water_label(),
        }
    }
}

fn water_name(kind: &str) -> &str {
    match kind {
        "water" => "body of water",
        other => other,
    }
}

/// Serialisable view of [`NatureMetrics`] with labels.
#[derive(Debug, Clone, Serialize)]
pub struct NatureSummary<'a> {
    #[serde(flatten)]
    pub metrics: &'a NatureMetrics,
    pub greenery_level: GreeneryLevel,
    pub greenery_label: String,
    pub types_label: Option<String>,
    pub nearest_park_label: String,
    pub water_label: Option<String>,
}
