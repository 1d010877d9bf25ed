//! Overpass JSON response types.
//!
//! Only the fields the classifier needs are modelled; everything else in the
//! payload (`version`, `osm3s`, element geometry) is ignored.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL#Output_formats>

use geo::Coord;
use serde::Deserialize;
use vicinity_core::Tags;

/// Top-level `[out:json]` payload.
#[derive(Debug, Default, Deserialize)]
pub struct OverpassResponse {
    /// Matched elements.
    #[serde(default)]
    pub elements: Vec<Element>,

    /// Server-side diagnostic, e.g. a runtime error or timeout notice.
    #[serde(default)]
    pub remark: Option<String>,
}

/// A node or way as returned by `out center;`.
#[derive(Debug, Deserialize)]
pub struct Element {
    /// `"node"`, `"way"` or `"relation"`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// OSM identifier.
    #[serde(default)]
    pub id: u64,

    /// Latitude for nodes.
    pub lat: Option<f64>,

    /// Longitude for nodes.
    pub lon: Option<f64>,

    /// Centre point for ways.
    pub center: Option<Center>,

    /// OSM tags.
    #[serde(default)]
    pub tags: Tags,
}

/// Centre point attached to ways by `out center;`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl Element {
    /// Own coordinates if present, otherwise the way centre (`x = lon`).
    #[must_use]
    pub fn location(&self) -> Option<Coord<f64>> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coord { x: lon, y: lat }),
            _ => self.center.map(|c| Coord { x: c.lon, y: c.lat }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_node_and_way() {
        let json = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 52.1, "lon": 21.1, "tags": {"shop": "bakery"}},
                {"type": "way", "id": 2, "center": {"lat": 52.2, "lon": 21.2},
                 "nodes": [5, 6], "tags": {"leisure": "park"}}
            ]
        }"#;

        let response: OverpassResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.remark.is_none());
        assert_eq!(response.elements.len(), 2);
        let node = response.elements.first().expect("node");
        assert_eq!(node.location(), Some(Coord { x: 21.1, y: 52.1 }));
        let way = response.elements.get(1).expect("way");
        assert_eq!(way.kind, "way");
        assert_eq!(way.location(), Some(Coord { x: 21.2, y: 52.2 }));
    }

    #[test]
    fn deserialise_remark_without_elements() {
        let json = r#"{"elements": [], "remark": "runtime error: Query timed out"}"#;

        let response: OverpassResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.elements.is_empty());
        assert_eq!(
            response.remark.as_deref(),
            Some("runtime error: Query timed out")
        );
    }

    #[test]
    fn element_without_coordinates_has_no_location() {
        let json = r#"{"type": "relation", "id": 9, "tags": {"name": "x"}}"#;

        let element: Element = serde_json::from_str(json).expect("should deserialise");

        assert!(element.location().is_none());
    }
}
