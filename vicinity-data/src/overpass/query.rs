//! Composite Overpass QL query construction.
//!
//! The same [`TagSelector`] table drives both the remote query and the local
//! classification in [`super::classify`], so the two can never disagree.

use std::fmt::Write as _;

use vicinity_core::{Category, Tags};

/// One OSM tag filter, e.g. `["amenity"~"bank|atm"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSelector {
    /// The key is present with any value.
    Has(&'static str),
    /// The key has exactly this value.
    Equals(&'static str, &'static str),
    /// The key has one of these values.
    OneOf(&'static str, &'static [&'static str]),
}

impl TagSelector {
    /// Whether `tags` satisfy this selector.
    #[must_use]
    pub fn matches(&self, tags: &Tags) -> bool {
        match *self {
            Self::Has(key) => tags.contains_key(key),
            Self::Equals(key, value) => tags.get(key).is_some_and(|v| v == value),
            Self::OneOf(key, values) => tags
                .get(key)
                .is_some_and(|v| values.contains(&v.as_str())),
        }
    }

    /// Overpass QL filter text.
    #[must_use]
    pub fn to_ql(&self) -> String {
        match *self {
            Self::Has(key) => format!("[\"{key}\"]"),
            Self::Equals(key, value) => format!("[\"{key}\"=\"{value}\"]"),
            Self::OneOf(key, values) => format!("[\"{key}\"~\"{}\"]", values.join("|")),
        }
    }
}

const SHOPS: &[TagSelector] = &[TagSelector::Has("shop")];
const TRANSPORT: &[TagSelector] = &[
    TagSelector::Equals("public_transport", "stop_position"),
    TagSelector::Equals("highway", "bus_stop"),
    TagSelector::Equals("railway", "tram_stop"),
    TagSelector::Equals("railway", "station"),
];
const EDUCATION: &[TagSelector] = &[TagSelector::OneOf(
    "amenity",
    &["school", "kindergarten", "university"],
)];
const HEALTH: &[TagSelector] = &[TagSelector::OneOf(
    "amenity",
    &["pharmacy", "doctors", "hospital", "clinic"],
)];
const NATURE: &[TagSelector] = &[
    TagSelector::OneOf("leisure", &["park", "garden", "nature_reserve"]),
    TagSelector::OneOf(
        "landuse",
        &["forest", "meadow", "grass", "recreation_ground"],
    ),
    TagSelector::OneOf("natural", &["wood", "water", "beach"]),
];
const LEISURE: &[TagSelector] = &[TagSelector::OneOf(
    "leisure",
    &[
        "playground",
        "fitness_centre",
        "pitch",
        "sports_centre",
        "stadium",
        "swimming_pool",
    ],
)];
const FOOD: &[TagSelector] = &[TagSelector::OneOf(
    "amenity",
    &["restaurant", "cafe", "fast_food"],
)];
const FINANCE: &[TagSelector] = &[TagSelector::OneOf("amenity", &["bank", "atm"])];
const ROADS: &[TagSelector] = &[
    TagSelector::OneOf(
        "highway",
        &["motorway", "trunk", "primary", "secondary", "tertiary"],
    ),
    TagSelector::OneOf("railway", &["tram", "rail"]),
];

/// Tag selectors that place an element in `category`.
#[must_use]
pub const fn selectors(category: Category) -> &'static [TagSelector] {
    match category {
        Category::Shops => SHOPS,
        Category::Transport => TRANSPORT,
        Category::Education => EDUCATION,
        Category::Health => HEALTH,
        Category::Nature => NATURE,
        Category::Leisure => LEISURE,
        Category::Food => FOOD,
        Category::Finance => FINANCE,
        Category::Roads => ROADS,
    }
}

/// Build the union query for every category around `(lat, lon)`.
///
/// Ways are requested with `out center;` so they carry a centre point.
///
/// # Examples
/// ```
/// use vicinity_data::overpass::build_query;
///
/// let query = build_query(52.2, 21.0, 500, 60);
/// assert!(query.starts_with("[out:json][timeout:60];"));
/// assert!(query.contains("node[\"shop\"](around:500,52.2,21);"));
/// assert!(query.ends_with("out center;\n"));
/// ```
#[must_use]
pub fn build_query(lat: f64, lon: f64, radius_m: u32, timeout_secs: u64) -> String {
    let mut query = format!("[out:json][timeout:{timeout_secs}];\n(\n");
    let around = format!("(around:{radius_m},{lat},{lon});");
    for selector in Category::ALL.into_iter().flat_map(selectors) {
        let filter = selector.to_ql();
        // Writing to a String cannot fail.
        let _ = writeln!(query, "node{filter}{around}");
        let _ = writeln!(query, "way{filter}{around}");
    }
    query.push_str(");\nout center;\n");
    query
}
