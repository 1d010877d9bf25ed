//! Local classification of Overpass elements into categorised POIs.

use geo::Coord;
use log::debug;
use vicinity_core::{
    Category, PoisByCategory, PointOfInterest, Tags, haversine_m, sort_by_distance,
};

use super::query::selectors;
use super::response::Element;

const UNNAMED: &str = "Unnamed place";

/// Categories whose selectors match `tags`, in [`Category::ALL`] order.
///
/// An element may land in several categories, e.g. a bakery that is also a
/// café.
#[must_use]
pub fn matching_categories(tags: &Tags) -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|category| selectors(*category).iter().any(|s| s.matches(tags)))
        .collect()
}

fn first_tag<'a>(tags: &'a Tags, keys: &[&str]) -> &'a str {
    keys.iter()
        .filter_map(|key| tags.get(*key))
        .find(|value| !value.is_empty())
        .map_or("", String::as_str)
}

/// Subcategory of an element within `category`.
///
/// Returns an empty string when none of the category's keys is set.
#[must_use]
pub fn subcategory(category: Category, tags: &Tags) -> &str {
    match category {
        Category::Shops => first_tag(tags, &["shop"]),
        Category::Transport => {
            let railway = tags.get("railway").map(String::as_str);
            if tags.get("highway").is_some_and(|v| v == "bus_stop") {
                "bus_stop"
            } else if let Some(stop @ ("tram_stop" | "station")) = railway {
                stop
            } else {
                first_tag(tags, &["public_transport"])
            }
        }
        Category::Education | Category::Health | Category::Food | Category::Finance => {
            first_tag(tags, &["amenity"])
        }
        Category::Nature => first_tag(tags, &["leisure", "landuse", "natural"]),
        Category::Leisure => first_tag(tags, &["leisure"]),
        Category::Roads => first_tag(tags, &["highway", "railway"]),
    }
}

fn subcategory_label(subcategory: &str) -> Option<&'static str> {
    let label = match subcategory {
        "supermarket" => "Supermarket",
        "convenience" => "Convenience store",
        "mall" => "Shopping centre",
        "bakery" => "Bakery",
        "clothes" => "Clothes shop",
        "hairdresser" => "Hairdresser",
        "beauty" => "Beauty salon",
        "kiosk" => "Kiosk",
        "alcohol" => "Off-licence",
        "florist" => "Florist",
        "greengrocer" => "Greengrocer",
        "butcher" => "Butcher",
        "car_repair" => "Car repair",
        "doityourself" => "DIY store",
        "drugstore" => "Drugstore",
        "books" => "Bookshop",
        "electronics" => "Electronics shop",
        "shoes" => "Shoe shop",
        "furniture" => "Furniture shop",
        "jewelry" => "Jeweller",
        "optician" => "Optician",
        "gift" => "Gift shop",
        "bus_stop" => "Bus stop",
        "tram_stop" => "Tram stop",
        "station" => "Railway station",
        "school" => "School",
        "kindergarten" => "Kindergarten",
        "university" => "University",
        "pharmacy" => "Pharmacy",
        "doctors" => "Doctor's surgery",
        "hospital" => "Hospital",
        "clinic" => "Clinic",
        "park" => "Park",
        "garden" => "Garden",
        "nature_reserve" => "Nature reserve",
        "forest" | "wood" => "Woodland",
        "meadow" => "Meadow",
        "water" => "Water",
        "beach" => "Beach",
        "grass" => "Grass",
        "recreation_ground" => "Recreation ground",
        "playground" => "Playground",
        "fitness_centre" => "Gym",
        "pitch" => "Sports pitch",
        "sports_centre" => "Sports centre",
        "stadium" => "Stadium",
        "swimming_pool" => "Swimming pool",
        "restaurant" => "Restaurant",
        "cafe" => "Café",
        "fast_food" => "Fast food",
        "bank" => "Bank",
        "atm" => "ATM",
        "motorway" => "Motorway",
        "trunk" => "Trunk road",
        "primary" => "Primary road",
        "secondary" => "Secondary road",
        "tertiary" => "Tertiary road",
        "tram" => "Tram line",
        "rail" => "Railway line",
        _ => return None,
    };
    Some(label)
}

/// `stop_position` becomes `Stop position`.
fn humanize(raw: &str) -> String {
    let spaced = raw.replace('_', " ").to_lowercase();
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Display name: `name`, then `brand`, then the subcategory label.
///
/// Never empty; falls back to `"Unnamed place"`.
///
/// # Examples
/// ```
/// use vicinity_core::Tags;
/// use vicinity_data::overpass::display_name;
///
/// let tags: Tags = [("brand".to_owned(), "Lidl".to_owned())].into();
/// assert_eq!(display_name(&tags, "supermarket"), "Lidl");
/// assert_eq!(display_name(&Tags::new(), "fitness_centre"), "Gym");
/// assert_eq!(display_name(&Tags::new(), "stop_position"), "Stop position");
/// assert_eq!(display_name(&Tags::new(), ""), "Unnamed place");
/// ```
#[must_use]
pub fn display_name(tags: &Tags, subcategory: &str) -> String {
    let named = first_tag(tags, &["name", "brand"]);
    if !named.is_empty() {
        return named.to_owned();
    }
    let label =
        subcategory_label(subcategory).map_or_else(|| humanize(subcategory), str::to_owned);
    if label.is_empty() {
        UNNAMED.to_owned()
    } else {
        label
    }
}

/// Landcover and rail lines are routinely untagged; skip the noise.
fn nameless_is_expected(category: Category, subcategory: &str) -> bool {
    match category {
        Category::Nature => matches!(
            subcategory,
            "grass" | "water" | "meadow" | "forest" | "wood" | "basin" | "garden"
        ),
        Category::Roads => matches!(subcategory, "tram" | "rail"),
        _ => false,
    }
}

fn to_poi(
    element: &Element,
    category: Category,
    location: Coord<f64>,
    centre: Coord<f64>,
) -> PointOfInterest {
    let tags = &element.tags;
    let sub = subcategory(category, tags);
    if first_tag(tags, &["name", "brand"]).is_empty() && !nameless_is_expected(category, sub) {
        debug!("nameless {category} element {} ({sub})", element.id);
    }
    PointOfInterest::new(
        category,
        sub,
        display_name(tags, sub),
        location,
        haversine_m(centre, location),
        tags.clone(),
    )
}

/// Classify raw elements around `centre` (`x = lon`, `y = lat`).
///
/// Elements without tags or coordinates are skipped. Each list in the result
/// is sorted by ascending distance.
#[must_use]
pub fn classify_elements(elements: &[Element], centre: Coord<f64>) -> PoisByCategory {
    let mut pois = PoisByCategory::default();
    for element in elements {
        if element.tags.is_empty() {
            continue;
        }
        let Some(location) = element.location() else {
            continue;
        };
        for category in matching_categories(&element.tags) {
            pois.get_mut(category)
                .push(to_poi(element, category, location, centre));
        }
    }
    sort_by_distance(&mut pois);
    pois
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overpass::Center;
    use rstest::{fixture, rstest};

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn node(id: u64, lat: f64, lon: f64, pairs: &[(&str, &str)]) -> Element {
        Element {
            kind: "node".to_owned(),
            id,
            lat: Some(lat),
            lon: Some(lon),
            center: None,
            tags: tags(pairs),
        }
    }

    #[fixture]
    fn centre() -> Coord<f64> {
        Coord { x: 21.0122, y: 52.2297 }
    }

    #[rstest]
    #[case(&[("shop", "bakery"), ("amenity", "cafe")], vec![Category::Shops, Category::Food])]
    #[case(&[("leisure", "park")], vec![Category::Nature])]
    #[case(&[("leisure", "playground")], vec![Category::Leisure])]
    #[case(&[("railway", "tram")], vec![Category::Roads])]
    #[case(&[("railway", "tram_stop")], vec![Category::Transport])]
    #[case(&[("amenity", "bench")], vec![])]
    fn categories_follow_selectors(#[case] pairs: &[(&str, &str)], #[case] expected: Vec<Category>) {
        assert_eq!(matching_categories(&tags(pairs)), expected);
    }

    #[rstest]
    #[case(Category::Transport, &[("public_transport", "stop_position"), ("railway", "tram_stop")], "tram_stop")]
    #[case(Category::Transport, &[("public_transport", "stop_position"), ("highway", "bus_stop"), ("railway", "station")], "bus_stop")]
    #[case(Category::Transport, &[("public_transport", "stop_position")], "stop_position")]
    #[case(Category::Nature, &[("natural", "water"), ("leisure", "park")], "park")]
    #[case(Category::Nature, &[("natural", "wood"), ("landuse", "forest")], "forest")]
    #[case(Category::Roads, &[("railway", "rail"), ("highway", "primary")], "primary")]
    #[case(Category::Finance, &[("amenity", "atm")], "atm")]
    fn subcategory_priority(
        #[case] category: Category,
        #[case] pairs: &[(&str, &str)],
        #[case] expected: &str,
    ) {
        assert_eq!(subcategory(category, &tags(pairs)), expected);
    }

    #[rstest]
    #[case(&[("name", "Hala Mirowska"), ("brand", "Biedronka")], "supermarket", "Hala Mirowska")]
    #[case(&[("name", ""), ("brand", "Biedronka")], "supermarket", "Biedronka")]
    #[case(&[], "convenience", "Convenience store")]
    #[case(&[], "car_wash", "Car wash")]
    #[case(&[], "", "Unnamed place")]
    fn name_fallback_order(
        #[case] pairs: &[(&str, &str)],
        #[case] sub: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(display_name(&tags(pairs), sub), expected);
    }

    #[rstest]
    fn multi_category_element_is_listed_twice(centre: Coord<f64>) {
        let elements = [node(1, 52.2300, 21.0122, &[("shop", "bakery"), ("amenity", "cafe")])];

        let pois = classify_elements(&elements, centre);

        assert_eq!(pois.shops.len(), 1);
        assert_eq!(pois.food.len(), 1);
        let cafe = pois.food.first().expect("food poi");
        assert_eq!(cafe.subcategory, "cafe");
        assert_eq!(cafe.name, "Café");
    }

    #[rstest]
    fn skips_untagged_and_unplaced_elements(centre: Coord<f64>) {
        let unplaced = Element {
            lat: None,
            lon: None,
            ..node(2, 0.0, 0.0, &[("shop", "kiosk")])
        };
        let elements = [node(1, 52.23, 21.01, &[]), unplaced];

        let pois = classify_elements(&elements, centre);

        assert!(pois.iter().all(|(_, list)| list.is_empty()));
    }

    #[rstest]
    fn ways_use_centre_and_lists_are_sorted(centre: Coord<f64>) {
        let way = Element {
            kind: "way".to_owned(),
            lat: None,
            lon: None,
            center: Some(Center {
                lat: 52.2307,
                lon: 21.0122,
            }),
            ..node(3, 0.0, 0.0, &[("leisure", "park"), ("name", "Ogród Saski")])
        };
        let far = node(4, 52.2387, 21.0122, &[("leisure", "garden")]);
        let elements = [far, way];

        let pois = classify_elements(&elements, centre);

        let names: Vec<_> = pois.nature.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ogród Saski", "Garden"]);
        let nearest = pois.nature.first().expect("park");
        assert!((nearest.distance_m - 111.0).abs() < 2.0);
    }
}
