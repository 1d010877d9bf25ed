//! Amenity categories and exhaustive per-category tables.
//!
//! [`Category`] is a closed set. Data keyed by category lives in
//! [`PerCategory`], which has one field per variant and is accessed through
//! an exhaustive `match`, so adding a category fails to compile until every
//! table states a value for it.
//!
//! # Examples
//! ```
//! use vicinity_core::Category;
//!
//! assert_eq!(Category::Transport.as_str(), "transport");
//! assert_eq!("FOOD".parse::<Category>(), Ok(Category::Food));
//! ```

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Broad family of nearby features used for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Shops of any kind.
    Shops,
    /// Public transport stops and stations.
    Transport,
    /// Schools, kindergartens and universities.
    Education,
    /// Pharmacies, doctors, clinics and hospitals.
    Health,
    /// Parks, gardens, woodland, grass and open water.
    Nature,
    /// Playgrounds, pitches, gyms and sports venues.
    Leisure,
    /// Restaurants, cafes and fast food.
    Food,
    /// Banks and cash machines.
    Finance,
    /// Major roads and rail lines. Profiles weight this negatively as a
    /// noise proxy.
    Roads,
}

impl Category {
    /// Every category in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Shops,
        Self::Transport,
        Self::Education,
        Self::Health,
        Self::Nature,
        Self::Leisure,
        Self::Food,
        Self::Finance,
        Self::Roads,
    ];

    /// Return the category as a lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shops => "shops",
            Self::Transport => "transport",
            Self::Education => "education",
            Self::Health => "health",
            Self::Nature => "nature",
            Self::Leisure => "leisure",
            Self::Food => "food",
            Self::Finance => "finance",
            Self::Roads => "roads",
        }
    }

    /// Human-readable name used in generated sentences.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shops => "Shops",
            Self::Transport => "Public transport",
            Self::Education => "Education",
            Self::Health => "Health care",
            Self::Nature => "Green space",
            Self::Leisure => "Sport and recreation",
            Self::Food => "Food and drink",
            Self::Finance => "Banks and finance",
            Self::Roads => "Road and rail traffic",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}'")]
pub struct ParseCategoryError(pub String);

impl std::str::FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| ParseCategoryError(s.to_owned()))
    }
}

/// One value per [`Category`].
///
/// # Examples
/// ```
/// use vicinity_core::{Category, PerCategory};
///
/// let mut counts = PerCategory::from_fn(|_| 0_u32);
/// *counts.get_mut(Category::Food) += 2;
/// assert_eq!(*counts.get(Category::Food), 2);
/// assert_eq!(counts.iter().map(|(_, n)| n).sum::<u32>(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerCategory<T> {
    /// Value for [`Category::Shops`].
    pub shops: T,
    /// Value for [`Category::Transport`].
    pub transport: T,
    /// Value for [`Category::Education`].
    pub education: T,
    /// Value for [`Category::Health`].
    pub health: T,
    /// Value for [`Category::Nature`].
    pub nature: T,
    /// Value for [`Category::Leisure`].
    pub leisure: T,
    /// Value for [`Category::Food`].
    pub food: T,
    /// Value for [`Category::Finance`].
    pub finance: T,
    /// Value for [`Category::Roads`].
    pub roads: T,
}

impl<T> PerCategory<T> {
    /// Build a table by evaluating `f` for every category.
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            shops: f(Category::Shops),
            transport: f(Category::Transport),
            education: f(Category::Education),
            health: f(Category::Health),
            nature: f(Category::Nature),
            leisure: f(Category::Leisure),
            food: f(Category::Food),
            finance: f(Category::Finance),
            roads: f(Category::Roads),
        }
    }

    /// Borrow the value for `category`.
    #[must_use]
    pub const fn get(&self, category: Category) -> &T {
        match category {
            Category::Shops => &self.shops,
            Category::Transport => &self.transport,
            Category::Education => &self.education,
            Category::Health => &self.health,
            Category::Nature => &self.nature,
            Category::Leisure => &self.leisure,
            Category::Food => &self.food,
            Category::Finance => &self.finance,
            Category::Roads => &self.roads,
        }
    }

    /// Mutably borrow the value for `category`.
    pub const fn get_mut(&mut self, category: Category) -> &mut T {
        match category {
            Category::Shops => &mut self.shops,
            Category::Transport => &mut self.transport,
            Category::Education => &mut self.education,
            Category::Health => &mut self.health,
            Category::Nature => &mut self.nature,
            Category::Leisure => &mut self.leisure,
            Category::Food => &mut self.food,
            Category::Finance => &mut self.finance,
            Category::Roads => &mut self.roads,
        }
    }

    /// Iterate over `(category, value)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Transform every value, keeping the category association.
    pub fn map<U>(&self, mut f: impl FnMut(Category, &T) -> U) -> PerCategory<U> {
        PerCategory::from_fn(|category| f(category, self.get(category)))
    }
}

impl<T: Serialize> Serialize for PerCategory<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category.as_str(), value)?;
        }
        map.end()
    }
}
