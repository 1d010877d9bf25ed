//! Acquire points of interest around a coordinate.
//!
//! The `PoiSource` trait abstracts the geodata service behind the analysis.
//! Sources never fail: transient or permanent upstream problems degrade to
//! an empty list per category, so scoring always has input to work with.

use crate::poi::PoisByCategory;

/// Fetch classified POIs near a reference point.
///
/// Implementations must return every category (empty when nothing was
/// found) with each list sorted by ascending distance. They must be
/// thread-safe so one source can serve concurrent requests.
///
/// # Examples
///
/// ```
/// use vicinity_core::{PoiSource, PoisByCategory};
///
/// struct Desert;
///
/// impl PoiSource for Desert {
///     fn get_pois_around(&self, _lat: f64, _lon: f64, _radius_m: u32) -> PoisByCategory {
///         PoisByCategory::default()
///     }
/// }
///
/// let pois = Desert.get_pois_around(52.23, 21.01, 1000);
/// assert!(pois.shops.is_empty());
/// ```
pub trait PoiSource: Send + Sync {
    /// Return POIs within `radius_m` meters of (`lat`, `lon`).
    fn get_pois_around(&self, lat: f64, lon: f64, radius_m: u32) -> PoisByCategory;
}

impl<T: PoiSource + ?Sized> PoiSource for &T {
    fn get_pois_around(&self, lat: f64, lon: f64, radius_m: u32) -> PoisByCategory {
        (**self).get_pois_around(lat, lon, radius_m)
    }
}
