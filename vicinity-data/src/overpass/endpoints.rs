//! Endpoint pool and request-scoped rotation.

use url::Url;

/// Public Overpass instances tried in order.
pub const DEFAULT_ENDPOINTS: [&str; 4] = [
    "https://overpass-api.de/api/interpreter",
    "https://lz4.overpass-api.de/api/interpreter",
    "https://z.overpass-api.de/api/interpreter",
    "https://maps.mail.ru/osm/tools/overpass/api/interpreter",
];

/// Position in an endpoint pool for one request.
///
/// Every request starts at the first endpoint; concurrent requests never
/// observe each other's rotation.
///
/// # Examples
/// ```
/// use url::Url;
/// use vicinity_data::EndpointCursor;
///
/// let pool = [
///     Url::parse("http://a.example/api")?,
///     Url::parse("http://b.example/api")?,
/// ];
/// let mut cursor = EndpointCursor::new(&pool);
/// cursor.rotate();
/// cursor.rotate();
/// assert_eq!(cursor.current().map(Url::as_str), Some("http://a.example/api"));
/// # Ok::<(), url::ParseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EndpointCursor<'a> {
    endpoints: &'a [Url],
    position: usize,
}

impl<'a> EndpointCursor<'a> {
    /// Start at the first endpoint of `endpoints`.
    #[must_use]
    pub const fn new(endpoints: &'a [Url]) -> Self {
        Self {
            endpoints,
            position: 0,
        }
    }

    /// Endpoint to use for the next attempt, `None` for an empty pool.
    #[must_use]
    pub fn current(&self) -> Option<&'a Url> {
        self.position
            .checked_rem(self.endpoints.len())
            .and_then(|index| self.endpoints.get(index))
    }

    /// Move to the next endpoint, wrapping around.
    pub const fn rotate(&mut self) {
        self.position = self.position.wrapping_add(1);
    }
}
