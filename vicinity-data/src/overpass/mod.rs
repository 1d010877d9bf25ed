//! Overpass API client for nearby points of interest.
//!
//! This module provides [`OverpassClient`], an implementation of
//! [`vicinity_core::PoiSource`] that sends a single composite Overpass QL
//! query covering every category and classifies the returned elements
//! locally.
//!
//! # Architecture
//!
//! Public Overpass instances are interchangeable but individually flaky, so
//! the client walks a fixed pool of endpoints with a request-scoped
//! [`EndpointCursor`]. Each failed attempt rotates to the next endpoint and
//! gets a longer timeout. When every attempt fails the caller receives an
//! empty [`vicinity_core::PoisByCategory`] rather than an error.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use vicinity_core::PoiSource;
//! use vicinity_data::overpass::{OverpassClient, OverpassConfig};
//!
//! let config = OverpassConfig::default().with_timeout(Duration::from_secs(30));
//! let client = OverpassClient::with_config(config)?;
//!
//! let pois = client.get_pois_around(52.2297, 21.0122, 1000);
//! println!("{} shops nearby", pois.shops.len());
//! # Ok::<(), vicinity_data::ClientBuildError>(())
//! ```

mod classify;
mod client;
mod endpoints;
mod error;
mod query;
mod response;

#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_support;

pub use classify::{classify_elements, display_name, matching_categories, subcategory};
pub use client::{DEFAULT_USER_AGENT, MAX_ATTEMPTS, OverpassClient, OverpassConfig, attempt_timeout};
pub use endpoints::{DEFAULT_ENDPOINTS, EndpointCursor};
pub use error::{ClientBuildError, OverpassError};
pub use query::{TagSelector, build_query, selectors};
pub use response::{Center, Element, OverpassResponse};
