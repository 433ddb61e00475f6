//! HTTP geocoding for hubmatch.
//!
//! [`HttpGeocoder`] implements [`hubmatch_core::Geocoder`] against a
//! Nominatim-compatible `/search` endpoint. Each lookup asks for a single,
//! best-ranked candidate and parses its string `lat`/`lon` fields into a
//! [`hubmatch_core::GeoCoordinate`].
//!
//! The core trait is synchronous, so the geocoder blocks on its HTTP calls
//! internally. Batches can overlap up to `max_concurrency` requests while still
//! returning outcomes in input order.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use hubmatch_core::Geocoder;
//! use hubmatch_geocode::{HttpGeocoder, HttpGeocoderConfig};
//!
//! let config = HttpGeocoderConfig::new("https://nominatim.openstreetmap.org")
//!     .with_timeout(Duration::from_secs(5))
//!     .with_user_agent("dispatch-desk/1.0");
//! let geocoder = HttpGeocoder::with_config(config)?;
//!
//! if let Some(coordinate) = geocoder.geocode("Hebbal, Bengaluru")? {
//!     println!("{}, {}", coordinate.latitude(), coordinate.longitude());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod nominatim;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, GeocoderBuildError, HttpGeocoder, HttpGeocoderConfig,
};
