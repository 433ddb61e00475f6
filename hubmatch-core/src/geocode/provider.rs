//! Geocoder trait and the per-address outcome alias.

use crate::GeoCoordinate;

use super::error::GeocodeError;

/// Result of geocoding a single address.
///
/// `Ok(None)` means the service answered but had no candidate.
pub type GeocodeOutcome = Result<Option<GeoCoordinate>, GeocodeError>;

/// Resolve free-text addresses to coordinates.
///
/// Implementers return the first, best-ranked candidate. Each call may block
/// on the network for an unbounded time unless the implementation enforces a
/// timeout.
///
/// # Examples
///
/// ```rust
/// use hubmatch_core::{GeoCoordinate, GeocodeOutcome, Geocoder};
///
/// struct Everywhere;
///
/// impl Geocoder for Everywhere {
///     fn geocode(&self, address: &str) -> GeocodeOutcome {
///         if address.is_empty() {
///             return Ok(None);
///         }
///         Ok(Some(GeoCoordinate::new(12.97, 77.59).expect("valid coordinate")))
///     }
/// }
///
/// let outcomes = Everywhere.geocode_all(&["MG Road", ""]);
/// assert!(matches!(outcomes.as_slice(), [Ok(Some(_)), Ok(None)]));
/// ```
pub trait Geocoder {
    /// Return the best candidate for `address`, if the service has one.
    fn geocode(&self, address: &str) -> GeocodeOutcome;

    /// Geocode several addresses.
    ///
    /// The returned vector is index-aligned with `addresses`, whatever order
    /// the lookups complete in. The default implementation issues one lookup
    /// at a time.
    fn geocode_all(&self, addresses: &[&str]) -> Vec<GeocodeOutcome> {
        addresses
            .iter()
            .map(|address| self.geocode(address))
            .collect()
    }
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn geocode(&self, address: &str) -> GeocodeOutcome {
        (**self).geocode(address)
    }

    fn geocode_all(&self, addresses: &[&str]) -> Vec<GeocodeOutcome> {
        (**self).geocode_all(addresses)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn geocode(&self, address: &str) -> GeocodeOutcome {
        (**self).geocode(address)
    }

    fn geocode_all(&self, addresses: &[&str]) -> Vec<GeocodeOutcome> {
        (**self).geocode_all(addresses)
    }
}
