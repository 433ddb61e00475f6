//! Turn free-text addresses into coordinates.
//!
//! The [`Geocoder`] trait abstracts the external geocoding service. Callers
//! pass an address and receive the best-ranked candidate, `Ok(None)` when the
//! service knows no match, or a [`GeocodeError`] describing why the lookup
//! failed.

mod error;
mod provider;

pub use error::GeocodeError;
pub use provider::{GeocodeOutcome, Geocoder};
