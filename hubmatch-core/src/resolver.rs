//! Address resolution with failure collapsing.
//!
//! [`AddressResolver`] wraps a [`Geocoder`] and never returns an error: every
//! failure mode ends up as a [`Resolution`] variant, and
//! [`AddressResolver::resolve`] flattens that further to an optional
//! coordinate. One bad address therefore never aborts a batch.
//!
//! Transient failures can be retried a bounded number of times. Nothing is
//! cached; the same address looked up twice reaches the geocoder twice.

use log::{debug, warn};

use crate::coordinate::GeoCoordinate;
use crate::geocode::{GeocodeError, GeocodeOutcome, Geocoder};

/// How an address lookup ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The geocoder returned a best candidate.
    Resolved(GeoCoordinate),
    /// The geocoder answered but knew no matching place.
    NotFound,
    /// The lookup failed in a way a later retry might fix.
    TransientError(GeocodeError),
    /// The lookup failed in a way retrying will not fix.
    PermanentError(GeocodeError),
    /// The address was blank, so no lookup was attempted.
    InvalidInput,
}

impl Resolution {
    /// The resolved coordinate, if any.
    #[must_use]
    pub const fn coordinate(&self) -> Option<GeoCoordinate> {
        match self {
            Self::Resolved(coordinate) => Some(*coordinate),
            _ => None,
        }
    }

    /// Whether a coordinate was found.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Short machine-readable label for reports and exports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Resolved(_) => "resolved",
            Self::NotFound => "not_found",
            Self::TransientError(_) => "transient_error",
            Self::PermanentError(_) => "permanent_error",
            Self::InvalidInput => "invalid_input",
        }
    }
}

/// Resolves addresses through a [`Geocoder`], absorbing every failure.
///
/// # Examples
/// ```
/// use hubmatch_core::{AddressResolver, Resolution};
/// use hubmatch_core::test_support::TableGeocoder;
///
/// let resolver = AddressResolver::new(
///     TableGeocoder::new().with_coordinate("Hebbal, Bengaluru", 13.04, 77.59),
/// );
///
/// assert!(resolver.resolve("Hebbal, Bengaluru").is_some());
/// assert_eq!(resolver.resolve_detailed("Atlantis"), Resolution::NotFound);
/// assert_eq!(resolver.resolve_detailed("   "), Resolution::InvalidInput);
/// ```
#[derive(Debug, Clone)]
pub struct AddressResolver<G> {
    geocoder: G,
    max_retries: u32,
}

impl<G: Geocoder> AddressResolver<G> {
    /// Wrap `geocoder` without retries.
    pub const fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            max_retries: 0,
        }
    }

    /// Retry transient failures up to `max_retries` extra times per address.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// The wrapped geocoder.
    pub const fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Resolve `address` to a coordinate, or `None` for any failure.
    pub fn resolve(&self, address: &str) -> Option<GeoCoordinate> {
        self.resolve_detailed(address).coordinate()
    }

    /// Resolve `address`, reporting how the lookup ended.
    pub fn resolve_detailed(&self, address: &str) -> Resolution {
        let query = address.trim();
        if query.is_empty() {
            debug!("skipping geocoding for blank address");
            return Resolution::InvalidInput;
        }
        self.settle(query, self.geocoder.geocode(query))
    }

    /// Resolve many addresses, returning one [`Resolution`] per input in
    /// input order.
    ///
    /// Non-blank addresses go to [`Geocoder::geocode_all`] in one call so the
    /// geocoder may overlap the requests; retries then run one at a time.
    pub fn resolve_all(&self, addresses: &[&str]) -> Vec<Resolution> {
        let queries: Vec<(usize, &str)> = addresses
            .iter()
            .map(|address| address.trim())
            .enumerate()
            .filter(|(_, query)| !query.is_empty())
            .collect();
        let lookups: Vec<&str> = queries.iter().map(|&(_, query)| query).collect();
        let mut outcomes = self.geocoder.geocode_all(&lookups).into_iter();

        let mut resolutions = vec![Resolution::InvalidInput; addresses.len()];
        for (index, query) in queries {
            let outcome = outcomes.next().unwrap_or_else(|| {
                Err(GeocodeError::ParseError {
                    message: "geocoder returned fewer results than requested".to_owned(),
                })
            });
            if let Some(slot) = resolutions.get_mut(index) {
                *slot = self.settle(query, outcome);
            }
        }
        resolutions
    }

    fn settle(&self, query: &str, first: GeocodeOutcome) -> Resolution {
        let mut outcome = first;
        let mut retries = 0;
        loop {
            match outcome {
                Ok(Some(coordinate)) => return Resolution::Resolved(coordinate),
                Ok(None) => {
                    debug!("no geocoding candidates for {query:?}");
                    return Resolution::NotFound;
                }
                Err(err) if err.is_transient() && retries < self.max_retries => {
                    retries += 1;
                    warn!(
                        "geocoding {query:?} failed ({err}); retry {retries} of {}",
                        self.max_retries
                    );
                    outcome = self.geocoder.geocode(query);
                }
                Err(err) if err.is_transient() => {
                    warn!("giving up on geocoding {query:?}: {err}");
                    return Resolution::TransientError(err);
                }
                Err(err) => {
                    warn!("geocoding {query:?} failed: {err}");
                    return Resolution::PermanentError(err);
                }
            }
        }
    }
}
