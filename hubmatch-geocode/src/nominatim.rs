//! Nominatim search response types.
//!
//! The search endpoint answers with a JSON array of ranked places. Only the
//! coordinate fields are read; Nominatim serialises them as decimal strings.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use hubmatch_core::{GeoCoordinate, GeocodeError};
use serde::Deserialize;

/// One ranked place from a search response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchCandidate {
    /// Latitude as a decimal string.
    pub lat: String,
    /// Longitude as a decimal string.
    pub lon: String,
    /// Human-readable place name, used only for logging.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl SearchCandidate {
    /// Parse the candidate's coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::ParseError`] when either field is not a number
    /// or the pair lies outside the valid latitude/longitude ranges.
    pub fn coordinate(&self) -> Result<GeoCoordinate, GeocodeError> {
        let latitude = parse_degrees("lat", &self.lat)?;
        let longitude = parse_degrees("lon", &self.lon)?;
        GeoCoordinate::new(latitude, longitude).map_err(|err| GeocodeError::ParseError {
            message: err.to_string(),
        })
    }
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|err| GeocodeError::ParseError {
            message: format!("invalid {field} {raw:?}: {err}"),
        })
}

/// Pick the best-ranked candidate's coordinate.
///
/// An empty list means the service knows no matching place.
pub fn first_coordinate(
    candidates: &[SearchCandidate],
) -> Result<Option<GeoCoordinate>, GeocodeError> {
    candidates
        .first()
        .map(SearchCandidate::coordinate)
        .transpose()
}
