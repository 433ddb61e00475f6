use geo::{Coord, Point};
use thiserror::Error;

/// A WGS84 position in decimal degrees.
///
/// `geo` stores positions with `x = longitude` and `y = latitude`; the
/// conversions below keep that convention so callers never have to swap axes
/// by hand.
///
/// # Examples
/// ```
/// use hubmatch_core::GeoCoordinate;
///
/// # fn main() -> Result<(), hubmatch_core::GeoCoordinateError> {
/// let hebbal = GeoCoordinate::new(13.066819, 77.604538)?;
/// assert_eq!(hebbal.latitude(), 13.066819);
/// assert_eq!(hebbal.to_point().x(), 77.604538);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

/// Errors returned by [`GeoCoordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoCoordinateError {
    /// Latitude or longitude was NaN or infinite.
    #[error("coordinates must be finite numbers")]
    NonFinite,
    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {latitude} is outside [-90, 90]")]
    LatitudeOutOfRange {
        /// The rejected latitude.
        latitude: f64,
    },
    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {longitude} is outside [-180, 180]")]
    LongitudeOutOfRange {
        /// The rejected longitude.
        longitude: f64,
    },
}

impl GeoCoordinate {
    /// Validates and constructs a [`GeoCoordinate`].
    ///
    /// # Errors
    ///
    /// Returns [`GeoCoordinateError`] when either component is not finite or
    /// lies outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoCoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GeoCoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoCoordinateError::LatitudeOutOfRange { latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoCoordinateError::LongitudeOutOfRange { longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate from literals already known to be in range.
    pub(crate) const fn from_trusted(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The position as a `geo` point (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn to_point(self) -> Point<f64> {
        Point(self.to_coord())
    }

    /// The position as a `geo` coordinate (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

impl TryFrom<Coord<f64>> for GeoCoordinate {
    type Error = GeoCoordinateError;

    fn try_from(coord: Coord<f64>) -> Result<Self, Self::Error> {
        Self::new(coord.y, coord.x)
    }
}

impl From<GeoCoordinate> for Coord<f64> {
    fn from(value: GeoCoordinate) -> Self {
        value.to_coord()
    }
}

impl From<GeoCoordinate> for Point<f64> {
    fn from(value: GeoCoordinate) -> Self {
        value.to_point()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(0.0, 0.0)]
    fn accepts_boundary_values(#[case] latitude: f64, #[case] longitude: f64) {
        assert!(GeoCoordinate::new(latitude, longitude).is_ok());
    }

    #[rstest]
    #[case(90.5, 0.0)]
    #[case(-91.0, 0.0)]
    fn rejects_latitude_out_of_range(#[case] latitude: f64, #[case] longitude: f64) {
        let err = GeoCoordinate::new(latitude, longitude).expect_err("latitude should fail");
        assert_eq!(err, GeoCoordinateError::LatitudeOutOfRange { latitude });
    }

    #[rstest]
    #[case(0.0, 180.1)]
    #[case(0.0, -200.0)]
    fn rejects_longitude_out_of_range(#[case] latitude: f64, #[case] longitude: f64) {
        let err = GeoCoordinate::new(latitude, longitude).expect_err("longitude should fail");
        assert_eq!(err, GeoCoordinateError::LongitudeOutOfRange { longitude });
    }

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    fn rejects_non_finite_values(#[case] latitude: f64, #[case] longitude: f64) {
        let err = GeoCoordinate::new(latitude, longitude).expect_err("non-finite should fail");
        assert_eq!(err, GeoCoordinateError::NonFinite);
    }

    #[rstest]
    fn geo_conversions_put_longitude_on_x() {
        let coordinate = GeoCoordinate::new(12.9, 77.6).expect("valid coordinate");
        let coord: Coord<f64> = coordinate.into();
        assert_eq!(coord, Coord { x: 77.6, y: 12.9 });
        let back = GeoCoordinate::try_from(coord).expect("round trip");
        assert_eq!(back, coordinate);
    }
}
