//! Nearest-warehouse lookup on the WGS84 ellipsoid.
//!
//! Distances use `geo`'s geodesic measure (Karney's algorithm), so results
//! stay accurate at any latitude rather than drifting like planar maths on raw
//! degrees would.

use geo::{Distance, Geodesic};

use crate::catalog::{Warehouse, WarehouseCatalog};
use crate::coordinate::GeoCoordinate;

const METRES_PER_KILOMETRE: f64 = 1_000.0;

/// Geodesic distance between two coordinates in kilometres.
///
/// # Examples
/// ```
/// use hubmatch_core::{GeoCoordinate, distance_km};
///
/// # fn main() -> Result<(), hubmatch_core::GeoCoordinateError> {
/// let equator = GeoCoordinate::new(0.0, 0.0)?;
/// let one_degree_east = GeoCoordinate::new(0.0, 1.0)?;
/// let km = distance_km(equator, one_degree_east);
/// assert!((km - 111.319).abs() < 0.01);
/// # Ok(())
/// # }
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "metre to kilometre conversion requires float maths"
)]
pub fn distance_km(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
    Geodesic.distance(from.to_point(), to.to_point()) / METRES_PER_KILOMETRE
}

/// Round a kilometre distance to two decimal places for display.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "rounding to centimetre-scale precision requires float maths"
)]
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

/// A driver's chosen warehouse and the distance to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Identifier of the nearest warehouse.
    pub warehouse_id: String,
    /// Geodesic distance to that warehouse in kilometres.
    pub distance_km: f64,
}

/// Outcome of [`locate`] for a single driver.
///
/// The warehouse identifier and distance are present together or not at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AssignmentResult {
    /// A nearest warehouse was found.
    Assigned(Assignment),
    /// No coordinate was available, or the catalog was empty.
    #[default]
    Unassigned,
}

impl AssignmentResult {
    /// Identifier of the assigned warehouse, if any.
    #[must_use]
    pub fn warehouse_id(&self) -> Option<&str> {
        match self {
            Self::Assigned(assignment) => Some(assignment.warehouse_id.as_str()),
            Self::Unassigned => None,
        }
    }

    /// Unrounded distance to the assigned warehouse in kilometres, if any.
    #[must_use]
    pub const fn distance_km(&self) -> Option<f64> {
        match self {
            Self::Assigned(assignment) => Some(assignment.distance_km),
            Self::Unassigned => None,
        }
    }

    /// Distance rounded to two decimal places, as shown in reports.
    #[must_use]
    pub fn rounded_distance_km(&self) -> Option<f64> {
        self.distance_km().map(round_km)
    }

    /// Whether a warehouse was assigned.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

impl WarehouseCatalog {
    /// Find the warehouse closest to `coordinate` with its distance in km.
    ///
    /// Warehouses are scanned in catalog order and only a strictly smaller
    /// distance replaces the current best, so the earliest of several
    /// equidistant entries wins. Returns `None` for an empty catalog.
    #[must_use]
    pub fn nearest(&self, coordinate: GeoCoordinate) -> Option<(&Warehouse, f64)> {
        let mut nearest: Option<(&Warehouse, f64)> = None;
        for warehouse in self {
            let distance = distance_km(coordinate, warehouse.location);
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((warehouse, distance));
            }
        }
        nearest
    }
}

/// Assign a (possibly unresolved) coordinate to its nearest warehouse.
///
/// A missing coordinate is never assigned, whatever the catalog holds, and an
/// empty catalog assigns nothing.
///
/// # Examples
/// ```
/// use hubmatch_core::{GeoCoordinate, WarehouseCatalog, locate};
///
/// # fn main() -> Result<(), hubmatch_core::GeoCoordinateError> {
/// let catalog = WarehouseCatalog::reference();
/// let driver = GeoCoordinate::new(13.0, 77.6)?;
/// assert_eq!(locate(Some(driver), &catalog).warehouse_id(), Some("Hebbal"));
/// assert!(!locate(None, &catalog).is_assigned());
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn locate(coordinate: Option<GeoCoordinate>, catalog: &WarehouseCatalog) -> AssignmentResult {
    let Some(coordinate) = coordinate else {
        return AssignmentResult::Unassigned;
    };
    catalog
        .nearest(coordinate)
        .map_or(AssignmentResult::Unassigned, |(warehouse, distance)| {
            AssignmentResult::Assigned(Assignment {
                warehouse_id: warehouse.id.clone(),
                distance_km: distance,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn coordinate(latitude: f64, longitude: f64) -> GeoCoordinate {
        GeoCoordinate::new(latitude, longitude).expect("valid coordinate")
    }

    #[fixture]
    fn catalog() -> WarehouseCatalog {
        WarehouseCatalog::reference()
    }

    #[rstest]
    fn distance_to_self_is_zero() {
        let point = coordinate(12.9, 77.6);
        assert_eq!(distance_km(point, point), 0.0);
    }

    #[rstest]
    fn distance_is_symmetric() {
        let a = coordinate(13.066_819, 77.604_538);
        let b = coordinate(12.891_62, 77.556_44);
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
    }

    #[rstest]
    fn distance_uses_ellipsoidal_meridian_length() {
        // One degree of latitude near the equator is ~110.57 km on WGS84,
        // not the 111.19 km a spherical model gives.
        let km = distance_km(coordinate(0.0, 10.0), coordinate(1.0, 10.0));
        assert!((km - 110.574).abs() < 0.01, "got {km}");
    }

    #[rstest]
    #[case(1.234, 1.23)]
    #[case(1.235_1, 1.24)]
    #[case(0.004, 0.0)]
    fn round_km_keeps_two_decimals(#[case] raw: f64, #[case] expected: f64) {
        assert!((round_km(raw) - expected).abs() < 1e-12);
    }

    #[rstest]
    fn driver_near_hebbal_is_assigned_to_hebbal(catalog: WarehouseCatalog) {
        let driver = coordinate(13.0, 77.6);
        let result = locate(Some(driver), &catalog);

        assert_eq!(result.warehouse_id(), Some("Hebbal"));
        let distance = result.distance_km().expect("distance should be set");
        for warehouse in catalog.iter().filter(|w| w.id != "Hebbal") {
            assert!(
                distance < distance_km(driver, warehouse.location),
                "Hebbal should be strictly closer than {}",
                warehouse.id
            );
        }
    }

    #[rstest]
    fn missing_coordinate_is_unassigned(catalog: WarehouseCatalog) {
        let result = locate(None, &catalog);
        assert_eq!(result, AssignmentResult::Unassigned);
        assert_eq!(result.warehouse_id(), None);
        assert_eq!(result.distance_km(), None);
    }

    #[rstest]
    fn empty_catalog_is_unassigned() {
        let result = locate(Some(coordinate(12.9, 77.6)), &WarehouseCatalog::default());
        assert_eq!(result, AssignmentResult::Unassigned);
    }

    #[rstest]
    fn ties_go_to_first_catalog_entry() {
        let origin = coordinate(0.0, 0.0);
        let catalog = WarehouseCatalog::new([
            Warehouse::new("East", coordinate(0.0, 0.5)),
            Warehouse::new("East annex", coordinate(0.0, 0.5)),
        ])
        .expect("catalog builds");

        for _ in 0..3 {
            assert_eq!(locate(Some(origin), &catalog).warehouse_id(), Some("East"));
        }

        let reversed = WarehouseCatalog::new(catalog.iter().rev().cloned()).expect("catalog builds");
        assert_eq!(locate(Some(origin), &reversed).warehouse_id(), Some("East annex"));
    }

    #[rstest]
    fn single_entry_catalog_takes_every_driver() {
        let catalog = WarehouseCatalog::new([Warehouse::new("Solo", coordinate(-33.86, 151.21))])
            .expect("catalog builds");
        for driver in [coordinate(13.0, 77.6), coordinate(51.5, -0.1)] {
            assert_eq!(locate(Some(driver), &catalog).warehouse_id(), Some("Solo"));
        }
    }

    #[rstest]
    fn rounded_distance_is_exposed(catalog: WarehouseCatalog) {
        let kudlu = catalog.get("Kudlu").expect("Kudlu exists").location;
        let result = locate(Some(kudlu), &catalog);
        assert_eq!(result.warehouse_id(), Some("Kudlu"));
        assert_eq!(result.rounded_distance_km(), Some(0.0));
    }
}
