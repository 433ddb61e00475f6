//! Property-based tests for nearest-warehouse selection.
//!
//! # Invariants tested
//!
//! - **Membership:** an assigned warehouse always comes from the catalog.
//! - **Minimality:** the reported distance is the smallest over the catalog.
//! - **Completeness:** a coordinate plus a non-empty catalog always assigns.
//! - **Tie-breaking:** of several equidistant warehouses the first wins.

use hubmatch_core::{GeoCoordinate, Warehouse, WarehouseCatalog, distance_km, locate};
use proptest::prelude::*;

fn coordinate_strategy() -> impl Strategy<Value = GeoCoordinate> {
    (-90.0_f64..=90.0, -180.0_f64..=180.0).prop_map(|(latitude, longitude)| {
        GeoCoordinate::new(latitude, longitude).expect("generated coordinate is in range")
    })
}

fn catalog_strategy() -> impl Strategy<Value = WarehouseCatalog> {
    prop::collection::vec(coordinate_strategy(), 1..12).prop_map(|locations| {
        let warehouses = locations
            .into_iter()
            .enumerate()
            .map(|(index, location)| Warehouse::new(format!("W{index}"), location));
        WarehouseCatalog::new(warehouses).expect("generated identifiers are unique")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: every resolved driver gets a catalog warehouse at a finite,
    /// non-negative distance.
    #[test]
    fn assigned_warehouse_is_in_catalog(
        driver in coordinate_strategy(),
        catalog in catalog_strategy(),
    ) {
        let result = locate(Some(driver), &catalog);
        let id = result.warehouse_id().expect("non-empty catalog always assigns");
        prop_assert!(catalog.get(id).is_some(), "{id} is not in the catalog");
        let distance = result.distance_km().expect("distance accompanies the id");
        prop_assert!(distance.is_finite() && distance >= 0.0);
    }

    /// Property: no catalog warehouse is closer than the assigned one.
    #[test]
    fn assigned_distance_is_minimal(
        driver in coordinate_strategy(),
        catalog in catalog_strategy(),
    ) {
        let result = locate(Some(driver), &catalog);
        let distance = result.distance_km().expect("non-empty catalog always assigns");
        let minimum = catalog
            .iter()
            .map(|warehouse| distance_km(driver, warehouse.location))
            .fold(f64::INFINITY, f64::min);
        prop_assert!((distance - minimum).abs() < 1e-6, "{distance} vs {minimum}");
    }

    /// Property: a missing coordinate is never assigned.
    #[test]
    fn missing_coordinate_is_never_assigned(catalog in catalog_strategy()) {
        prop_assert!(!locate(None, &catalog).is_assigned());
    }

    /// Property: duplicated locations resolve to the earliest entry.
    #[test]
    fn ties_prefer_earliest_entry(
        driver in coordinate_strategy(),
        location in coordinate_strategy(),
        copies in 2_usize..5,
    ) {
        let warehouses = (0..copies).map(|index| Warehouse::new(format!("Twin{index}"), location));
        let catalog = WarehouseCatalog::new(warehouses).expect("identifiers are unique");
        let located = locate(Some(driver), &catalog);
        prop_assert_eq!(located.warehouse_id(), Some("Twin0"));
    }
}
