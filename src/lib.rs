//! Facade crate for the hubmatch driver-to-warehouse assignment engine.
//!
//! This crate re-exports the core domain types and exposes the HTTP geocoder
//! behind a feature flag.

#![forbid(unsafe_code)]

pub use hubmatch_core::{
    AddressResolver, AssignedDriver, Assignment, AssignmentReport, AssignmentResult,
    BatchSummary, CatalogError, DriverRecord, GeoCoordinate, GeoCoordinateError, GeocodeError,
    GeocodeOutcome, Geocoder, Resolution, Warehouse, WarehouseCatalog, WarehouseGroup,
    assign_batch, distance_km, group_by_warehouse, locate,
};

#[cfg(feature = "geocode-http")]
pub use hubmatch_geocode::{GeocoderBuildError, HttpGeocoder, HttpGeocoderConfig};
