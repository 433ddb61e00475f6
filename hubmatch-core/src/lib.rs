//! Core domain types for the hubmatch assignment engine.
//!
//! A batch run turns each [`DriverRecord`] into an [`AssignedDriver`] in two
//! steps. The [`AddressResolver`] asks a [`Geocoder`] for the coordinate of
//! the driver's free-text address, collapsing every failure into an absent
//! coordinate. [`locate`] then picks the geodesically nearest entry of a
//! [`WarehouseCatalog`].
//!
//! Constructors for geographic values return `Result` so invalid input is
//! surfaced before it reaches the distance maths.

#![forbid(unsafe_code)]

pub mod batch;
pub mod catalog;
mod coordinate;
pub mod geocode;
mod locator;
pub mod report;
pub mod resolver;

#[doc(hidden)]
pub mod test_support;

pub use batch::{AssignedDriver, BatchSummary, DriverRecord, assign_batch, assign_driver};
pub use catalog::{CatalogError, Warehouse, WarehouseCatalog};
pub use coordinate::{GeoCoordinate, GeoCoordinateError};
pub use geocode::{GeocodeError, GeocodeOutcome, Geocoder};
pub use locator::{Assignment, AssignmentResult, distance_km, locate, round_km};
pub use report::{AssignmentReport, WarehouseGroup, group_by_warehouse};
pub use resolver::{AddressResolver, Resolution};
