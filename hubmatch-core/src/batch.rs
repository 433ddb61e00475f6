//! Resolve and locate a whole driver roster.
//!
//! [`assign_batch`] produces exactly one [`AssignedDriver`] per input record,
//! in input order. Unresolved addresses are carried through as unassigned
//! rows rather than dropped or treated as a batch failure.

use crate::catalog::WarehouseCatalog;
use crate::coordinate::GeoCoordinate;
use crate::geocode::Geocoder;
use crate::locator::{AssignmentResult, locate};
use crate::resolver::{AddressResolver, Resolution};

/// One driver as read from the roster.
///
/// Name and phone pass through untouched; only the address is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverRecord {
    /// Driver's display name.
    pub name: String,
    /// Driver's phone number, kept verbatim.
    pub phone: String,
    /// Free-text street address.
    pub address: String,
}

impl DriverRecord {
    /// Construct a record from its three fields.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }
}

/// A roster row joined with its resolution and warehouse assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedDriver {
    /// The input record.
    pub record: DriverRecord,
    /// How the address lookup ended.
    pub resolution: Resolution,
    /// The nearest warehouse, when the address resolved.
    pub assignment: AssignmentResult,
}

impl AssignedDriver {
    /// The resolved coordinate of the driver's address, if any.
    #[must_use]
    pub const fn coordinate(&self) -> Option<GeoCoordinate> {
        self.resolution.coordinate()
    }
}

/// Counts describing a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    /// Number of input records.
    pub total: usize,
    /// Records whose address resolved to a coordinate.
    pub resolved: usize,
    /// Records assigned to a warehouse.
    pub assigned: usize,
}

impl BatchSummary {
    /// Tally a batch's results.
    #[must_use]
    pub fn from_drivers(drivers: &[AssignedDriver]) -> Self {
        drivers.iter().fold(Self::default(), |mut summary, driver| {
            summary.total += 1;
            if driver.resolution.is_resolved() {
                summary.resolved += 1;
            }
            if driver.assignment.is_assigned() {
                summary.assigned += 1;
            }
            summary
        })
    }

    /// Records that could not be located at all.
    #[must_use]
    pub const fn unresolved(&self) -> usize {
        self.total.saturating_sub(self.resolved)
    }
}

/// Resolve and locate a single driver.
pub fn assign_driver<G: Geocoder>(
    record: DriverRecord,
    resolver: &AddressResolver<G>,
    catalog: &WarehouseCatalog,
) -> AssignedDriver {
    let resolution = resolver.resolve_detailed(&record.address);
    let assignment = locate(resolution.coordinate(), catalog);
    AssignedDriver {
        record,
        resolution,
        assignment,
    }
}

/// Resolve and locate every driver, preserving input order.
///
/// # Examples
/// ```
/// use hubmatch_core::{AddressResolver, DriverRecord, WarehouseCatalog, assign_batch};
/// use hubmatch_core::test_support::TableGeocoder;
///
/// let resolver = AddressResolver::new(
///     TableGeocoder::new().with_coordinate("Sahakar Nagar", 13.0, 77.6),
/// );
/// let drivers = assign_batch(
///     vec![
///         DriverRecord::new("Asha", "9800000001", "Sahakar Nagar"),
///         DriverRecord::new("Ravi", "9800000002", ""),
///     ],
///     &resolver,
///     &WarehouseCatalog::reference(),
/// );
///
/// assert_eq!(drivers.len(), 2);
/// assert_eq!(drivers[0].assignment.warehouse_id(), Some("Hebbal"));
/// assert_eq!(drivers[1].assignment.warehouse_id(), None);
/// ```
pub fn assign_batch<G: Geocoder>(
    records: Vec<DriverRecord>,
    resolver: &AddressResolver<G>,
    catalog: &WarehouseCatalog,
) -> Vec<AssignedDriver> {
    let addresses: Vec<&str> = records.iter().map(|r| r.address.as_str()).collect();
    let resolutions = resolver.resolve_all(&addresses);
    records
        .into_iter()
        .zip(resolutions)
        .map(|(record, resolution)| {
            let assignment = locate(resolution.coordinate(), catalog);
            AssignedDriver {
                record,
                resolution,
                assignment,
            }
        })
        .collect()
}
