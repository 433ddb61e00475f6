//! Group assigned drivers by warehouse for presentation.
//!
//! Every catalog warehouse gets a group, even an empty one, so "no drivers
//! near this warehouse" stays distinguishable from "driver could not be
//! located", which is reported separately through
//! [`AssignmentReport::unlocated`]. Drivers that were located but had no
//! warehouse to go to (an empty catalog) land in
//! [`AssignmentReport::unassigned`] instead.

use crate::batch::AssignedDriver;
use crate::catalog::WarehouseCatalog;

/// Drivers assigned to one warehouse, nearest first.
#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseGroup<'a> {
    /// Warehouse identifier.
    pub warehouse_id: &'a str,
    /// Assigned drivers in ascending distance order.
    pub drivers: Vec<&'a AssignedDriver>,
}

impl WarehouseGroup<'_> {
    /// Whether no driver was assigned to this warehouse.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

/// Per-warehouse view over a finished batch.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentReport<'a> {
    /// One group per catalog warehouse, ordered alphabetically by identifier.
    pub groups: Vec<WarehouseGroup<'a>>,
    /// Drivers whose address could not be resolved, in input order.
    pub unlocated: Vec<&'a AssignedDriver>,
    /// Drivers with a coordinate but no warehouse, in input order.
    pub unassigned: Vec<&'a AssignedDriver>,
}

impl<'a> AssignmentReport<'a> {
    /// The group for `warehouse_id`, if the catalog has that warehouse.
    #[must_use]
    pub fn group(&self, warehouse_id: &str) -> Option<&WarehouseGroup<'a>> {
        self.groups
            .iter()
            .find(|group| group.warehouse_id == warehouse_id)
    }
}

/// Build the per-warehouse report for `drivers`.
///
/// Within a group, drivers are sorted by ascending distance; equal distances
/// keep their input order.
#[must_use]
pub fn group_by_warehouse<'a>(
    catalog: &'a WarehouseCatalog,
    drivers: &'a [AssignedDriver],
) -> AssignmentReport<'a> {
    let mut ids: Vec<&str> = catalog.iter().map(|w| w.id.as_str()).collect();
    ids.sort_unstable();

    let groups = ids
        .into_iter()
        .map(|warehouse_id| {
            let mut members: Vec<&AssignedDriver> = drivers
                .iter()
                .filter(|driver| driver.assignment.warehouse_id() == Some(warehouse_id))
                .collect();
            members.sort_by(|left, right| {
                let left_km = left.assignment.distance_km().unwrap_or(f64::INFINITY);
                let right_km = right.assignment.distance_km().unwrap_or(f64::INFINITY);
                left_km.total_cmp(&right_km)
            });
            WarehouseGroup {
                warehouse_id,
                drivers: members,
            }
        })
        .collect();

    let (unlocated, unassigned) = drivers
        .iter()
        .filter(|driver| !driver.assignment.is_assigned())
        .partition(|driver| !driver.resolution.is_resolved());

    AssignmentReport {
        groups,
        unlocated,
        unassigned,
    }
}
