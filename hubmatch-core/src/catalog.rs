//! The fixed set of warehouses drivers are assigned to.
//!
//! A [`WarehouseCatalog`] is an ordered, immutable list of uniquely named
//! warehouses. Iteration order is the order entries were supplied in, and the
//! locator relies on it to break distance ties.
//!
//! The catalog is an explicit value rather than process-wide state so that
//! several catalogs (one per city, say) can coexist and tests can build their
//! own.

use std::collections::HashSet;
#[cfg(feature = "serde")]
use std::io::Read;

use thiserror::Error;

use crate::coordinate::{GeoCoordinate, GeoCoordinateError};

/// Reference micro-warehouse locations (WGS84 latitude, longitude).
const REFERENCE_WAREHOUSES: [(&str, f64, f64); 6] = [
    ("Hebbal", 13.066_819, 77.604_538),
    ("Banashankari", 12.891_62, 77.556_44),
    ("Mahadevapura", 12.990_833_3, 77.704_277_8),
    ("Chandra Layout", 12.997_615, 77.513_831_2),
    ("Kudlu", 12.879_878_6, 77.652_910_1),
    ("Koramangala NGV", 12.880_212_01, 77.655_052_49),
];

/// A named warehouse location.
#[derive(Debug, Clone, PartialEq)]
pub struct Warehouse {
    /// Unique, human-readable identifier.
    pub id: String,
    /// Fixed position of the warehouse.
    pub location: GeoCoordinate,
}

impl Warehouse {
    /// Construct a warehouse at an already validated location.
    pub fn new(id: impl Into<String>, location: GeoCoordinate) -> Self {
        Self {
            id: id.into(),
            location,
        }
    }
}

/// Errors raised while building a [`WarehouseCatalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An identifier was blank.
    #[error("warehouse identifiers must not be blank")]
    BlankId,
    /// The same identifier appeared more than once.
    #[error("warehouse {id:?} is listed more than once")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },
    /// An entry carried an invalid coordinate.
    #[error("warehouse {id:?} has an invalid location: {source}")]
    InvalidLocation {
        /// Identifier of the offending entry.
        id: String,
        /// Why the coordinate was rejected.
        #[source]
        source: GeoCoordinateError,
    },
    /// A catalog document could not be decoded.
    #[cfg(feature = "serde")]
    #[error("failed to parse warehouse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One `(id, latitude, longitude)` triple as stored in a catalog file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CatalogEntry {
    /// Warehouse identifier.
    pub id: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Ordered, immutable collection of warehouses.
///
/// # Examples
/// ```
/// use hubmatch_core::WarehouseCatalog;
///
/// let catalog = WarehouseCatalog::reference();
/// assert_eq!(catalog.len(), 6);
/// assert_eq!(catalog.iter().next().map(|w| w.id.as_str()), Some("Hebbal"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WarehouseCatalog {
    warehouses: Vec<Warehouse>,
}

impl WarehouseCatalog {
    /// Validates and constructs a catalog, preserving the supplied order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BlankId`] or [`CatalogError::DuplicateId`] when
    /// identifiers are not unique, non-blank strings.
    pub fn new<I>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Warehouse>,
    {
        let warehouses: Vec<Warehouse> = entries.into_iter().collect();
        let mut seen = HashSet::with_capacity(warehouses.len());
        for warehouse in &warehouses {
            if warehouse.id.trim().is_empty() {
                return Err(CatalogError::BlankId);
            }
            if !seen.insert(warehouse.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: warehouse.id.clone(),
                });
            }
        }
        Ok(Self { warehouses })
    }

    /// The six Bengaluru micro-warehouses of the reference deployment.
    #[must_use]
    pub fn reference() -> Self {
        let warehouses = REFERENCE_WAREHOUSES
            .iter()
            .map(|&(id, latitude, longitude)| {
                Warehouse::new(id, GeoCoordinate::from_trusted(latitude, longitude))
            })
            .collect();
        Self { warehouses }
    }

    /// Build a catalog from raw `(id, latitude, longitude)` entries.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidLocation`] for out-of-range coordinates
    /// and the errors of [`WarehouseCatalog::new`] for bad identifiers.
    pub fn from_entries<I>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let warehouses = entries
            .into_iter()
            .map(
                |entry| match GeoCoordinate::new(entry.latitude, entry.longitude) {
                    Ok(location) => Ok(Warehouse::new(entry.id, location)),
                    Err(source) => Err(CatalogError::InvalidLocation {
                        id: entry.id,
                        source,
                    }),
                },
            )
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(warehouses)
    }

    /// Decode a JSON array of [`CatalogEntry`] objects.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] when the document is not a valid entry
    /// array, plus the validation errors of [`WarehouseCatalog::from_entries`].
    #[cfg(feature = "serde")]
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_reader(reader)?;
        Self::from_entries(entries)
    }

    /// Iterate warehouses in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Warehouse> {
        self.warehouses.iter()
    }

    /// Number of warehouses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.warehouses.len()
    }

    /// Whether the catalog has no warehouses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warehouses.is_empty()
    }

    /// Look up a warehouse by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Warehouse> {
        self.warehouses.iter().find(|warehouse| warehouse.id == id)
    }
}

impl<'a> IntoIterator for &'a WarehouseCatalog {
    type Item = &'a Warehouse;
    type IntoIter = std::slice::Iter<'a, Warehouse>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
