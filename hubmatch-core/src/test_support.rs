//! Deterministic, in-memory geocoders used by unit, doc and behaviour tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use crate::{GeoCoordinate, GeocodeError, GeocodeOutcome, Geocoder};

/// Geocoder answering from a fixed address table.
///
/// Unknown addresses yield `Ok(None)`. Every lookup is counted, which lets
/// tests prove that repeated addresses are not cached.
#[derive(Debug, Default)]
pub struct TableGeocoder {
    entries: HashMap<String, GeocodeOutcome>,
    calls: Cell<usize>,
}

impl TableGeocoder {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `address` with the given coordinate.
    ///
    /// # Panics
    ///
    /// Panics when the coordinate is out of range.
    #[must_use]
    #[expect(clippy::expect_used, reason = "test fixtures should fail fast")]
    pub fn with_coordinate(mut self, address: &str, latitude: f64, longitude: f64) -> Self {
        let coordinate =
            GeoCoordinate::new(latitude, longitude).expect("fixture coordinate should be valid");
        self.entries.insert(address.to_owned(), Ok(Some(coordinate)));
        self
    }

    /// Fail lookups of `address` with `error`.
    #[must_use]
    pub fn with_error(mut self, address: &str, error: GeocodeError) -> Self {
        self.entries.insert(address.to_owned(), Err(error));
        self
    }

    /// Number of lookups performed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Geocoder for TableGeocoder {
    fn geocode(&self, address: &str) -> GeocodeOutcome {
        self.calls.set(self.calls.get() + 1);
        self.entries.get(address).cloned().unwrap_or(Ok(None))
    }
}

/// Geocoder replaying a scripted sequence of outcomes, whatever the address.
///
/// Once the script is exhausted every lookup yields `Ok(None)`.
#[derive(Debug, Default)]
pub struct SequenceGeocoder {
    outcomes: RefCell<VecDeque<GeocodeOutcome>>,
    calls: Cell<usize>,
}

impl SequenceGeocoder {
    /// Script the outcomes of successive lookups.
    pub fn new<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = GeocodeOutcome>,
    {
        Self {
            outcomes: RefCell::new(outcomes.into_iter().collect()),
            calls: Cell::new(0),
        }
    }

    /// Number of lookups performed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Geocoder for SequenceGeocoder {
    fn geocode(&self, _address: &str) -> GeocodeOutcome {
        self.calls.set(self.calls.get() + 1);
        self.outcomes.borrow_mut().pop_front().unwrap_or(Ok(None))
    }
}
