//! Test helpers for writing CLI inputs and stubbing the geocoder.

use camino::Utf8Path;
use hubmatch_core::test_support::TableGeocoder;

use crate::CliError;
use crate::assign::{AssignConfig, GeocoderBuilder};

/// Roster with one driver near Hebbal, one blank address and one near Kudlu.
pub(super) const ROSTER_CSV: &str = "\
driver_name,Driver Number,current_address
Asha,9800000001,Sahakar Nagar
Ravi,9800000002,
Kiran,9800000004,Kudlu Main Road
";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Geocoder that knows the roster's two resolvable addresses.
pub(super) fn known_places() -> TableGeocoder {
    TableGeocoder::new()
        .with_coordinate("Sahakar Nagar", 13.0, 77.6)
        .with_coordinate("Kudlu Main Road", 12.879_878_6, 77.648_3)
}

/// Builder handing out [`known_places`] instead of an HTTP geocoder.
#[derive(Debug, Default)]
pub(super) struct StubGeocoderBuilder;

impl GeocoderBuilder for StubGeocoderBuilder {
    fn build(
        &self,
        _config: &AssignConfig,
    ) -> Result<Box<dyn hubmatch_core::Geocoder>, CliError> {
        Ok(Box::new(known_places()))
    }
}
