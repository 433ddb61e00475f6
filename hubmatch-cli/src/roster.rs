//! Driver roster CSV input.

use std::io::Read;

use camino::Utf8Path;
use hubmatch_core::DriverRecord;
use serde::Deserialize;

use crate::CliError;
use crate::fs::open_utf8_file;

pub(crate) const COLUMN_NAME: &str = "driver_name";
pub(crate) const COLUMN_PHONE: &str = "Driver Number";
pub(crate) const COLUMN_ADDRESS: &str = "current_address";

const REQUIRED_COLUMNS: [&str; 3] = [COLUMN_NAME, COLUMN_PHONE, COLUMN_ADDRESS];

/// One roster row. Columns other than these three are ignored.
#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "driver_name")]
    name: String,
    #[serde(rename = "Driver Number")]
    phone: String,
    #[serde(rename = "current_address")]
    address: String,
}

impl From<RosterRow> for DriverRecord {
    fn from(row: RosterRow) -> Self {
        Self::new(row.name, row.phone, row.address)
    }
}

/// Load every driver from the roster CSV at `path`, in file order.
pub(crate) fn load_roster(path: &Utf8Path) -> Result<Vec<DriverRecord>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenRoster {
        path: path.to_path_buf(),
        source,
    })?;
    read_roster(file, path)
}

/// Decode roster rows from `reader`; `path` is used for error reporting.
pub(crate) fn read_roster<R: Read>(
    reader: R,
    path: &Utf8Path,
) -> Result<Vec<DriverRecord>, CliError> {
    let read_error = |source| CliError::ReadRoster {
        path: path.to_path_buf(),
        source,
    };
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv.headers().map_err(read_error)?;
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(CliError::MissingRosterColumns {
            path: path.to_path_buf(),
            missing: missing.join(", "),
        });
    }

    csv.deserialize::<RosterRow>()
        .map(|row| row.map(DriverRecord::from).map_err(read_error))
        .collect()
}
