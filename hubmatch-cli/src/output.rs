//! Report rendering and CSV export.

use std::io::{self, Write};

use camino::Utf8Path;
use hubmatch_core::{AssignedDriver, AssignmentReport};
use serde::Serialize;

use crate::CliError;
use crate::fs::create_utf8_file;

/// Heading suffix shown after every warehouse identifier.
const WAREHOUSE_HEADING_SUFFIX: &str = "[BH Micro warehouse]";
const EMPTY_GROUP_NOTICE: &str = "No drivers found near this warehouse";
const UNLOCATED_HEADING: &str = "Unlocated drivers";
const UNASSIGNED_HEADING: &str = "Located drivers without a warehouse";

const EXPORT_COLUMNS: [&str; 7] = [
    "driver_name",
    "Driver Number",
    "current_address",
    "latitude",
    "longitude",
    "nearest_warehouse",
    "distance_km",
];

/// Print the per-warehouse report.
///
/// Each warehouse gets a heading followed by a driver table sorted by
/// distance, or a notice when nobody was assigned to it. Drivers that could
/// not be located follow in their own section, as do located drivers the
/// catalog had no warehouse for.
pub(crate) fn write_report(writer: &mut dyn Write, report: &AssignmentReport<'_>) -> io::Result<()> {
    for group in &report.groups {
        writeln!(writer, "{} {WAREHOUSE_HEADING_SUFFIX}", group.warehouse_id)?;
        if group.is_empty() {
            writeln!(writer, "  {EMPTY_GROUP_NOTICE}")?;
        } else {
            write_driver_table(writer, &group.drivers)?;
        }
        writeln!(writer)?;
    }

    if !report.unlocated.is_empty() {
        writeln!(writer, "{UNLOCATED_HEADING}")?;
        for driver in &report.unlocated {
            writeln!(
                writer,
                "  {} ({}): {:?} [{}]",
                driver.record.name,
                driver.record.phone,
                driver.record.address,
                driver.resolution.label()
            )?;
        }
    }

    if !report.unassigned.is_empty() {
        writeln!(writer, "{UNASSIGNED_HEADING}")?;
        for driver in &report.unassigned {
            writeln!(
                writer,
                "  {} ({}): {:?}",
                driver.record.name, driver.record.phone, driver.record.address
            )?;
        }
    }
    Ok(())
}

fn write_driver_table(writer: &mut dyn Write, drivers: &[&AssignedDriver]) -> io::Result<()> {
    let name_width = drivers
        .iter()
        .map(|driver| driver.record.name.chars().count())
        .chain(std::iter::once("Driver Name".len()))
        .max()
        .unwrap_or_default();
    let phone_width = drivers
        .iter()
        .map(|driver| driver.record.phone.chars().count())
        .chain(std::iter::once("Driver Number".len()))
        .max()
        .unwrap_or_default();

    writeln!(
        writer,
        "  {:<name_width$}  {:<phone_width$}  Distance (km)",
        "Driver Name", "Driver Number"
    )?;
    for driver in drivers {
        let distance = driver
            .assignment
            .rounded_distance_km()
            .map(|km| format!("{km:.2}"))
            .unwrap_or_default();
        writeln!(
            writer,
            "  {:<name_width$}  {:<phone_width$}  {distance:>13}",
            driver.record.name, driver.record.phone
        )?;
    }
    Ok(())
}

/// One exported row.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    driver_name: &'a str,
    #[serde(rename = "Driver Number")]
    driver_number: &'a str,
    current_address: &'a str,
    latitude: Option<f64>,
    longitude: Option<f64>,
    nearest_warehouse: Option<&'a str>,
    distance_km: Option<f64>,
}

impl<'a> From<&'a AssignedDriver> for ExportRow<'a> {
    fn from(driver: &'a AssignedDriver) -> Self {
        let coordinate = driver.coordinate();
        Self {
            driver_name: &driver.record.name,
            driver_number: &driver.record.phone,
            current_address: &driver.record.address,
            latitude: coordinate.map(|c| c.latitude()),
            longitude: coordinate.map(|c| c.longitude()),
            nearest_warehouse: driver.assignment.warehouse_id(),
            distance_km: driver.assignment.rounded_distance_km(),
        }
    }
}

/// Write every driver, in roster order, to `writer` as CSV.
///
/// Absent coordinates, warehouses and distances are written as empty cells.
/// The header row is written even when there are no drivers.
pub(crate) fn write_export<W: Write>(writer: W, drivers: &[AssignedDriver]) -> csv::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if drivers.is_empty() {
        csv.write_record(EXPORT_COLUMNS)?;
    }
    for driver in drivers {
        csv.serialize(ExportRow::from(driver))?;
    }
    csv.flush()?;
    Ok(())
}

/// Export `drivers` to a new CSV file at `path`.
pub(crate) fn export_csv(path: &Utf8Path, drivers: &[AssignedDriver]) -> Result<(), CliError> {
    let file = create_utf8_file(path).map_err(|source| CliError::CreateExport {
        path: path.to_path_buf(),
        source,
    })?;
    write_export(file, drivers).map_err(|source| CliError::WriteExport {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubmatch_core::{
        Assignment, AssignmentResult, DriverRecord, GeoCoordinate, GeocodeError, Resolution,
        WarehouseCatalog, group_by_warehouse,
    };
    use rstest::{fixture, rstest};

    fn assigned(name: &str, phone: &str, warehouse: &str, distance_km: f64) -> AssignedDriver {
        AssignedDriver {
            record: DriverRecord::new(name, phone, "somewhere"),
            resolution: Resolution::Resolved(GeoCoordinate::new(12.88, 77.65).expect("valid")),
            assignment: AssignmentResult::Assigned(Assignment {
                warehouse_id: warehouse.to_owned(),
                distance_km,
            }),
        }
    }

    #[fixture]
    fn drivers() -> Vec<AssignedDriver> {
        vec![
            assigned("Far", "9800000011", "Kudlu", 2.304),
            AssignedDriver {
                record: DriverRecord::new("Ravi", "9800000002", "Nowhere Lane"),
                resolution: Resolution::TransientError(GeocodeError::NetworkError {
                    url: "https://geocoder.test/search".to_owned(),
                    message: "connection reset".to_owned(),
                }),
                assignment: AssignmentResult::Unassigned,
            },
            assigned("Near", "9800000012", "Kudlu", 0.456),
        ]
    }

    fn render(drivers: &[AssignedDriver]) -> String {
        let catalog = WarehouseCatalog::reference();
        let report = group_by_warehouse(&catalog, drivers);
        let mut buffer = Vec::new();
        write_report(&mut buffer, &report).expect("report should render");
        String::from_utf8(buffer).expect("report is utf-8")
    }

    #[rstest]
    fn report_lists_every_warehouse_alphabetically(drivers: Vec<AssignedDriver>) {
        let text = render(&drivers);

        let headings: Vec<&str> = text
            .lines()
            .filter(|line| line.ends_with(WAREHOUSE_HEADING_SUFFIX))
            .collect();
        assert_eq!(
            headings,
            [
                "Banashankari [BH Micro warehouse]",
                "Chandra Layout [BH Micro warehouse]",
                "Hebbal [BH Micro warehouse]",
                "Koramangala NGV [BH Micro warehouse]",
                "Kudlu [BH Micro warehouse]",
                "Mahadevapura [BH Micro warehouse]",
            ]
        );
        assert_eq!(text.matches(EMPTY_GROUP_NOTICE).count(), 5);
    }

    #[rstest]
    fn report_rows_are_sorted_and_rounded(drivers: Vec<AssignedDriver>) {
        let text = render(&drivers);

        let rows: Vec<&str> = text
            .lines()
            .skip_while(|line| !line.starts_with("Kudlu"))
            .skip(2)
            .take(2)
            .collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].trim_start().starts_with("Near"), "got {rows:?}");
        assert!(rows[0].ends_with("0.46"), "got {rows:?}");
        assert!(rows[1].trim_start().starts_with("Far"), "got {rows:?}");
        assert!(rows[1].ends_with("2.30"), "got {rows:?}");
    }

    #[rstest]
    fn report_lists_unlocated_drivers(drivers: Vec<AssignedDriver>) {
        let text = render(&drivers);

        let tail: Vec<&str> = text
            .lines()
            .skip_while(|line| *line != UNLOCATED_HEADING)
            .collect();
        assert_eq!(
            tail,
            [
                UNLOCATED_HEADING,
                "  Ravi (9800000002): \"Nowhere Lane\" [transient_error]",
            ]
        );
    }

    #[rstest]
    fn empty_catalog_separates_located_from_unlocated(drivers: Vec<AssignedDriver>) {
        let located: Vec<AssignedDriver> = drivers
            .into_iter()
            .map(|driver| AssignedDriver {
                assignment: AssignmentResult::Unassigned,
                ..driver
            })
            .collect();
        let catalog = WarehouseCatalog::default();
        let report = group_by_warehouse(&catalog, &located);
        let mut buffer = Vec::new();
        write_report(&mut buffer, &report).expect("report should render");
        let text = String::from_utf8(buffer).expect("report is utf-8");

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                UNLOCATED_HEADING,
                "  Ravi (9800000002): \"Nowhere Lane\" [transient_error]",
                UNASSIGNED_HEADING,
                "  Far (9800000011): \"somewhere\"",
                "  Near (9800000012): \"somewhere\"",
            ]
        );
        assert!(!text.contains("[resolved]"));
    }

    #[rstest]
    fn export_keeps_roster_order_and_blanks_missing_values(drivers: Vec<AssignedDriver>) {
        let mut buffer = Vec::new();
        write_export(&mut buffer, &drivers).expect("export should write");
        let text = String::from_utf8(buffer).expect("export is utf-8");

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                EXPORT_COLUMNS.join(",").as_str(),
                "Far,9800000011,somewhere,12.88,77.65,Kudlu,2.3",
                "Ravi,9800000002,Nowhere Lane,,,,",
                "Near,9800000012,somewhere,12.88,77.65,Kudlu,0.46",
            ]
        );
    }

    #[rstest]
    fn empty_export_still_has_header() {
        let mut buffer = Vec::new();
        write_export(&mut buffer, &[]).expect("export should write");

        assert_eq!(
            String::from_utf8(buffer).expect("export is utf-8"),
            format!("{}\n", EXPORT_COLUMNS.join(","))
        );
    }
}
