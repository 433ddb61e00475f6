//! Error types emitted by the hubmatch CLI.
//!
//! Keep this error type reasonably small, as CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use hubmatch_core::CatalogError;
use hubmatch_geocode::GeocoderBuildError;
use thiserror::Error;

/// Errors emitted by the hubmatch CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Option name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// An option was supplied with an unusable value.
    #[error("invalid --{field}: {reason}")]
    InvalidArgument {
        /// Option name.
        field: &'static str,
        /// What is wrong with the value.
        reason: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option naming the path.
        field: &'static str,
        /// The missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option naming the path.
        field: &'static str,
        /// The offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option naming the path.
        field: &'static str,
        /// The path being inspected.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the warehouse catalog file failed.
    #[error("failed to open warehouse catalog at {path:?}: {source}")]
    OpenCatalog {
        /// Catalog path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The warehouse catalog file was malformed or invalid.
    #[error("invalid warehouse catalog at {path:?}: {source}")]
    InvalidCatalog {
        /// Catalog path.
        path: Utf8PathBuf,
        /// Why the catalog was rejected.
        #[source]
        source: CatalogError,
    },
    /// Opening the driver roster failed.
    #[error("failed to open driver roster at {path:?}: {source}")]
    OpenRoster {
        /// Roster path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// A roster row could not be decoded.
    #[error("failed to read driver roster at {path:?}: {source}")]
    ReadRoster {
        /// Roster path.
        path: Utf8PathBuf,
        /// CSV decoding failure.
        #[source]
        source: csv::Error,
    },
    /// The roster header lacks one or more required columns.
    #[error(
        "driver roster {path:?} is missing required columns; it must contain: \
         driver_name, Driver Number, current_address (missing: {missing})"
    )]
    MissingRosterColumns {
        /// Roster path.
        path: Utf8PathBuf,
        /// Comma-separated list of the absent columns.
        missing: String,
    },
    /// Constructing the HTTP geocoder failed.
    #[error("failed to build geocoder for {base_url:?}: {source}")]
    BuildGeocoder {
        /// Configured geocoder base URL.
        base_url: String,
        /// Underlying build failure.
        #[source]
        source: GeocoderBuildError,
    },
    /// Writing the assignment report failed.
    #[error("failed to write assignment report: {0}")]
    WriteReport(#[source] std::io::Error),
    /// Creating the CSV export file failed.
    #[error("failed to create export file {path:?}: {source}")]
    CreateExport {
        /// Export path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Writing the CSV export failed.
    #[error("failed to write export file {path:?}: {source}")]
    WriteExport {
        /// Export path.
        path: Utf8PathBuf,
        /// CSV encoding or IO failure.
        #[source]
        source: csv::Error,
    },
}
