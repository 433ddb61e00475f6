//! Assign command implementation for the hubmatch CLI.

use std::io::{BufReader, Write};
use std::num::NonZeroUsize;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use hubmatch_core::{
    AddressResolver, AssignedDriver, BatchSummary, Geocoder, WarehouseCatalog, assign_batch,
    group_by_warehouse,
};
use hubmatch_geocode::{HttpGeocoder, HttpGeocoderConfig};
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::{file_is_file, open_utf8_file};
use crate::{
    ARG_CATALOG, ARG_GEOCODER_URL, ARG_MAX_CONCURRENCY, ARG_MAX_RETRIES, ARG_OUTPUT, ARG_ROSTER,
    ARG_TIMEOUT_SECS, ARG_USER_AGENT, CliError, ENV_ROSTER, output, roster,
};

/// CLI arguments for the `assign` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Geocode every driver in a roster CSV (columns driver_name, \
                 Driver Number, current_address), assign each driver to the \
                 geodesically nearest micro-warehouse and print the drivers \
                 grouped by warehouse. Options can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Assign drivers to their nearest micro-warehouse"
)]
#[ortho_config(prefix = "HUBMATCH")]
pub(crate) struct AssignArgs {
    /// Path to the driver roster CSV.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) roster: Option<Utf8PathBuf>,
    /// Also write every driver with its assignment to this CSV file.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// JSON warehouse catalog to use instead of the built-in one.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Base URL of the Nominatim service.
    #[arg(long = ARG_GEOCODER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoder_url: Option<String>,
    /// User agent sent to the geocoding service.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Per-request geocoding timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Maximum geocoding requests in flight at once.
    #[arg(long = ARG_MAX_CONCURRENCY, value_name = "n")]
    #[serde(default)]
    pub(crate) max_concurrency: Option<usize>,
    /// Extra attempts for timed-out or throttled lookups.
    #[arg(long = ARG_MAX_RETRIES, value_name = "n")]
    #[serde(default)]
    pub(crate) max_retries: Option<u32>,
}

impl AssignArgs {
    pub(crate) fn into_config(self) -> Result<AssignConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AssignConfig::try_from(merged)
    }
}

/// Resolved `assign` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AssignConfig {
    /// Path to the roster CSV.
    pub(crate) roster: Utf8PathBuf,
    /// Optional CSV export path.
    pub(crate) output: Option<Utf8PathBuf>,
    /// Optional catalog file; the built-in catalog is used when absent.
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// HTTP geocoder settings.
    pub(crate) geocoder: HttpGeocoderConfig,
    /// Retry budget for transient geocoding failures.
    pub(crate) max_retries: u32,
}

impl AssignConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.roster, ARG_ROSTER)?;
        if let Some(catalog) = &self.catalog {
            Self::require_existing(catalog, ARG_CATALOG)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<AssignArgs> for AssignConfig {
    type Error = CliError;

    fn try_from(args: AssignArgs) -> Result<Self, Self::Error> {
        let roster = args.roster.ok_or(CliError::MissingArgument {
            field: ARG_ROSTER,
            env: ENV_ROSTER,
        })?;

        let mut geocoder = HttpGeocoderConfig::default();
        if let Some(base_url) = args.geocoder_url {
            geocoder.base_url = base_url;
        }
        if let Some(user_agent) = args.user_agent {
            if user_agent.trim().is_empty() {
                return Err(CliError::InvalidArgument {
                    field: ARG_USER_AGENT,
                    reason: "must not be blank",
                });
            }
            geocoder.user_agent = user_agent;
        }
        if let Some(secs) = args.timeout_secs {
            if secs == 0 {
                return Err(CliError::InvalidArgument {
                    field: ARG_TIMEOUT_SECS,
                    reason: "must be at least one second",
                });
            }
            geocoder.timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = args.max_concurrency {
            geocoder.max_concurrency =
                NonZeroUsize::new(limit).ok_or(CliError::InvalidArgument {
                    field: ARG_MAX_CONCURRENCY,
                    reason: "must be at least one",
                })?;
        }

        Ok(Self {
            roster,
            output: args.output,
            catalog: args.catalog,
            geocoder,
            max_retries: args.max_retries.unwrap_or_default(),
        })
    }
}

/// Builds the geocoder for the current assign invocation.
pub(crate) trait GeocoderBuilder {
    fn build(&self, config: &AssignConfig) -> Result<Box<dyn Geocoder>, CliError>;
}

pub(crate) struct DefaultGeocoderBuilder;

impl GeocoderBuilder for DefaultGeocoderBuilder {
    fn build(&self, config: &AssignConfig) -> Result<Box<dyn Geocoder>, CliError> {
        let geocoder = HttpGeocoder::with_config(config.geocoder.clone()).map_err(|source| {
            CliError::BuildGeocoder {
                base_url: config.geocoder.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(geocoder))
    }
}

pub(crate) fn run_assign(args: AssignArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultGeocoderBuilder;
    run_assign_with(args, &builder, &mut stdout)
}

pub(crate) fn run_assign_with(
    args: AssignArgs,
    builder: &dyn GeocoderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_assign_config(args)?;
    let catalog = load_catalog(config.catalog.as_deref())?;
    let drivers = execute_assign(&config, &catalog, builder)?;
    let report = group_by_warehouse(&catalog, &drivers);
    output::write_report(writer, &report).map_err(CliError::WriteReport)?;
    if let Some(path) = &config.output {
        output::export_csv(path, &drivers)?;
        info!("wrote {} rows to {path}", drivers.len());
    }
    Ok(())
}

fn execute_assign(
    config: &AssignConfig,
    catalog: &WarehouseCatalog,
    builder: &dyn GeocoderBuilder,
) -> Result<Vec<AssignedDriver>, CliError> {
    if catalog.is_empty() {
        warn!("warehouse catalog is empty; no driver will be assigned");
    }
    let records = roster::load_roster(&config.roster)?;
    let geocoder = builder.build(config)?;
    let resolver = AddressResolver::new(geocoder).with_max_retries(config.max_retries);

    let drivers = assign_batch(records, &resolver, catalog);
    let summary = BatchSummary::from_drivers(&drivers);
    info!(
        "assigned {} of {} drivers ({} could not be located)",
        summary.assigned,
        summary.total,
        summary.unresolved()
    );
    Ok(drivers)
}

fn resolve_assign_config(args: AssignArgs) -> Result<AssignConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Load the catalog at `path`, or the built-in catalog when no path is set.
pub(crate) fn load_catalog(path: Option<&Utf8Path>) -> Result<WarehouseCatalog, CliError> {
    let Some(catalog_path) = path else {
        return Ok(WarehouseCatalog::reference());
    };
    let file = open_utf8_file(catalog_path).map_err(|source| CliError::OpenCatalog {
        path: catalog_path.to_path_buf(),
        source,
    })?;
    WarehouseCatalog::from_json_reader(BufReader::new(file)).map_err(|source| {
        CliError::InvalidCatalog {
            path: catalog_path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<AssignConfig, CliError> {
    let merged = AssignArgs::merge_from_layers(layers).map_err(CliError::from)?;
    AssignConfig::try_from(merged)
}
