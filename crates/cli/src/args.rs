//! Command line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use walkin_inventory::SortField;
use walkin_observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "walkin")]
#[command(about = "Verify walk-in inventory orders against par levels")]
#[command(version)]
pub struct Cli {
    /// Settings file (item catalog and sales projections)
    #[arg(long, global = true, env = "WALKIN_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Directory for run reports and upload backups
    #[arg(long, global = true, env = "WALKIN_ARCHIVE_DIR")]
    pub archive_dir: Option<PathBuf>,

    /// Log line format
    #[arg(long, global = true, env = "WALKIN_LOG_FORMAT", value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check an inventory order export against the catalog
    Verify(VerifyArgs),
    /// Import usage-per-thousand rates from a usage report export
    ImportRates(ImportRatesArgs),
    /// Recompute flat daily consumption from today's projected sales
    ApplyUsage(ApplyUsageArgs),
    /// Inspect or edit stored settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Inventory order export (CSV)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Shipment day
    #[arg(long)]
    pub shipment: NaiveDate,

    /// Current day (defaults to the local date)
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Re-sort by a column; repeating a column flips its direction
    #[arg(long = "sort")]
    pub sort: Vec<SortField>,

    /// Also write the results to this CSV file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ImportRatesArgs {
    /// Usage report export (CSV)
    #[arg(long)]
    pub csv: PathBuf,
}

#[derive(Debug, Args)]
pub struct ApplyUsageArgs {
    /// Day whose projected sales drive the update (defaults to the local date)
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the catalog and the sales projections
    Show,
    /// Edit (or add) one catalog item
    SetItem(SetItemArgs),
    /// Set projected sales for a weekday and re-apply projected usage
    SetSales(SetSalesArgs),
    /// Move items to the front of the catalog; earlier items win ambiguous name matches
    Reorder(ReorderArgs),
    /// Drop stored settings and return to the built-in defaults
    Reset,
}

/// Numeric values are read leniently: a value with no leading number counts as 0.
#[derive(Debug, Args)]
pub struct SetItemArgs {
    /// Catalog key, e.g. "Limes, 40#"
    pub key: String,

    /// Max inventory (cases)
    #[arg(long, allow_hyphen_values = true)]
    pub max: Option<String>,

    /// Flat daily consumption (cases)
    #[arg(long, allow_hyphen_values = true)]
    pub flat: Option<String>,

    /// Usage per $1000 of sales (cases)
    #[arg(long, allow_hyphen_values = true)]
    pub upt: Option<String>,

    /// Usage on a slow ($10k) day; sets the rate to value / 10
    #[arg(long, allow_hyphen_values = true)]
    pub min_usage: Option<String>,

    /// Usage on a busy ($17k) day; sets the rate to value / 17
    #[arg(long, allow_hyphen_values = true)]
    pub max_usage: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReorderArgs {
    /// Catalog keys, in the order they should be tried
    #[arg(required = true)]
    pub keys: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SetSalesArgs {
    /// Weekday name, e.g. Friday
    pub day: String,

    /// Projected sales for that day
    #[arg(allow_hyphen_values = true)]
    pub sales: String,

    /// Day used when re-applying projected usage (defaults to the local date)
    #[arg(long)]
    pub today: Option<NaiveDate>,
}
