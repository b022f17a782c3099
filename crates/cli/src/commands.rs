//! Command handlers.
//!
//! Handlers load a settings snapshot, call the verification core
//! synchronously, print, and only then touch the archive. Archive failures
//! are logged and never change the outcome.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate, NaiveDateTime, Utc};

use walkin_core::ReportId;
use walkin_infra::{
    FsReportArchive, JsonFileSettingsStore, RatesSnapshot, ReportArchive, Settings, SettingsStore,
    UploadKind, default_archive_dir, default_settings_path, export_results,
};
use walkin_inventory::number::parse_quantity;
use walkin_inventory::{
    ItemConfig, VerificationError, VerificationReport, apply_projected_usage, import_usage_rates,
    parse_weekday, verify, weekday_name_of,
};

use crate::args::{
    ApplyUsageArgs, Cli, Command, ImportRatesArgs, ReorderArgs, SetItemArgs, SetSalesArgs,
    SettingsCommand, VerifyArgs,
};
use crate::render;

/// How a command finished, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NoMatchingItems,
    MissingInput,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::NoMatchingItems => 1,
            Outcome::MissingInput => 2,
        }
    }
}

/// Storage wiring shared by every command.
#[derive(Clone)]
pub struct App {
    settings: Arc<dyn SettingsStore>,
    archive: Option<Arc<dyn ReportArchive>>,
}

impl App {
    pub fn new(settings: Arc<dyn SettingsStore>, archive: Option<Arc<dyn ReportArchive>>) -> Self {
        Self { settings, archive }
    }

    /// File-backed stores at the configured (or platform default) locations.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let settings_path = cli
            .settings
            .clone()
            .or_else(default_settings_path)
            .ok_or_else(|| anyhow!("no config directory found; pass --settings"))?;
        let archive_dir: Option<PathBuf> = cli.archive_dir.clone().or_else(default_archive_dir);
        if archive_dir.is_none() {
            tracing::warn!("no data directory found; runs will not be archived");
        }

        Ok(Self::new(
            Arc::new(JsonFileSettingsStore::new(settings_path)),
            archive_dir.map(|dir| Arc::new(FsReportArchive::new(dir)) as Arc<dyn ReportArchive>),
        ))
    }

    fn load_settings(&self) -> Result<Settings> {
        self.settings.load().context("loading settings")
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.settings.save(settings).context("saving settings")
    }
}

/// Dispatch one parsed command.
pub async fn run<W: Write>(app: &App, command: Command, out: &mut W) -> Result<Outcome> {
    match command {
        Command::Verify(args) => run_verify(app, args, out).await,
        Command::ImportRates(args) => run_import_rates(app, args, out).await,
        Command::ApplyUsage(args) => run_apply_usage(app, args, out),
        Command::Settings(cmd) => run_settings(app, cmd, out),
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn read_upload(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

async fn run_verify<W: Write>(app: &App, args: VerifyArgs, out: &mut W) -> Result<Outcome> {
    let settings = app.load_settings()?;
    let today = args.today.unwrap_or_else(local_today);

    let upload = match &args.csv {
        Some(path) => match read_upload(path).await {
            Ok(bytes) => Some((path.as_path(), bytes)),
            Err(err) => {
                let reason = format!("{err:#}");
                tracing::warn!(error = %reason, "inventory export unreadable");
                writeln!(out, "Could not read {}.", path.display())?;
                writeln!(out, "{}", VerificationError::MissingInput)?;
                return Ok(Outcome::MissingInput);
            }
        },
        None => None,
    };
    let text = upload
        .as_ref()
        .map(|(_, bytes)| String::from_utf8_lossy(bytes).into_owned());

    let mut results = match verify(
        text.as_deref(),
        &settings.items,
        &settings.sales_projections,
        today,
        args.shipment,
    ) {
        Ok(results) => results,
        Err(err) => {
            writeln!(out, "{err}")?;
            return Ok(match err {
                VerificationError::MissingInput => Outcome::MissingInput,
                VerificationError::NoMatchingItems { .. } => Outcome::NoMatchingItems,
            });
        }
    };

    for field in &args.sort {
        let direction = results.sort_by(*field);
        tracing::debug!(field = field.as_str(), ?direction, "re-sorted results");
    }

    render::write_results(out, &results)?;
    writeln!(out)?;
    writeln!(out, "{}", results.summary(args.shipment))?;

    if let Some(path) = &args.export {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        export_results(BufWriter::new(file), &results)
            .with_context(|| format!("exporting to {}", path.display()))?;
        writeln!(out, "Exported {} rows to {}", results.len(), path.display())?;
    }

    if let (Some(archive), Some((path, bytes))) = (&app.archive, &upload) {
        let file_name = display_name(path);
        let report = VerificationReport::from_results(
            ReportId::new(),
            file_name.clone(),
            today,
            args.shipment,
            &results,
            Utc::now(),
        );
        archive_verification(archive.as_ref(), &report, &file_name, bytes, Local::now().naive_local()).await;
    }

    Ok(Outcome::Success)
}

async fn archive_verification(
    archive: &dyn ReportArchive,
    report: &VerificationReport,
    file_name: &str,
    contents: &[u8],
    at: NaiveDateTime,
) {
    match archive
        .backup_upload(UploadKind::InventoryOrder, file_name, contents, at)
        .await
    {
        Ok(location) => tracing::info!(%location, "backed up inventory export"),
        Err(err) => tracing::warn!(error = %err, "inventory export backup failed"),
    }
    match archive.save_report(report).await {
        Ok(location) => tracing::info!(report_id = %report.report_id, %location, "saved verification report"),
        Err(err) => tracing::warn!(report_id = %report.report_id, error = %err, "saving verification report failed"),
    }
}

async fn run_import_rates<W: Write>(app: &App, args: ImportRatesArgs, out: &mut W) -> Result<Outcome> {
    let mut settings = app.load_settings()?;
    let bytes = read_upload(&args.csv).await?;
    let text = String::from_utf8_lossy(&bytes);

    let summary = import_usage_rates(&text, &mut settings.items);
    app.save_settings(&settings)?;
    writeln!(
        out,
        "Updated usage rates for {} items ({} lines skipped)",
        summary.updated, summary.skipped
    )?;

    if let Some(archive) = &app.archive {
        let at = Local::now().naive_local();
        let file_name = display_name(&args.csv);
        if let Err(err) = archive
            .backup_upload(UploadKind::UsageRates, &file_name, &bytes, at)
            .await
        {
            tracing::warn!(error = %err, "usage report backup failed");
        }
        let snapshot = RatesSnapshot::capture(file_name, summary.updated, &settings.items, at);
        if let Err(err) = archive.save_rates(&snapshot).await {
            tracing::warn!(error = %err, "saving usage-rate snapshot failed");
        }
    }

    Ok(Outcome::Success)
}

fn run_apply_usage<W: Write>(app: &App, args: ApplyUsageArgs, out: &mut W) -> Result<Outcome> {
    let mut settings = app.load_settings()?;
    let today = args.today.unwrap_or_else(local_today);
    let updated = apply_projected_usage(&mut settings.items, &settings.sales_projections, today);
    app.save_settings(&settings)?;
    writeln!(
        out,
        "Updated flat daily consumption for {updated} items from {} sales of {:.2}",
        weekday_name_of(today),
        settings.sales_projections.for_date(today)
    )?;
    Ok(Outcome::Success)
}

fn run_settings<W: Write>(app: &App, command: SettingsCommand, out: &mut W) -> Result<Outcome> {
    match command {
        SettingsCommand::Show => {
            let settings = app.load_settings()?;
            render::write_settings(out, &settings.items, &settings.sales_projections)?;
        }
        SettingsCommand::SetItem(args) => set_item(app, args, out)?,
        SettingsCommand::SetSales(args) => set_sales(app, args, out)?,
        SettingsCommand::Reorder(args) => reorder_items(app, args, out)?,
        SettingsCommand::Reset => {
            app.settings.reset().context("resetting settings")?;
            writeln!(out, "Settings reset to defaults")?;
        }
    }
    Ok(Outcome::Success)
}

fn set_item<W: Write>(app: &App, args: SetItemArgs, out: &mut W) -> Result<()> {
    let mut settings = app.load_settings()?;
    let catalog = &mut settings.items;
    let key = args.key.as_str();

    if !catalog.contains(key) {
        catalog.insert(key, ItemConfig::default());
        tracing::info!(item = key, "added catalog item");
    }
    if let Some(raw) = &args.max {
        catalog.set_max_inventory(key, parse_quantity(raw))?;
    }
    if let Some(raw) = &args.flat {
        catalog.set_flat_daily_consumption(key, parse_quantity(raw))?;
    }
    if let Some(raw) = &args.upt {
        catalog.set_usage_per_thousand(key, parse_quantity(raw))?;
    }
    if let Some(raw) = &args.min_usage {
        catalog.set_rate_from_min(key, parse_quantity(raw))?;
    }
    if let Some(raw) = &args.max_usage {
        catalog.set_rate_from_max(key, parse_quantity(raw))?;
    }

    let config = catalog
        .get(key)
        .copied()
        .ok_or_else(|| anyhow!("item {key:?} vanished from the catalog"))?;
    app.save_settings(&settings)?;

    let (slow, busy) = config.usage_range();
    writeln!(
        out,
        "{key}: max {:.2}, flat {:.2}, per $1k {:.4} (usage {slow:.2}-{busy:.2})",
        config.max_inventory, config.flat_daily_consumption, config.usage_per_thousand_sales
    )?;
    Ok(())
}

fn reorder_items<W: Write>(app: &App, args: ReorderArgs, out: &mut W) -> Result<()> {
    let mut settings = app.load_settings()?;
    let mut front: Vec<&str> = Vec::new();
    for key in &args.keys {
        if !settings.items.contains(key) {
            bail!("unknown catalog item {key:?}");
        }
        if !front.contains(&key.as_str()) {
            front.push(key);
        }
    }
    settings.items.reorder(front.iter().copied());
    app.save_settings(&settings)?;

    for (position, key) in settings.items.keys().take(front.len()).enumerate() {
        writeln!(out, "{}. {}", position + 1, key.as_str())?;
    }
    Ok(())
}

fn set_sales<W: Write>(app: &App, args: SetSalesArgs, out: &mut W) -> Result<()> {
    let Some(day) = parse_weekday(&args.day) else {
        bail!("unknown weekday {:?}", args.day);
    };
    let mut settings = app.load_settings()?;
    let sales = parse_quantity(&args.sales);
    settings.sales_projections.set(day, sales);

    let today = args.today.unwrap_or_else(local_today);
    let updated = apply_projected_usage(&mut settings.items, &settings.sales_projections, today);
    app.save_settings(&settings)?;

    writeln!(
        out,
        "{} projected sales set to {:.2}; updated {updated} items for {}",
        walkin_inventory::weekday_name(day),
        settings.sales_projections.get(day),
        weekday_name_of(today)
    )?;
    Ok(())
}
