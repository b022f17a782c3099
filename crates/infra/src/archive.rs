//! Best-effort archive of verification runs and uploaded exports.
//!
//! Archiving is a durability side-effect: callers compute and show results
//! first, then archive, and only log archive failures.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use walkin_inventory::{ItemCatalog, VerificationReport};

use crate::error::StoreError;

/// Category of an uploaded export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadKind {
    InventoryOrder,
    UsageRates,
}

impl UploadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadKind::InventoryOrder => "inventory-order",
            UploadKind::UsageRates => "usage-rates",
        }
    }
}

/// One item's usage-per-thousand rate at import time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub item: String,
    pub usage_per_thousand_sales: f64,
}

/// Record of a usage-rate import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesSnapshot {
    pub file_name: String,
    pub updated_count: usize,
    pub rates: Vec<RateEntry>,
    pub imported_at: NaiveDateTime,
}

impl RatesSnapshot {
    pub fn capture(
        file_name: impl Into<String>,
        updated_count: usize,
        catalog: &ItemCatalog,
        imported_at: NaiveDateTime,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            updated_count,
            rates: catalog
                .iter()
                .map(|(key, config)| RateEntry {
                    item: key.as_str().to_string(),
                    usage_per_thousand_sales: config.usage_per_thousand_sales,
                })
                .collect(),
            imported_at,
        }
    }
}

/// Replace characters outside `[A-Za-z0-9._-]` with `_`.
pub fn safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Archive sink abstraction.
#[async_trait]
pub trait ReportArchive: Send + Sync {
    /// Store a verification report; returns where it was stored.
    async fn save_report(&self, report: &VerificationReport) -> Result<String, StoreError>;

    /// Store a usage-rate import record; returns where it was stored.
    async fn save_rates(&self, snapshot: &RatesSnapshot) -> Result<String, StoreError>;

    /// Keep a copy of an uploaded export; returns where it was stored.
    async fn backup_upload(
        &self,
        kind: UploadKind,
        file_name: &str,
        contents: &[u8],
        at: NaiveDateTime,
    ) -> Result<String, StoreError>;
}

/// Default archive location: `<data dir>/walkin/archive`.
pub fn default_archive_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("walkin").join("archive"))
}

/// Archive rooted in a local directory.
///
/// Layout:
/// - `inventory-results/<YYYY-MM-DD>/<report id>.json`
/// - `usage-rates/<YYYY-MM-DD>/<HH-MM-SS>_<file>.json`
/// - `uploads/<kind>/<YYYY-MM-DD>/<HH-MM-SS>_<file>`
#[derive(Debug, Clone)]
pub struct FsReportArchive {
    root: PathBuf,
}

impl FsReportArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write(&self, relative: PathBuf, contents: &[u8]) -> Result<String, StoreError> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        Ok(path.display().to_string())
    }
}

fn day_dir(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d").to_string()
}

fn timed_name(at: NaiveDateTime, file_name: &str) -> String {
    format!("{}_{}", at.format("%H-%M-%S"), safe_file_name(file_name))
}

#[async_trait]
impl ReportArchive for FsReportArchive {
    async fn save_report(&self, report: &VerificationReport) -> Result<String, StoreError> {
        let json = serde_json::to_vec_pretty(report)?;
        let relative = PathBuf::from("inventory-results")
            .join(report.created_at.format("%Y-%m-%d").to_string())
            .join(format!("{}.json", report.report_id));
        self.write(relative, &json).await
    }

    async fn save_rates(&self, snapshot: &RatesSnapshot) -> Result<String, StoreError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        let relative = PathBuf::from("usage-rates")
            .join(day_dir(snapshot.imported_at))
            .join(format!("{}.json", timed_name(snapshot.imported_at, &snapshot.file_name)));
        self.write(relative, &json).await
    }

    async fn backup_upload(
        &self,
        kind: UploadKind,
        file_name: &str,
        contents: &[u8],
        at: NaiveDateTime,
    ) -> Result<String, StoreError> {
        let relative = PathBuf::from("uploads")
            .join(kind.as_str())
            .join(day_dir(at))
            .join(timed_name(at, file_name));
        self.write(relative, contents).await
    }
}

/// In-memory archive (tests, dry runs).
#[derive(Debug, Default)]
pub struct InMemoryReportArchive {
    reports: Mutex<Vec<VerificationReport>>,
    rates: Mutex<Vec<RatesSnapshot>>,
    uploads: Mutex<Vec<(UploadKind, String, Vec<u8>)>>,
}

impl InMemoryReportArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<VerificationReport> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn rates(&self) -> Vec<RatesSnapshot> {
        self.rates.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn uploads(&self) -> Vec<(UploadKind, String, Vec<u8>)> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("archive lock poisoned".to_string())
}

#[async_trait]
impl ReportArchive for InMemoryReportArchive {
    async fn save_report(&self, report: &VerificationReport) -> Result<String, StoreError> {
        self.reports.lock().map_err(|_| poisoned())?.push(report.clone());
        Ok(format!("memory:inventory-results/{}", report.report_id))
    }

    async fn save_rates(&self, snapshot: &RatesSnapshot) -> Result<String, StoreError> {
        self.rates.lock().map_err(|_| poisoned())?.push(snapshot.clone());
        Ok(format!("memory:usage-rates/{}", safe_file_name(&snapshot.file_name)))
    }

    async fn backup_upload(
        &self,
        kind: UploadKind,
        file_name: &str,
        contents: &[u8],
        at: NaiveDateTime,
    ) -> Result<String, StoreError> {
        let name = timed_name(at, file_name);
        self.uploads
            .lock()
            .map_err(|_| poisoned())?
            .push((kind, name.clone(), contents.to_vec()));
        Ok(format!("memory:uploads/{}/{name}", kind.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use walkin_core::ReportId;
    use walkin_inventory::{ResultSet, SalesProjectionCalendar, verify};

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(7, 5, 9)
            .unwrap()
    }

    fn sample_report() -> VerificationReport {
        let catalog = ItemCatalog::defaults();
        let calendar = SalesProjectionCalendar::defaults();
        let day = at().date();
        let results: ResultSet =
            verify(Some("1,Dairy,Queso,0,0,CS,2,5"), &catalog, &calendar, day, day).unwrap();
        VerificationReport::from_results(
            ReportId::new(),
            "Inventory Count (Mon).csv",
            day,
            day,
            &results,
            Utc.with_ymd_and_hms(2024, 3, 4, 7, 5, 9).unwrap(),
        )
    }

    #[test]
    fn safe_names_keep_only_portable_characters() {
        assert_eq!(safe_file_name("Inventory Count (Mon).csv"), "Inventory_Count__Mon_.csv");
        assert_eq!(safe_file_name("usage-rates_v2.csv"), "usage-rates_v2.csv");
    }

    #[tokio::test]
    async fn fs_archive_lays_out_by_kind_and_day() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FsReportArchive::new(dir.path());

        let upload = archive
            .backup_upload(UploadKind::InventoryOrder, "count 1.csv", b"a,b", at())
            .await
            .unwrap();
        assert!(upload.ends_with("uploads/inventory-order/2024-03-04/07-05-09_count_1.csv"));
        assert_eq!(std::fs::read(&upload).unwrap(), b"a,b");

        let report = sample_report();
        let stored = archive.save_report(&report).await.unwrap();
        let back: VerificationReport =
            serde_json::from_slice(&std::fs::read(&stored).unwrap()).unwrap();
        assert_eq!(back, report);
        assert!(stored.contains("inventory-results/2024-03-04/"));
    }

    #[tokio::test]
    async fn rates_snapshot_lists_every_item() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FsReportArchive::new(dir.path());
        let snapshot = RatesSnapshot::capture("rates.csv", 3, &ItemCatalog::defaults(), at());
        assert_eq!(snapshot.rates.len(), 27);

        let stored = archive.save_rates(&snapshot).await.unwrap();
        assert!(stored.ends_with("usage-rates/2024-03-04/07-05-09_rates.csv.json"));
    }

    #[tokio::test]
    async fn in_memory_archive_records_everything() {
        let archive = InMemoryReportArchive::new();
        archive.save_report(&sample_report()).await.unwrap();
        archive
            .backup_upload(UploadKind::UsageRates, "r.csv", b"x", at())
            .await
            .unwrap();
        assert_eq!(archive.reports().len(), 1);
        assert_eq!(archive.reports()[0].items[0].name, "Queso");
        assert_eq!(archive.uploads()[0].1, "07-05-09_r.csv");
    }
}
