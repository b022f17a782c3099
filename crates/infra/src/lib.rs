//! Infrastructure layer: settings persistence, run archive, exports.
//!
//! Everything here sits at the system edge. The verification core never calls
//! into this crate; binaries load a snapshot from here, run the core, then
//! hand results back for durability.

pub mod archive;
pub mod error;
pub mod export;
pub mod settings;

pub use archive::{
    FsReportArchive, InMemoryReportArchive, RateEntry, RatesSnapshot, ReportArchive, UploadKind,
    default_archive_dir, safe_file_name,
};
pub use error::StoreError;
pub use export::export_results;
pub use settings::{
    InMemorySettingsStore, JsonFileSettingsStore, Settings, SettingsStore, default_settings_path,
};
