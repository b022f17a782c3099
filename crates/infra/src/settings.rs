//! Catalog and sales-calendar persistence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use walkin_inventory::{ItemCatalog, SalesProjectionCalendar};

use crate::error::StoreError;

/// Persisted user settings: the item catalog and the weekly sales calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub items: ItemCatalog,
    #[serde(default)]
    pub sales_projections: SalesProjectionCalendar,
}

impl Settings {
    /// Built-in settings for a new store.
    pub fn defaults() -> Self {
        Self {
            items: ItemCatalog::defaults(),
            sales_projections: SalesProjectionCalendar::defaults(),
        }
    }

    /// Add default items missing from persisted settings.
    fn with_default_items(mut self) -> Self {
        let added = self.items.merge_defaults(&ItemCatalog::defaults());
        if added > 0 {
            tracing::info!(added, "merged new default items into saved catalog");
        }
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Settings storage abstraction.
pub trait SettingsStore: Send + Sync {
    /// Load settings, falling back to defaults when nothing is stored.
    ///
    /// Default items missing from stored settings are merged in.
    fn load(&self) -> Result<Settings, StoreError>;

    /// Persist settings, replacing what was stored.
    fn save(&self, settings: &Settings) -> Result<(), StoreError>;

    /// Drop stored settings so the next load yields defaults.
    fn reset(&self) -> Result<(), StoreError>;
}

/// Default settings file location: `<config dir>/walkin/settings.json`.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("walkin").join("settings.json"))
}

/// Settings stored as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn load(&self) -> Result<Settings, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no saved settings; using defaults");
                return Ok(Settings::defaults());
            }
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };

        let settings: Settings = serde_json::from_str(&text)?;
        Ok(settings.with_default_items())
    }

    fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), items = settings.items.len(), "saved settings");
        Ok(())
    }

    fn reset(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::io(&self.path, err)),
        }
    }
}

/// In-memory settings store (tests, ephemeral runs).
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    inner: RwLock<Option<Settings>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            inner: RwLock::new(Some(settings)),
        }
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> Result<Settings, StoreError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("settings lock poisoned".to_string()))?;
        Ok(guard
            .clone()
            .map(Settings::with_default_items)
            .unwrap_or_else(Settings::defaults))
    }

    fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("settings lock poisoned".to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }

    fn reset(&self) -> Result<(), StoreError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("settings lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}
