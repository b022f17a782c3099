//! Item catalog: per-item ordering configuration and export-name matching.
//!
//! The catalog is an ordered set of items. Order matters: when an export name
//! matches more than one key, the first key in catalog order wins. Names that
//! legitimately match two keys are a known limitation; reorder the catalog to
//! choose the winner.

use core::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use walkin_core::{DomainError, DomainResult};

/// Export label of a known duplicate entry; rows carrying it are ignored.
pub const EXCLUDED_ROW_MARKER: &str = "Corn w/ Poblano Mix, 20lb";

/// Sales (in thousands) of a slow day, used to display an item's usage range.
pub const SLOW_DAY_SALES_THOUSANDS: f64 = 10.0;

/// Sales (in thousands) of a busy day, used to display an item's usage range.
pub const BUSY_DAY_SALES_THOUSANDS: f64 = 17.0;

/// Catalog item identifier, e.g. `"Black beans"`.
///
/// Case is preserved for display; matching against export names is
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for ItemKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordering configuration of one catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    /// Target stock level right after a shipment lands.
    pub max_inventory: f64,
    /// Fallback consumption per day when no sales-driven rate is set.
    pub flat_daily_consumption: f64,
    /// Units consumed per 1000 currency units of sales.
    pub usage_per_thousand_sales: f64,
}

impl ItemConfig {
    pub fn new(max_inventory: f64, flat_daily_consumption: f64, usage_per_thousand_sales: f64) -> Self {
        Self {
            max_inventory,
            flat_daily_consumption,
            usage_per_thousand_sales,
        }
    }

    /// Usage on a slow and on a busy sales day.
    pub fn usage_range(&self) -> (f64, f64) {
        (
            self.usage_per_thousand_sales * SLOW_DAY_SALES_THOUSANDS,
            self.usage_per_thousand_sales * BUSY_DAY_SALES_THOUSANDS,
        )
    }
}

/// Whether an export row is a known duplicate that must never be evaluated.
pub fn is_excluded_row(name: &str) -> bool {
    name.contains(EXCLUDED_ROW_MARKER)
}

/// Ordered catalog of items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemCatalog {
    entries: Vec<(ItemKey, ItemConfig)>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &ItemKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemKey, &ItemConfig)> {
        self.entries.iter().map(|(k, c)| (k, c))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&ItemConfig> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Insert an item, replacing an existing config in place or appending.
    pub fn insert(&mut self, key: impl Into<ItemKey>, config: ItemConfig) -> Option<ItemConfig> {
        let key = key.into();
        match self.position(key.as_str()) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, config)),
            None => {
                self.entries.push((key, config));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<ItemConfig> {
        let i = self.position(key)?;
        Some(self.entries.remove(i).1)
    }

    /// Move the given keys to the front, in the given order.
    ///
    /// Unknown keys are ignored; all other items keep their relative order.
    pub fn reorder<'a>(&mut self, front: impl IntoIterator<Item = &'a str>) {
        let mut head = Vec::new();
        for key in front {
            if let Some(i) = self.position(key) {
                head.push(self.entries.remove(i));
            }
        }
        head.append(&mut self.entries);
        self.entries = head;
    }

    pub fn set_max_inventory(&mut self, key: &str, value: f64) -> DomainResult<()> {
        let value = finite("max_inventory", value)?;
        self.config_mut(key)?.max_inventory = value;
        Ok(())
    }

    pub fn set_flat_daily_consumption(&mut self, key: &str, value: f64) -> DomainResult<()> {
        let value = finite("flat_daily_consumption", value)?;
        self.config_mut(key)?.flat_daily_consumption = value;
        Ok(())
    }

    pub fn set_usage_per_thousand(&mut self, key: &str, value: f64) -> DomainResult<()> {
        let value = finite("usage_per_thousand_sales", value)?;
        self.config_mut(key)?.usage_per_thousand_sales = value;
        Ok(())
    }

    /// Derive the usage-per-thousand rate from usage on a slow sales day.
    pub fn set_rate_from_min(&mut self, key: &str, slow_day_usage: f64) -> DomainResult<()> {
        let usage = if slow_day_usage.is_finite() { slow_day_usage } else { 0.0 };
        self.set_usage_per_thousand(key, usage / SLOW_DAY_SALES_THOUSANDS)
    }

    /// Derive the usage-per-thousand rate from usage on a busy sales day.
    pub fn set_rate_from_max(&mut self, key: &str, busy_day_usage: f64) -> DomainResult<()> {
        let usage = if busy_day_usage.is_finite() { busy_day_usage } else { 0.0 };
        self.set_usage_per_thousand(key, usage / BUSY_DAY_SALES_THOUSANDS)
    }

    /// Add every key of `defaults` that this catalog lacks, without touching
    /// existing values. Returns how many items were added.
    pub fn merge_defaults(&mut self, defaults: &ItemCatalog) -> usize {
        let mut added = 0;
        for (key, config) in defaults.iter() {
            if !self.contains(key.as_str()) {
                self.entries.push((key.clone(), *config));
                added += 1;
            }
        }
        added
    }

    /// Find the catalog key an export name refers to.
    ///
    /// A key matches when the lower-cased name contains the lower-cased key.
    /// "black beans" and "pinto beans" also match names containing both words
    /// anywhere (e.g. `"Beans, Black 50#"`). The first match in catalog order
    /// wins.
    pub fn find_match(&self, csv_name: &str) -> Option<&ItemKey> {
        let name = csv_name.to_lowercase();
        self.keys().find(|key| {
            let key = key.as_str().to_lowercase();
            name.contains(&key)
                || (key == "black beans" && name.contains("black") && name.contains("beans"))
                || (key == "pinto beans" && name.contains("pinto") && name.contains("beans"))
        })
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.as_str() == key)
    }

    fn config_mut(&mut self, key: &str) -> DomainResult<&mut ItemConfig> {
        match self.position(key) {
            Some(i) => Ok(&mut self.entries[i].1),
            None => Err(DomainError::not_found(format!("catalog item {key:?}"))),
        }
    }
}

fn finite(field: &str, value: f64) -> DomainResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::validation(format!("{field} must be a finite number")))
    }
}

impl FromIterator<(ItemKey, ItemConfig)> for ItemCatalog {
    fn from_iter<T: IntoIterator<Item = (ItemKey, ItemConfig)>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for (key, config) in iter {
            catalog.insert(key, config);
        }
        catalog
    }
}

// Persisted as a JSON object keyed by item; object order is catalog order.
impl Serialize for ItemCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, config) in &self.entries {
            map.serialize_entry(key, config)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ItemCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = ItemCatalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of item name to item config")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut catalog = ItemCatalog::new();
                while let Some((key, config)) = access.next_entry::<ItemKey, ItemConfig>()? {
                    catalog.insert(key, config);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}
