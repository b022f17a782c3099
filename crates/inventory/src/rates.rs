//! Usage-rate import from a usage report export.
//!
//! The usage report shares the inventory export's line format, but column 5
//! carries usage per thousand sales. Some items are reported in pounds and are
//! converted to cases.

use serde::{Deserialize, Serialize};

use crate::catalog::{EXCLUDED_ROW_MARKER, ItemCatalog, ItemKey};
use crate::number::parse_number;
use crate::parser::{non_blank_lines, tokenize_line};
use crate::projection::round_to;

const MIN_RATE_COLUMNS: usize = 6;
const NAME_COLUMN: usize = 2;
const RATE_COLUMN: usize = 5;

/// Header marker of the usage report.
const HEADER_MARKER: &str = "Ing. Desc.";

/// Pounds per case, by lower-case name fragment. First hit wins.
const POUNDS_PER_CASE: [(&str, f64); 7] = [
    ("cheese", 42.0),
    ("chicken", 44.0),
    ("limes", 40.0),
    ("steak", 40.0),
    ("carnitas", 40.0),
    ("barbacoa", 40.0),
    ("chips", 32.0),
];

/// Supplier naming variants mapped to catalog names. Later rules override
/// earlier ones.
const NAME_ALIASES: [(&[&str], &str); 8] = [
    (&["beans", "black"], "Black beans"),
    (&["beans", "pinto"], "Pinto beans"),
    (&["jalapeno"], "Jalapeno Peppers, 10lb"),
    (&["corn", "poblano"], "Corn w/ Poblano Mix"),
    (&["green", "tomatillo"], "Green Tomatillo Salsa, Finished, 40lbs"),
    (&["red", "tomatillo"], "Red Tomatillo Salsa 40 lb"),
    (&["taco", "corn"], "Taco Size Crispy Corn Tortilla PF, 240 ct"),
    (&["burrito", "tortilla"], "Burrito Size Tortilla 144 ct"),
];

/// Outcome of a rate import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RatesImportSummary {
    pub updated: usize,
    pub skipped: usize,
}

/// Parse a rate value; accounting parentheses mean negative.
pub fn parse_rate(raw: &str) -> Option<f64> {
    if raw.contains('(') {
        let inner: String = raw.chars().filter(|c| !matches!(c, '(' | ')')).collect();
        return parse_number(&format!("-{inner}"));
    }
    parse_number(raw)
}

/// Convert a pound-based rate to cases for items reported by weight.
pub fn convert_units(name: &str, value: f64) -> f64 {
    let lower = name.to_lowercase();
    POUNDS_PER_CASE
        .iter()
        .find(|(fragment, _)| lower.contains(fragment))
        .map(|(_, pounds)| round_to(value / pounds, 4))
        .unwrap_or(value)
}

/// Resolve a usage report name to a catalog key.
///
/// Known naming variants are normalised first; then the first key (catalog
/// order) that contains, or is contained in, the name wins.
pub fn match_rate_key<'a>(catalog: &'a ItemCatalog, name: &str) -> Option<&'a ItemKey> {
    let lower = name.to_lowercase();
    let search = NAME_ALIASES
        .iter()
        .rev()
        .find(|(words, _)| words.iter().all(|w| lower.contains(w)))
        .map(|(_, alias)| alias.to_lowercase())
        .unwrap_or(lower);

    catalog.keys().find(|key| {
        let key = key.as_str().to_lowercase();
        search.contains(&key) || key.contains(&search)
    })
}

/// Apply a usage report to the catalog's usage-per-thousand rates.
pub fn import_usage_rates(text: &str, catalog: &mut ItemCatalog) -> RatesImportSummary {
    let mut summary = RatesImportSummary::default();

    for line in non_blank_lines(text) {
        let cols = tokenize_line(line);
        if cols.len() < MIN_RATE_COLUMNS {
            summary.skipped += 1;
            continue;
        }

        let name = &cols[NAME_COLUMN];
        if name.contains(EXCLUDED_ROW_MARKER) || name.contains(HEADER_MARKER) {
            summary.skipped += 1;
            continue;
        }

        let Some(value) = parse_rate(&cols[RATE_COLUMN]).map(|v| convert_units(name, v)) else {
            summary.skipped += 1;
            continue;
        };
        let Some(key) = match_rate_key(catalog, name).map(|k| k.as_str().to_string()) else {
            tracing::debug!(name = %name, "usage rate has no catalog item");
            summary.skipped += 1;
            continue;
        };

        match catalog.set_usage_per_thousand(&key, value) {
            Ok(()) => summary.updated += 1,
            Err(err) => {
                tracing::debug!(name = %name, error = %err, "usage rate rejected");
                summary.skipped += 1;
            }
        }
    }

    tracing::info!(updated = summary.updated, skipped = summary.skipped, "imported usage rates");
    summary
}
