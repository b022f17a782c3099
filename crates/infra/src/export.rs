//! CSV export of verification results.

use std::io::Write;

use serde::Serialize;

use walkin_inventory::{EvaluatedItem, ResultSet};

use crate::error::StoreError;

#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    #[serde(rename = "Item")]
    name: &'a str,
    #[serde(rename = "Matched Key")]
    matched_key: &'a str,
    #[serde(rename = "On Hand")]
    on_hand: f64,
    #[serde(rename = "In Transit")]
    in_transit: f64,
    #[serde(rename = "Amount To Order")]
    amount_to_order: f64,
    #[serde(rename = "Estimated Inventory")]
    estimated_inventory: String,
    #[serde(rename = "Diff")]
    diff: String,
    #[serde(rename = "Status")]
    status: &'static str,
}

impl<'a> From<&'a EvaluatedItem> for ExportRecord<'a> {
    fn from(item: &'a EvaluatedItem) -> Self {
        Self {
            name: &item.name,
            matched_key: item.matched_key.as_str(),
            on_hand: item.on_hand,
            in_transit: item.in_transit,
            amount_to_order: item.amount_to_order,
            estimated_inventory: format!("{:.2}", item.estimated_inventory),
            diff: format!("{:.2}", item.diff),
            status: item.status.label(),
        }
    }
}

/// Write results, in their current order, as CSV with a header row.
pub fn export_results<W: Write>(writer: W, results: &ResultSet) -> Result<(), StoreError> {
    let mut csv = csv::Writer::from_writer(writer);
    for item in results.items() {
        csv.serialize(ExportRecord::from(item))?;
    }
    csv.flush().map_err(|e| StoreError::io("<export>", e))?;
    Ok(())
}
