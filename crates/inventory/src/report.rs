//! Persistable summary of a verification run.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use walkin_core::ReportId;

use crate::result_set::ResultSet;

/// Item name and its distance from max inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    pub name: String,
    pub diff: f64,
}

/// Record of one verification run, kept for later variance review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub report_id: ReportId,
    pub file_name: String,
    pub current_date: NaiveDate,
    pub shipment_date: NaiveDate,
    pub item_count: usize,
    pub items: Vec<ReportLine>,
    pub created_at: DateTime<Utc>,
}

impl VerificationReport {
    pub fn from_results(
        report_id: ReportId,
        file_name: impl Into<String>,
        current_date: NaiveDate,
        shipment_date: NaiveDate,
        results: &ResultSet,
        created_at: DateTime<Utc>,
    ) -> Self {
        let items: Vec<ReportLine> = results
            .items()
            .iter()
            .map(|item| ReportLine {
                name: item.name.clone(),
                diff: item.diff,
            })
            .collect();

        Self {
            report_id,
            file_name: file_name.into(),
            current_date,
            shipment_date,
            item_count: items.len(),
            items,
            created_at,
        }
    }
}
