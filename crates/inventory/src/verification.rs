//! One order-verification run: export text in, sorted results out.

use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::{SalesProjectionCalendar, weekday_name_of};
use crate::catalog::ItemCatalog;
use crate::evaluator::{OrderEvaluator, days_between};
use crate::parser::parse_inventory;
use crate::result_set::ResultSet;

/// Reportable outcomes of a run that produce no result table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// No export was supplied.
    #[error("Please upload a CSV file first.")]
    MissingInput,

    /// Nothing in the export matched the catalog.
    #[error("No matching items found. Please check item names in Settings.")]
    NoMatchingItems { parsed_rows: usize },
}

/// Verify an inventory export against the catalog for a shipment date.
///
/// `current` and `shipment` are calendar days; time of day is the caller's
/// concern. The catalog and calendar are read-only snapshots.
pub fn verify(
    input: Option<&str>,
    catalog: &ItemCatalog,
    calendar: &SalesProjectionCalendar,
    current: NaiveDate,
    shipment: NaiveDate,
) -> Result<ResultSet, VerificationError> {
    let text = input.ok_or(VerificationError::MissingInput)?;
    let rows = parse_inventory(text);

    let evaluator = OrderEvaluator::new(catalog, calendar);
    let items: Vec<_> = rows
        .iter()
        .filter_map(|row| evaluator.evaluate(row, current, shipment))
        .collect();

    if items.is_empty() {
        tracing::info!(parsed_rows = rows.len(), "no export rows matched the catalog");
        return Err(VerificationError::NoMatchingItems {
            parsed_rows: rows.len(),
        });
    }

    let results = ResultSet::new(items);
    tracing::info!(
        shipment_day = weekday_name_of(shipment),
        days_until_shipment = days_between(current, shipment),
        parsed_rows = rows.len(),
        matched = results.len(),
        over = results.over_count(),
        under = results.under_count(),
        "verified inventory order"
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ItemConfig, ItemKey};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn missing_input_is_a_precondition_failure() {
        let catalog = ItemCatalog::defaults();
        let calendar = SalesProjectionCalendar::defaults();
        let err = verify(None, &catalog, &calendar, today(), today()).unwrap_err();
        assert_eq!(err, VerificationError::MissingInput);
    }

    #[test]
    fn no_matches_is_reported() {
        let catalog: ItemCatalog = [(ItemKey::from("Chicken"), ItemConfig::new(28.0, 6.0, 0.0))]
            .into_iter()
            .collect();
        let calendar = SalesProjectionCalendar::defaults();
        let text = "1,Dry,Napkins,4,0,CS,2,1\n1,Dry,Forks,4,0,CS,2,1";
        let err = verify(Some(text), &catalog, &calendar, today(), today()).unwrap_err();
        assert_eq!(err, VerificationError::NoMatchingItems { parsed_rows: 2 });
        assert!(err.to_string().contains("check item names in Settings"));
    }
}
