//! Full verification runs over realistic exports.

use chrono::NaiveDate;

use walkin_inventory::{
    ItemCatalog, ItemConfig, ItemKey, OrderStatus, SalesProjectionCalendar, SortField,
    VerificationError, apply_projected_usage, import_usage_rates, verify,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const EXPORT: &str = "\
Store #,Category,Description,On Hand,In Transit,Unit,Par,Order Qty\r\n\
4410,Produce,\"Limes, 40# Case\",1,0,CS,2,1\r\n\
4410,Produce,Avocados Hass 48ct,4,2,CS,27,20\r\n\
4410,Dry,\"Beans, Black 50#\",9,0,CS,9,0\r\n\
4410,Dry,\"Corn w/ Poblano Mix, 20lb\",0,0,CS,12,4\r\n\
4410,Dry,Corn w/ Poblano Mix 5lb,1,0,CS,12,14\r\n\
4410,Paper,Napkins,20,0,CS,10,2\r\n\
4410,Dairy,Queso Blanco,0,0,CS,2,0\r\n\
,,,,,,,\r\n\
Report Total,,,,,,,\r\n";

#[test]
fn default_catalog_run_classifies_and_orders_items() {
    let catalog = ItemCatalog::defaults();
    let calendar = SalesProjectionCalendar::defaults();
    // Monday count, Wednesday shipment.
    let results = verify(Some(EXPORT), &catalog, &calendar, date(2024, 3, 4), date(2024, 3, 6))
        .expect("rows should match");

    let names: Vec<_> = results.items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Corn w/ Poblano Mix 5lb",
            "Queso Blanco",
            "Avocados Hass 48ct",
            "Beans, Black 50#",
            "Limes, 40# Case",
        ]
    );

    let corn = &results.items()[0];
    assert_eq!(corn.status, OrderStatus::Over);
    assert_eq!(corn.matched_key.as_str(), "Corn w/ Poblano Mix");

    let queso = &results.items()[1];
    assert_eq!(queso.status, OrderStatus::Under);
    assert_eq!(queso.estimated_inventory, 0.0);

    let beans = &results.items()[3];
    assert_eq!(beans.matched_key.as_str(), "Black beans");
    assert_eq!(beans.status, OrderStatus::Ok);

    assert_eq!(results.issue_count(), 2);
    assert_eq!(results.summary(date(2024, 3, 6)), "Wednesday Shipment \u{2022} 2 Issues Found");
}

#[test]
fn limes_with_flat_calendar_matches_hand_calculation() {
    let catalog: ItemCatalog = [(ItemKey::from("Limes, 40#"), ItemConfig::new(2.0, 0.2, 0.025))]
        .into_iter()
        .collect();
    let calendar = SalesProjectionCalendar::zero();
    let today = date(2024, 3, 4);

    let results = verify(
        Some("1,Produce,Limes, 40# Case,1,0,CS,2,0"),
        &catalog,
        &calendar,
        today,
        today,
    );
    // Unquoted comma splits the name into "Limes", which matches no key.
    assert!(matches!(results, Err(VerificationError::NoMatchingItems { parsed_rows: 1 })));

    let results = verify(
        Some("1,Produce,\"Limes, 40# Case\",1,0,CS,2,0"),
        &catalog,
        &calendar,
        today,
        today,
    )
    .unwrap();
    let limes = &results.items()[0];
    assert_eq!(limes.estimated_inventory, 1.0);
    assert_eq!(limes.diff, 1.0);
    assert_eq!(limes.status, OrderStatus::Ok);
}

#[test]
fn resorting_keeps_all_rows() {
    let catalog = ItemCatalog::defaults();
    let calendar = SalesProjectionCalendar::defaults();
    let mut results =
        verify(Some(EXPORT), &catalog, &calendar, date(2024, 3, 4), date(2024, 3, 8)).unwrap();

    results.sort_by(SortField::Diff);
    let diffs: Vec<f64> = results.items().iter().map(|i| i.diff).collect();
    assert!(diffs.windows(2).all(|w| w[0] <= w[1]));

    results.sort_by(SortField::Diff);
    let diffs: Vec<f64> = results.items().iter().map(|i| i.diff).collect();
    assert!(diffs.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(results.len(), 5);
}

#[test]
fn imported_rates_feed_the_next_run() {
    let mut catalog = ItemCatalog::defaults();
    let calendar = SalesProjectionCalendar::defaults();

    let usage_report = "1,Protein,Carnitas,LB,0,40\n";
    let summary = import_usage_rates(usage_report, &mut catalog);
    assert_eq!(summary.updated, 1);
    assert_eq!(catalog.get("Carnitas").unwrap().usage_per_thousand_sales, 1.0);

    // Thursday: 12000 sales -> 12 cases per day.
    apply_projected_usage(&mut catalog, &calendar, date(2024, 3, 7));
    assert_eq!(catalog.get("Carnitas").unwrap().flat_daily_consumption, 12.0);

    // Mon + Tue at 10000 each -> 20 cases projected, capped at 15 available.
    let results = verify(
        Some("1,Protein,Carnitas,15,0,CS,4,4"),
        &catalog,
        &calendar,
        date(2024, 3, 4),
        date(2024, 3, 6),
    )
    .unwrap();
    assert_eq!(results.items()[0].estimated_inventory, 4.0);
    assert_eq!(results.items()[0].status, OrderStatus::Ok);
}
