//! Plain-text tables for terminal output.

use std::io::{self, Write};

use walkin_inventory::{ItemCatalog, ResultSet, SalesProjectionCalendar};

const RESULT_HEADERS: [&str; 8] = [
    "Item",
    "Matched Key",
    "On Hand",
    "In Transit",
    "Order",
    "Est. Inventory",
    "Diff",
    "Status",
];

fn text_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

/// Results table in the current order, numbers with two decimals.
pub fn write_results<W: Write>(out: &mut W, results: &ResultSet) -> io::Result<()> {
    let items = results.items();
    let name_w = text_width(RESULT_HEADERS[0], items.iter().map(|i| i.name.as_str()));
    let key_w = text_width(RESULT_HEADERS[1], items.iter().map(|i| i.matched_key.as_str()));
    let num_w = RESULT_HEADERS[5].len();

    writeln!(
        out,
        "{:<name_w$}  {:<key_w$}  {:>num_w$}  {:>num_w$}  {:>num_w$}  {:>num_w$}  {:>num_w$}  {}",
        RESULT_HEADERS[0],
        RESULT_HEADERS[1],
        RESULT_HEADERS[2],
        RESULT_HEADERS[3],
        RESULT_HEADERS[4],
        RESULT_HEADERS[5],
        RESULT_HEADERS[6],
        RESULT_HEADERS[7],
    )?;
    for item in items {
        writeln!(
            out,
            "{:<name_w$}  {:<key_w$}  {:>num_w$.2}  {:>num_w$.2}  {:>num_w$.2}  {:>num_w$.2}  {:>num_w$.2}  {}",
            item.name,
            item.matched_key.as_str(),
            item.on_hand,
            item.in_transit,
            item.amount_to_order,
            item.estimated_inventory,
            item.diff,
            item.status,
        )?;
    }
    Ok(())
}

/// Catalog with each item's slow/busy day usage range, then the sales calendar.
pub fn write_settings<W: Write>(
    out: &mut W,
    catalog: &ItemCatalog,
    calendar: &SalesProjectionCalendar,
) -> io::Result<()> {
    let key_w = text_width("Item", catalog.keys().map(|k| k.as_str()));
    writeln!(
        out,
        "{:<key_w$}  {:>8}  {:>8}  {:>8}  {:>15}",
        "Item", "Max", "Flat", "Per $1k", "Usage $10k-$17k"
    )?;
    for (key, config) in catalog.iter() {
        let (slow, busy) = config.usage_range();
        let range = format!("{slow:.2}-{busy:.2}");
        writeln!(
            out,
            "{:<key_w$}  {:>8.2}  {:>8.2}  {:>8.4}  {:>15}",
            key.as_str(),
            config.max_inventory,
            config.flat_daily_consumption,
            config.usage_per_thousand_sales,
            range,
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Projected sales")?;
    for (day, sales) in calendar.days() {
        writeln!(out, "  {day:<9}  {sales:>10.2}")?;
    }
    Ok(())
}
