//! Sales-driven usage projection.

use chrono::{Days, NaiveDate};

use crate::calendar::{SalesProjectionCalendar, weekday_name_of};
use crate::catalog::ItemCatalog;

/// Projects item usage from the weekly sales calendar.
#[derive(Debug, Clone, Copy)]
pub struct UsageProjector<'a> {
    catalog: &'a ItemCatalog,
    calendar: &'a SalesProjectionCalendar,
}

impl<'a> UsageProjector<'a> {
    pub fn new(catalog: &'a ItemCatalog, calendar: &'a SalesProjectionCalendar) -> Self {
        Self { catalog, calendar }
    }

    /// Usage of `item_key` over the days in `[start, end)`.
    ///
    /// Each day contributes `sales(weekday) / 1000 * usage_per_thousand`.
    /// Returns `0.0` when the item has no usage-per-thousand rate (zero,
    /// absent, or NaN); callers treat that as "no rate configured" and fall
    /// back to the flat daily consumption.
    pub fn project_usage(&self, item_key: &str, start: NaiveDate, end: NaiveDate) -> f64 {
        let rate = self
            .catalog
            .get(item_key)
            .map(|c| c.usage_per_thousand_sales)
            .unwrap_or(0.0);
        if rate == 0.0 || rate.is_nan() {
            return 0.0;
        }

        let mut total = 0.0;
        let mut day = start;
        while day < end {
            total += self.calendar.for_date(day) / 1000.0 * rate;
            tracing::trace!(item = item_key, day = weekday_name_of(day), total, "projected day");
            day = match day.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
        }
        total
    }
}

/// Recompute every item's flat daily consumption from today's projected sales.
///
/// `flat = round2(usage_per_thousand * sales(today) / 1000)`. Returns the
/// number of items updated.
pub fn apply_projected_usage(
    catalog: &mut ItemCatalog,
    calendar: &SalesProjectionCalendar,
    today: NaiveDate,
) -> usize {
    let multiplier = calendar.for_date(today) / 1000.0;
    let keys: Vec<String> = catalog.keys().map(|k| k.as_str().to_string()).collect();

    let mut updated = 0;
    for key in &keys {
        let rate = catalog
            .get(key)
            .map(|c| c.usage_per_thousand_sales)
            .unwrap_or(0.0);
        let rate = if rate.is_nan() { 0.0 } else { rate };
        let daily = round_to(rate * multiplier, 2);
        if catalog.set_flat_daily_consumption(key, daily).is_ok() {
            updated += 1;
        }
    }

    tracing::info!(
        day = weekday_name_of(today),
        sales = calendar.for_date(today),
        updated,
        "applied projected usage to daily consumption"
    );
    updated
}

/// Round half away from zero to `places` decimals.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
