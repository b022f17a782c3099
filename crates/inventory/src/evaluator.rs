//! Order evaluation: projected stock at shipment and over/under classification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::SalesProjectionCalendar;
use crate::catalog::{ItemCatalog, ItemKey, is_excluded_row};
use crate::parser::InventoryRow;
use crate::projection::UsageProjector;

/// Excess above max inventory tolerated before an order is flagged as over.
pub const OVER_ORDER_TOLERANCE: f64 = 0.5;

/// Projected stock below this level means the item runs out.
pub const RUN_OUT_LEVEL: f64 = 1.0;

/// Flat daily consumption used when an item has none configured.
pub const DEFAULT_FLAT_DAILY_CONSUMPTION: f64 = 1.0;

/// Classification of one evaluated order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Over,
    Under,
    Ok,
}

impl OrderStatus {
    /// Default ordering bucket: over-orders first, then under-orders, then OK.
    pub fn priority(self) -> u8 {
        match self {
            OrderStatus::Over => 0,
            OrderStatus::Under => 1,
            OrderStatus::Ok => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Over => "OVER ORDER",
            OrderStatus::Under => "UNDER ORDER",
            OrderStatus::Ok => "OK",
        }
    }

    pub fn is_issue(self) -> bool {
        self != OrderStatus::Ok
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// An inventory row evaluated against its catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedItem {
    pub name: String,
    pub on_hand: f64,
    pub in_transit: f64,
    pub amount_to_order: f64,
    pub matched_key: ItemKey,
    pub estimated_inventory: f64,
    pub diff: f64,
    pub status: OrderStatus,
}

impl EvaluatedItem {
    pub fn is_over(&self) -> bool {
        self.status == OrderStatus::Over
    }

    pub fn is_under(&self) -> bool {
        self.status == OrderStatus::Under
    }
}

/// Whole days between two dates, regardless of order.
pub fn days_between(current: NaiveDate, shipment: NaiveDate) -> i64 {
    (shipment - current).num_days().abs()
}

/// Evaluates inventory rows against a catalog and sales calendar snapshot.
#[derive(Debug, Clone, Copy)]
pub struct OrderEvaluator<'a> {
    catalog: &'a ItemCatalog,
    projector: UsageProjector<'a>,
}

impl<'a> OrderEvaluator<'a> {
    pub fn new(catalog: &'a ItemCatalog, calendar: &'a SalesProjectionCalendar) -> Self {
        Self {
            catalog,
            projector: UsageProjector::new(catalog, calendar),
        }
    }

    /// Evaluate one row for a shipment arriving on `shipment`.
    ///
    /// Returns `None` for excluded rows and rows with no catalog match.
    pub fn evaluate(
        &self,
        row: &InventoryRow,
        current: NaiveDate,
        shipment: NaiveDate,
    ) -> Option<EvaluatedItem> {
        if is_excluded_row(&row.name) {
            tracing::debug!(name = %row.name, "skipping excluded duplicate row");
            return None;
        }
        let Some(matched_key) = self.catalog.find_match(&row.name) else {
            tracing::debug!(name = %row.name, "no catalog match");
            return None;
        };
        let config = self.catalog.get(matched_key.as_str()).copied().unwrap_or_default();

        let days_until_shipment = days_between(current, shipment) as f64;

        let mut usage = self.projector.project_usage(matched_key.as_str(), current, shipment);
        if usage == 0.0 {
            let flat = config.flat_daily_consumption;
            let flat = if flat == 0.0 || flat.is_nan() {
                DEFAULT_FLAT_DAILY_CONSUMPTION
            } else {
                flat
            };
            usage = flat * days_until_shipment;
        }

        // Only stock on hand or in transit can be used before the shipment lands.
        let available = (row.on_hand + row.in_transit).max(0.0);
        let usage = usage.min(available);

        let estimated_inventory = (available - usage) + row.amount_to_order;

        let mut diff = config.max_inventory - estimated_inventory;
        if row.amount_to_order == 0.0 && diff < 0.0 {
            diff = 0.0;
        }

        let status = if diff < -OVER_ORDER_TOLERANCE {
            OrderStatus::Over
        } else if estimated_inventory < RUN_OUT_LEVEL {
            OrderStatus::Under
        } else {
            OrderStatus::Ok
        };

        Some(EvaluatedItem {
            name: row.name.clone(),
            on_hand: row.on_hand,
            in_transit: row.in_transit,
            amount_to_order: row.amount_to_order,
            matched_key: matched_key.clone(),
            estimated_inventory,
            diff,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(name: &str, on_hand: f64, in_transit: f64, amount_to_order: f64) -> InventoryRow {
        InventoryRow {
            name: name.to_string(),
            on_hand,
            in_transit,
            amount_to_order,
        }
    }

    fn single(key: &str, config: ItemConfig) -> ItemCatalog {
        [(ItemKey::from(key), config)].into_iter().collect()
    }

    #[test]
    fn limes_same_day_is_ok() {
        let catalog = single("Limes, 40#", ItemConfig::new(2.0, 0.2, 0.025));
        let calendar = SalesProjectionCalendar::zero();
        let evaluator = OrderEvaluator::new(&catalog, &calendar);
        let today = date(2024, 3, 4);

        let item = evaluator
            .evaluate(&row("Limes, 40# Case", 1.0, 0.0, 0.0), today, today)
            .unwrap();
        assert_eq!(item.matched_key.as_str(), "Limes, 40#");
        assert_eq!(item.estimated_inventory, 1.0);
        assert_eq!(item.diff, 1.0);
        assert_eq!(item.status, OrderStatus::Ok);
    }

    #[test]
    fn ordering_past_max_is_over() {
        let catalog = single("Queso", ItemConfig::new(2.0, 1.0, 0.0));
        let calendar = SalesProjectionCalendar::zero();
        let evaluator = OrderEvaluator::new(&catalog, &calendar);
        let today = date(2024, 3, 4);

        let item = evaluator.evaluate(&row("Queso", 0.0, 0.0, 5.0), today, today).unwrap();
        assert_eq!(item.estimated_inventory, 5.0);
        assert_eq!(item.diff, -3.0);
        assert_eq!(item.status, OrderStatus::Over);
    }

    #[test]
    fn not_ordering_never_flags_existing_excess() {
        let catalog = single("Queso", ItemConfig::new(2.0, 1.0, 0.0));
        let calendar = SalesProjectionCalendar::zero();
        let evaluator = OrderEvaluator::new(&catalog, &calendar);
        let today = date(2024, 3, 4);

        // Raw diff would be 2 - 5 = -3.
        let item = evaluator.evaluate(&row("Queso", 5.0, 0.0, 0.0), today, today).unwrap();
        assert_eq!(item.diff, 0.0);
        assert_ne!(item.status, OrderStatus::Over);
    }

    #[test]
    fn zero_rate_falls_back_to_flat_consumption() {
        let catalog = single("Carnitas", ItemConfig::new(4.0, 1.5, 0.0));
        let calendar = SalesProjectionCalendar::defaults();
        let evaluator = OrderEvaluator::new(&catalog, &calendar);

        let item = evaluator
            .evaluate(&row("Carnitas", 10.0, 0.0, 0.0), date(2024, 3, 4), date(2024, 3, 6))
            .unwrap();
        // 1.5/day * 2 days = 3 used.
        assert_eq!(item.estimated_inventory, 7.0);
    }

    #[test]
    fn zero_flat_consumption_defaults_to_one_per_day() {
        let catalog = single("Barbacoa", ItemConfig::new(4.0, 0.0, 0.0));
        let calendar = SalesProjectionCalendar::zero();
        let evaluator = OrderEvaluator::new(&catalog, &calendar);

        let item = evaluator
            .evaluate(&row("Barbacoa", 5.0, 0.0, 1.0), date(2024, 3, 4), date(2024, 3, 7))
            .unwrap();
        assert_eq!(item.estimated_inventory, 3.0);
        assert_eq!(item.diff, 1.0);
    }

    #[test]
    fn sales_driven_usage_is_used_when_rate_is_set() {
        let catalog = single("Chicken", ItemConfig::new(28.0, 6.0, 0.5));
        let calendar = SalesProjectionCalendar::defaults();
        let evaluator = OrderEvaluator::new(&catalog, &calendar);

        // Mon 10000 + Tue 10000 -> 10 used.
        let item = evaluator
            .evaluate(&row("Chicken", 15.0, 5.0, 18.0), date(2024, 3, 4), date(2024, 3, 6))
            .unwrap();
        assert!((item.estimated_inventory - 28.0).abs() < 1e-9);
        assert_eq!(item.status, OrderStatus::Ok);
    }

    #[test]
    fn usage_is_capped_by_available_stock() {
        let catalog = single("Cilantro", ItemConfig::new(16.0, 4.0, 0.0));
        let calendar = SalesProjectionCalendar::zero();
        let evaluator = OrderEvaluator::new(&catalog, &calendar);

        let item = evaluator
            .evaluate(&row("Cilantro", 2.0, 1.0, 0.5), date(2024, 3, 1), date(2024, 3, 8))
            .unwrap();
        assert_eq!(item.estimated_inventory, 0.5);
        assert_eq!(item.status, OrderStatus::Under);
    }

    #[test]
    fn negative_stock_counts_as_nothing_available() {
        let catalog = single("Tomato", ItemConfig::new(21.0, 5.0, 0.0));
        let calendar = SalesProjectionCalendar::zero();
        let evaluator = OrderEvaluator::new(&catalog, &calendar);

        let item = evaluator
            .evaluate(&row("Tomato", -3.0, 0.0, 4.0), date(2024, 3, 1), date(2024, 3, 3))
            .unwrap();
        assert_eq!(item.estimated_inventory, 4.0);
        assert_eq!(item.diff, 17.0);
    }

    #[test]
    fn shipment_in_the_past_uses_absolute_day_count() {
        let catalog = single("Lettuce", ItemConfig::new(9.0, 2.0, 0.2));
        let calendar = SalesProjectionCalendar::defaults();
        let evaluator = OrderEvaluator::new(&catalog, &calendar);

        // Projection over a reversed range is 0, so flat 2/day * 3 days applies.
        let item = evaluator
            .evaluate(&row("Lettuce", 8.0, 0.0, 0.0), date(2024, 3, 7), date(2024, 3, 4))
            .unwrap();
        assert_eq!(item.estimated_inventory, 2.0);
    }

    #[test]
    fn small_excess_is_within_tolerance() {
        let catalog = single("Steak", ItemConfig::new(9.0, 1.0, 0.0));
        let calendar = SalesProjectionCalendar::zero();
        let evaluator = OrderEvaluator::new(&catalog, &calendar);
        let today = date(2024, 3, 4);

        let item = evaluator.evaluate(&row("Steak", 4.0, 0.0, 5.5), today, today).unwrap();
        assert_eq!(item.diff, -0.5);
        assert_eq!(item.status, OrderStatus::Ok);
    }

    #[test]
    fn excluded_and_unmatched_rows_are_rejected() {
        let catalog = single("Corn w/ Poblano Mix", ItemConfig::new(12.0, 3.5, 0.26));
        let calendar = SalesProjectionCalendar::zero();
        let evaluator = OrderEvaluator::new(&catalog, &calendar);
        let today = date(2024, 3, 4);

        assert!(evaluator.evaluate(&row("Corn w/ Poblano Mix, 20lb", 1.0, 0.0, 1.0), today, today).is_none());
        assert!(evaluator.evaluate(&row("Paper towels", 1.0, 0.0, 1.0), today, today).is_none());
        assert!(evaluator.evaluate(&row("Corn w/ Poblano Mix, 5lb", 1.0, 0.0, 1.0), today, today).is_some());
    }
}
