//! Ordered collection of evaluated items with table-style re-sorting.

use core::cmp::Ordering;
use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use walkin_core::DomainError;

use crate::calendar::weekday_name_of;
use crate::evaluator::{EvaluatedItem, OrderStatus};

/// Sortable column of the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    MatchedKey,
    OnHand,
    InTransit,
    AmountToOrder,
    EstimatedInventory,
    Diff,
    IsOver,
    IsUnder,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        SortField::Name,
        SortField::MatchedKey,
        SortField::OnHand,
        SortField::InTransit,
        SortField::AmountToOrder,
        SortField::EstimatedInventory,
        SortField::Diff,
        SortField::IsOver,
        SortField::IsUnder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::MatchedKey => "matched_key",
            SortField::OnHand => "on_hand",
            SortField::InTransit => "in_transit",
            SortField::AmountToOrder => "amount_to_order",
            SortField::EstimatedInventory => "estimated_inventory",
            SortField::Diff => "diff",
            SortField::IsOver => "is_over",
            SortField::IsUnder => "is_under",
        }
    }

    fn value(self, item: &EvaluatedItem) -> SortValue<'_> {
        match self {
            SortField::Name => SortValue::Text(&item.name),
            SortField::MatchedKey => SortValue::Text(item.matched_key.as_str()),
            SortField::OnHand => SortValue::Number(item.on_hand),
            SortField::InTransit => SortValue::Number(item.in_transit),
            SortField::AmountToOrder => SortValue::Number(item.amount_to_order),
            SortField::EstimatedInventory => SortValue::Number(item.estimated_inventory),
            SortField::Diff => SortValue::Number(item.diff),
            SortField::IsOver => SortValue::Flag(item.is_over()),
            SortField::IsUnder => SortValue::Flag(item.is_under()),
        }
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| DomainError::validation(format!("unknown sort field {s:?}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
    Flag(bool),
}

impl SortValue<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Flag(a), SortValue::Flag(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Dictionary-style comparison: letters compare case-insensitively first,
/// and lower case sorts before upper case only to break exact ties.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| {
        a.chars()
            .zip(b.chars())
            .find(|(x, y)| x != y)
            .map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => x.cmp(&y),
            })
            .unwrap_or(Ordering::Equal)
    })
}

fn default_order(a: &EvaluatedItem, b: &EvaluatedItem) -> Ordering {
    a.status
        .priority()
        .cmp(&b.status.priority())
        .then_with(|| compare_text(&a.name, &b.name))
}

/// Evaluated items of one verification run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultSet {
    items: Vec<EvaluatedItem>,
    #[serde(skip)]
    sort: Option<(SortField, SortDirection)>,
}

impl ResultSet {
    /// Build a result set in default order: over-orders, under-orders, then OK,
    /// each group by name.
    pub fn new(mut items: Vec<EvaluatedItem>) -> Self {
        items.sort_by(default_order);
        Self { items, sort: None }
    }

    pub fn items(&self) -> &[EvaluatedItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<EvaluatedItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current explicit sort, if any (`None` means default order).
    pub fn current_sort(&self) -> Option<(SortField, SortDirection)> {
        self.sort
    }

    /// Sort by `field` like a clickable table header: requesting the same
    /// field again flips the direction, a new field starts ascending.
    pub fn sort_by(&mut self, field: SortField) -> SortDirection {
        let direction = match self.sort {
            Some((current, direction)) if current == field => direction.toggled(),
            _ => SortDirection::Ascending,
        };
        self.sort_by_direction(field, direction);
        direction
    }

    /// Sort by `field` in an explicit direction.
    pub fn sort_by_direction(&mut self, field: SortField, direction: SortDirection) {
        self.items
            .sort_by(|a, b| direction.apply(field.value(a).compare(&field.value(b))));
        self.sort = Some((field, direction));
    }

    /// Restore the default priority order.
    pub fn reset_sort(&mut self) {
        self.items.sort_by(default_order);
        self.sort = None;
    }

    pub fn over_count(&self) -> usize {
        self.count(OrderStatus::Over)
    }

    pub fn under_count(&self) -> usize {
        self.count(OrderStatus::Under)
    }

    pub fn issue_count(&self) -> usize {
        self.items.iter().filter(|i| i.status.is_issue()).count()
    }

    /// One-line run summary, e.g. `"Friday Shipment • 2 Issues Found"`.
    pub fn summary(&self, shipment: NaiveDate) -> String {
        let issues = self.issue_count();
        let plural = if issues == 1 { "" } else { "s" };
        format!(
            "{} Shipment \u{2022} {issues} Issue{plural} Found",
            weekday_name_of(shipment)
        )
    }

    fn count(&self, status: OrderStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemKey;

    fn item(name: &str, status: OrderStatus, diff: f64) -> EvaluatedItem {
        EvaluatedItem {
            name: name.to_string(),
            on_hand: 1.0,
            in_transit: 0.0,
            amount_to_order: 0.0,
            matched_key: ItemKey::from(name),
            estimated_inventory: 1.0,
            diff,
            status,
        }
    }

    fn names(set: &ResultSet) -> Vec<&str> {
        set.items().iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn default_order_groups_by_status_then_name() {
        let set = ResultSet::new(vec![
            item("Avocados", OrderStatus::Ok, 0.0),
            item("Zucchini", OrderStatus::Over, -2.0),
            item("Cheese", OrderStatus::Under, 3.0),
            item("apples", OrderStatus::Over, -1.0),
        ]);
        assert_eq!(names(&set), ["apples", "Zucchini", "Cheese", "Avocados"]);
    }

    #[test]
    fn status_beats_name_in_default_order() {
        let set = ResultSet::new(vec![
            item("A", OrderStatus::Ok, 0.0),
            item("A", OrderStatus::Under, 0.0),
            item("A", OrderStatus::Over, 0.0),
        ]);
        let statuses: Vec<_> = set.items().iter().map(|i| i.status).collect();
        assert_eq!(statuses, [OrderStatus::Over, OrderStatus::Under, OrderStatus::Ok]);
    }

    #[test]
    fn same_field_twice_toggles_direction() {
        let mut set = ResultSet::new(vec![
            item("B", OrderStatus::Ok, 2.0),
            item("A", OrderStatus::Ok, -1.0),
            item("C", OrderStatus::Ok, 5.0),
        ]);
        assert_eq!(set.sort_by(SortField::Diff), SortDirection::Ascending);
        assert_eq!(names(&set), ["A", "B", "C"]);
        assert_eq!(set.sort_by(SortField::Diff), SortDirection::Descending);
        assert_eq!(names(&set), ["C", "B", "A"]);
        assert_eq!(set.sort_by(SortField::Name), SortDirection::Ascending);
        assert_eq!(names(&set), ["A", "B", "C"]);
        assert_eq!(set.current_sort(), Some((SortField::Name, SortDirection::Ascending)));
    }

    #[test]
    fn nan_diffs_sort_deterministically() {
        let mut set = ResultSet::new(vec![
            item("B", OrderStatus::Ok, f64::NAN),
            item("A", OrderStatus::Ok, 1.0),
            item("C", OrderStatus::Ok, f64::NAN),
            item("D", OrderStatus::Ok, -4.0),
            item("E", OrderStatus::Ok, f64::INFINITY),
        ]);
        set.sort_by(SortField::Diff);
        assert_eq!(names(&set), ["D", "A", "E", "B", "C"]);
        set.sort_by(SortField::Diff);
        assert_eq!(names(&set), ["B", "C", "E", "A", "D"]);
    }

    #[test]
    fn flags_sort_false_before_true_ascending() {
        let mut set = ResultSet::new(vec![
            item("Over", OrderStatus::Over, -3.0),
            item("Fine", OrderStatus::Ok, 0.0),
        ]);
        set.sort_by(SortField::IsOver);
        assert_eq!(names(&set), ["Fine", "Over"]);
        set.sort_by(SortField::IsOver);
        assert_eq!(names(&set), ["Over", "Fine"]);
        set.reset_sort();
        assert_eq!(names(&set), ["Over", "Fine"]);
        assert_eq!(set.current_sort(), None);
    }

    #[test]
    fn text_compare_folds_case() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("a", "A"), Ordering::Less);
        assert_eq!(compare_text("Queso", "queso"), Ordering::Greater);
        assert_eq!(compare_text("Steak", "Steak"), Ordering::Equal);
    }

    #[test]
    fn summary_counts_issues() {
        let shipment = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let set = ResultSet::new(vec![
            item("A", OrderStatus::Over, -2.0),
            item("B", OrderStatus::Ok, 0.0),
        ]);
        assert_eq!(set.summary(shipment), "Friday Shipment \u{2022} 1 Issue Found");

        let set = ResultSet::new(vec![
            item("A", OrderStatus::Over, -2.0),
            item("B", OrderStatus::Under, 4.0),
        ]);
        assert_eq!(set.over_count(), 1);
        assert_eq!(set.under_count(), 1);
        assert_eq!(set.summary(shipment), "Friday Shipment \u{2022} 2 Issues Found");
        assert_eq!(ResultSet::default().summary(shipment), "Friday Shipment \u{2022} 0 Issues Found");
    }

    #[test]
    fn sort_field_parses_from_cli_names() {
        assert_eq!("estimated-inventory".parse::<SortField>().unwrap(), SortField::EstimatedInventory);
        assert_eq!("Diff".parse::<SortField>().unwrap(), SortField::Diff);
        assert!("status".parse::<SortField>().is_err());
    }
}
