//! Standard catalog for a new store.

use crate::catalog::{ItemCatalog, ItemConfig, ItemKey};

/// `(key, max inventory, flat daily consumption, usage per thousand sales)`.
const DEFAULT_ITEMS: [(&str, f64, f64, f64); 27] = [
    ("Limes, 40#", 2.0, 0.2, 0.0250),
    ("Lettuce", 9.0, 2.5, 0.2059),
    ("Cilantro", 16.0, 4.0, 0.3235),
    ("Chicken", 28.0, 6.0, 0.4441),
    ("Steak", 9.0, 2.5, 0.1471),
    ("Carnitas", 4.0, 1.0, 0.0),
    ("Barbacoa", 4.0, 1.0, 0.0),
    ("Chips Pre-Cut, Unfried", 4.0, 2.0, 0.0),
    ("Adobo Marinade 30 lb", 2.0, 0.33, 0.0100),
    ("Queso", 2.0, 1.0, 0.0800),
    ("Sofritas", 2.0, 0.5, 0.0353),
    ("Lemon/Lime Juice", 3.0, 0.5, 0.0735),
    ("Cheese", 6.0, 2.0, 0.1294),
    ("Corn w/ Poblano Mix", 12.0, 3.5, 0.2600),
    ("Bell Peppers", 10.0, 2.5, 0.1824),
    ("Tomato", 21.0, 5.0, 0.3824),
    ("Avocados", 27.0, 6.0, 0.5200),
    ("Burrito Size Tortilla 144 ct", 10.0, 2.5, 0.1765),
    ("Flour Tortilla", 2.0, 0.5, 0.0300),
    ("Taco Size Crispy Corn Tortilla PF, 240 ct", 2.0, 0.3, 0.0235),
    ("Black beans", 9.0, 1.5, 0.1765),
    ("Pinto beans", 9.0, 1.0, 0.1500),
    ("Sour Cream", 8.0, 2.0, 0.1588),
    ("Red Tomatillo Salsa 40 lb", 4.0, 1.5, 0.0941),
    ("Green Tomatillo Salsa, Finished, 40lbs", 6.0, 2.0, 0.0882),
    ("Clementine Oranges", 2.0, 0.3, 0.0147),
    ("Jalapeno Peppers, 10lb", 4.0, 1.0, 0.1029),
];

impl ItemCatalog {
    /// The standard items, in their canonical order.
    pub fn defaults() -> Self {
        DEFAULT_ITEMS
            .iter()
            .map(|&(key, max, flat, upt)| (ItemKey::from(key), ItemConfig::new(max, flat, upt)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete_and_ordered() {
        let catalog = ItemCatalog::defaults();
        assert_eq!(catalog.len(), 27);
        assert_eq!(catalog.keys().next().map(ItemKey::as_str), Some("Limes, 40#"));
        assert_eq!(catalog.keys().last().map(ItemKey::as_str), Some("Jalapeno Peppers, 10lb"));
        assert_eq!(catalog.get("Black beans"), Some(&ItemConfig::new(9.0, 1.5, 0.1765)));
    }
}
