//! Walk-in inventory order verification.
//!
//! This crate contains the order-verification rules, implemented purely as
//! deterministic logic (no file, network or clock access): callers hand in
//! decoded export text, a catalog snapshot, a sales calendar and the two
//! calendar dates, and get a classified, sortable result set back.

pub mod calendar;
pub mod catalog;
pub mod defaults;
pub mod evaluator;
pub mod number;
pub mod parser;
pub mod projection;
pub mod rates;
pub mod report;
pub mod result_set;
pub mod verification;

pub use calendar::{SalesProjectionCalendar, WEEKDAY_NAMES, parse_weekday, weekday_name, weekday_name_of};
pub use catalog::{ItemCatalog, ItemConfig, ItemKey, is_excluded_row};
pub use evaluator::{EvaluatedItem, OrderEvaluator, OrderStatus};
pub use parser::{InventoryRow, parse_inventory, tokenize_line};
pub use projection::{UsageProjector, apply_projected_usage};
pub use rates::{RatesImportSummary, import_usage_rates};
pub use report::{ReportLine, VerificationReport};
pub use result_set::{ResultSet, SortDirection, SortField};
pub use verification::{VerificationError, verify};
