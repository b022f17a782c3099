//! Inventory export parsing.
//!
//! Supplier exports are loosely formatted: header and footer lines, stray
//! quoting, and blank lines are all common. Parsing is therefore lenient and
//! never fails on an individual line; lines that don't look like item rows are
//! dropped.

use serde::{Deserialize, Serialize};

use crate::number::{parse_number, parse_quantity};

/// Minimum token count for an inventory row (columns 0..=7).
const MIN_INVENTORY_COLUMNS: usize = 8;

const NAME_COLUMN: usize = 2;
const ON_HAND_COLUMN: usize = 3;
const IN_TRANSIT_COLUMN: usize = 4;
const ORDER_COLUMN: usize = 7;

/// One item line of an inventory export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub name: String,
    pub on_hand: f64,
    pub in_transit: f64,
    pub amount_to_order: f64,
}

/// Split text into non-blank lines, accepting `\n` and `\r\n` endings.
pub fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}

/// Tokenize one line on commas, honouring double quotes.
///
/// A `"` toggles quoted mode (commas inside are literal) and is itself
/// dropped. Each token is trimmed of surrounding whitespace.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut token = String::new();
    let mut in_quote = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quote = !in_quote,
            ',' if !in_quote => tokens.push(finish_token(&mut token)),
            _ => token.push(ch),
        }
    }
    tokens.push(finish_token(&mut token));
    tokens
}

fn finish_token(token: &mut String) -> String {
    let taken = std::mem::take(token);
    let trimmed = taken.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Parse an inventory export into item rows, preserving line order.
///
/// A line is kept when it has at least 8 tokens and at least one of the
/// on-hand (col 3) or amount-to-order (col 7) fields is numeric. Non-numeric
/// quantity fields read as zero.
pub fn parse_inventory(text: &str) -> Vec<InventoryRow> {
    let mut rows = Vec::new();

    for (index, line) in non_blank_lines(text).enumerate() {
        let cols = tokenize_line(line);
        if cols.len() < MIN_INVENTORY_COLUMNS {
            tracing::trace!(line = index, columns = cols.len(), "skipping short line");
            continue;
        }
        if parse_number(&cols[ON_HAND_COLUMN]).is_none()
            && parse_number(&cols[ORDER_COLUMN]).is_none()
        {
            tracing::trace!(line = index, "skipping line without quantities");
            continue;
        }

        rows.push(InventoryRow {
            name: cols[NAME_COLUMN].clone(),
            on_hand: parse_quantity(&cols[ON_HAND_COLUMN]),
            in_transit: parse_quantity(&cols[IN_TRANSIT_COLUMN]),
            amount_to_order: parse_quantity(&cols[ORDER_COLUMN]),
        });
    }

    tracing::debug!(rows = rows.len(), "parsed inventory export");
    rows
}
