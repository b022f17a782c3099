//! Lenient numeric parsing for supplier exports.
//!
//! Exports carry quantities like `"12 cs"` or `"3.5lb"`; only the leading
//! numeric prefix counts. A field with no numeric prefix is not-a-number, and
//! callers decide the default.

/// Parse the leading decimal number of `raw`.
///
/// Leading whitespace is skipped, then an optional sign, digits with an
/// optional fraction, and an optional exponent. Anything after the number is
/// ignored. Returns `None` when no digits are found.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when it is complete ("1e" parses as 1).
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Parse a quantity, defaulting to `0.0` when the field is not numeric.
pub fn parse_quantity(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}
