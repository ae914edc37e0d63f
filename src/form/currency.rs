//! Display-only amount formatting and per-member totals.

use serde_json::Value;

use crate::calculator::format_with_separators;

/// Fraction digits shown for stored amounts.
const DISPLAY_FRACTION_DIGITS: usize = 10;

/// Format a stored amount for display, e.g. `"1200.5"` -> `"1,200.5"`.
///
/// Separators already present are ignored. Text that is not a number is
/// returned unchanged; an empty field shows as `0`.
pub fn format_currency(raw: &str) -> String {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return "0".to_string();
    }

    match parse_amount(cleaned) {
        Some(value) => {
            let fixed = format!("{:.*}", DISPLAY_FRACTION_DIGITS, value);
            let trimmed = if fixed.contains('.') {
                fixed.trim_end_matches('0').trim_end_matches('.')
            } else {
                fixed.as_str()
            };
            let trimmed = if trimmed == "-0" { "0" } else { trimmed };
            format_with_separators(trimmed)
        }
        None => raw.to_string(),
    }
}

/// Total spend recorded for one member.
///
/// `meal` holds a list of entries with an `amount`; every other field is a
/// single amount. Separators are ignored and unreadable values count as zero.
pub fn member_total(member: &Value) -> f64 {
    let Value::Object(fields) = member else {
        return 0.0;
    };

    fields
        .iter()
        .map(|(key, value)| match (key.as_str(), value) {
            ("meal", Value::Array(entries)) => entries
                .iter()
                .map(|entry| entry.get("amount").map(amount_of).unwrap_or(0.0))
                .sum(),
            _ => amount_of(value),
        })
        .sum()
}

fn amount_of(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_amount(&s.replace(',', "")).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
