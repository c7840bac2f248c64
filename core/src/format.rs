// vitrina/src/format.rs

//! Display formatting for catalog cards: US-style currency and short dates.

use chrono::DateTime;

/// Formats a price as `$1,234.50`.
pub fn format_price(price: f64) -> String {
  let cents = (price * 100.0).round() as i64;
  let negative = cents < 0;
  let cents = cents.abs();
  let whole = (cents / 100).to_string();
  let frac = cents % 100;

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, ch) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }

  let sign = if negative { "-" } else { "" };
  format!("{}${}.{:02}", sign, grouped, frac)
}

/// Formats an ISO-8601 timestamp as `Jan 5, 2026`. A string that does not
/// parse is shown as-is rather than hiding the card behind an error.
pub fn format_date(iso: &str) -> String {
  match DateTime::parse_from_rfc3339(iso) {
    Ok(dt) => dt.format("%b %-d, %Y").to_string(),
    Err(_) => iso.to_string(),
  }
}
