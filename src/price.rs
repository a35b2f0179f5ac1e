//! Price text normalization for cross-store ordering.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Ordering key for prices that could not be read. Sorts after any real price.
pub const UNKNOWN_PRICE: f64 = 99999.0;

static PRICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+[.,]?\d*)").expect("price pattern is valid"));

/// Parses free-form price text ("€19,99", "$ 4.99 USD") into a sortable number.
///
/// Every comma is read as a decimal point, so "1,234" becomes 1.234 rather
/// than 1234. Text without a digit run yields [`UNKNOWN_PRICE`].
pub fn parse_price(raw: &str) -> f64 {
    let normalized = raw.replace(',', ".");

    PRICE_NUMBER
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(UNKNOWN_PRICE)
}
