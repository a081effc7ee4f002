use once_cell::sync::Lazy;
use regex::Regex;

static NUMERAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(\.\d+)?").expect("numeral regex"));

/// Pull the first numeral out of a noisy price string ("$1,299.00", "Rs. 45").
/// Returns infinity when nothing parses, so the item can never win a
/// cheapest-price comparison.
pub fn extract_price(text: &str) -> f64 {
    let clean = text.replace(',', "");
    NUMERAL_RE
        .find(clean.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::INFINITY)
}

/// Pull the first numeral out of a rating string ("4.5 stars", "3/5").
/// Returns 0.0 when nothing parses.
pub fn extract_rating(text: &str) -> f64 {
    NUMERAL_RE
        .find(text.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}
