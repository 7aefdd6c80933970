//! Promo code catalog
//!
//! Fixed-amount discount codes, matched case-insensitively. Resolution is
//! a pure lookup; whether an unknown code is an error is the caller's
//! concern (checkout treats it as a recoverable, typed failure).

use shared::types::Money;

/// Known codes and their discounts in minor currency units.
const PROMO_CODES: [(&str, Money); 4] = [
    ("amerta10", 10_000),
    ("newcustomer", 15_000),
    ("weekend", 20_000),
    ("student", 8_000),
];

/// Resolve a promo code to its discount amount.
pub fn resolve(code: &str) -> Option<Money> {
    let normalized = code.trim().to_ascii_lowercase();
    PROMO_CODES
        .iter()
        .find(|(c, _)| *c == normalized)
        .map(|(_, discount)| *discount)
}
