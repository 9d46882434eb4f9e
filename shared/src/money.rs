//! Money conversion utilities using rust_decimal for precision
//!
//! Order totals are stored as integer cents. All arithmetic that can lose
//! precision goes through `Decimal`, then is converted to `f64` (2 decimal
//! places) for serialization.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// Non-finite input is logged and treated as zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Convert a money amount to integer cents (rounded half-up)
#[inline]
pub fn to_cents(amount: f64) -> i64 {
    (to_decimal(amount) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

/// Convert integer cents to a money amount
#[inline]
pub fn from_cents(cents: i64) -> f64 {
    to_f64(Decimal::new(cents, DECIMAL_PLACES))
}

/// Average of a cents sum over `count` items, rounded to 2 places
///
/// Returns 0 when `count` is 0.
pub fn average_cents(sum_cents: i64, count: i64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    to_f64(Decimal::new(sum_cents, DECIMAL_PLACES) / Decimal::from(count))
}

/// Percentage change from `previous` to `current`, rounded to 2 places
///
/// A zero baseline yields 100 when `current` grew, otherwise 0.
pub fn growth_percentage(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    let current = to_decimal(current);
    let previous = to_decimal(previous);
    to_f64((current - previous) / previous * Decimal::ONE_HUNDRED)
}
