//! Money and quantity helpers.
//!
//! Every amount in the system is a [`Decimal`] rounded to two places before it is
//! stored. Floating point is never used for prices, totals, change or stock.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Number of decimal places kept for prices, totals and stock quantities.
pub const MONEY_SCALE: u32 = 2;

/// Largest magnitude a stored amount may have: `99,999,999.99`, the `(10, 2)` column
/// precision. Values in this range survive the `SQLite` REAL round trip unchanged.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, MONEY_SCALE);

/// Rounds a value to [`MONEY_SCALE`] places (banker's rounding, as `rust_decimal` does).
#[must_use]
pub fn normalize(value: Decimal) -> Decimal {
    value.round_dp(MONEY_SCALE)
}

/// Normalizes `value` and checks it fits the stored precision.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] if the magnitude exceeds [`MAX_AMOUNT`].
pub fn ensure_in_range(value: Decimal) -> Result<Decimal> {
    let rounded = normalize(value);
    if rounded.abs() > MAX_AMOUNT {
        return Err(Error::InvalidAmount { amount: rounded });
    }
    Ok(rounded)
}

/// `price * quantity`, checked for overflow and against [`MAX_AMOUNT`].
///
/// # Errors
/// Returns [`Error::InvalidAmount`] when the product overflows or is out of range.
pub fn line_total(price: Decimal, quantity: i32) -> Result<Decimal> {
    normalize(price)
        .checked_mul(Decimal::from(quantity))
        .ok_or(Error::InvalidAmount { amount: price })
        .and_then(ensure_in_range)
}

/// Sums amounts without panicking on overflow. The result is not range-checked, so
/// it can be used for display totals that are never stored.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] if the running sum overflows.
pub fn checked_sum<I>(values: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(value)
            .ok_or(Error::InvalidAmount { amount: value })
    })
}

/// Parses a price typed by staff into a normalized, non-negative decimal.
///
/// Currency symbols, spaces and thousands separators are stripped, so `"Rp 25,000"`
/// and `"25000.00"` both parse to `25000.00`.
///
/// # Errors
/// Returns [`Error::InvalidPrice`] if the input is empty, negative, has more than one
/// decimal point, contains no number, or exceeds [`MAX_AMOUNT`].
pub fn parse_price(input: &str) -> Result<Decimal> {
    let invalid = |reason: &str| Error::InvalidPrice {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    if input.trim().is_empty() {
        return Err(invalid("price cannot be empty"));
    }
    if input.contains('-') {
        return Err(invalid("price cannot be negative"));
    }

    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.matches('.').count() > 1 {
        return Err(invalid("more than one decimal point"));
    }
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid("no digits found"));
    }

    let price = Decimal::from_str(&cleaned)
        .map(normalize)
        .map_err(|_| invalid("not a number"))?;
    if price > MAX_AMOUNT {
        return Err(invalid("price cannot exceed 99,999,999.99"));
    }
    Ok(price)
}

/// Parses a signed decimal quantity such as `"2.5"` or `"-3"`.
///
/// # Errors
/// Returns [`Error::Validation`] if the input is not a decimal number, and
/// [`Error::InvalidAmount`] if it exceeds [`MAX_AMOUNT`].
pub fn parse_quantity(input: &str) -> Result<Decimal> {
    Decimal::from_str(input.trim())
        .map_err(|_| Error::validation(format!("'{input}' is not a valid quantity")))
        .and_then(ensure_in_range)
}

/// Formats an amount with thousands separators and two decimals, e.g. `55,000.00`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = normalize(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}
