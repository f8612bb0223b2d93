//! Narrative number formatting.

use rust_decimal::Decimal;

const BILLION: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Formats a monetary value in billions, e.g. `"$391.04B"`.
///
/// The value is scaled by 1e9 and rounded to two decimal places (midpoint to
/// even); the integer part is grouped in thousands.
#[must_use]
pub fn format_billions(value: Decimal) -> String {
    let scaled = (value / BILLION).round_dp(2);
    let negative = scaled.is_sign_negative() && !scaled.is_zero();
    let text = scaled.abs().to_string();

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, format!("{frac_part:0<2}")),
        None => (text.as_str(), "00".to_string()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("${sign}{grouped}.{frac_part}B")
}
