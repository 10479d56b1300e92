//! Currency formatting for displayed credit amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format whole US dollars: `$1,234`, `-$500`, `$0`.
///
/// Cents are rounded to the nearest dollar, midpoint away from zero, to
/// match how the amounts are presented on the form.
pub(crate) fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().normalize().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < Decimal::ZERO {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}
