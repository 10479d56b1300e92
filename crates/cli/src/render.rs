//! Text rendering of an estimate.

use rust_decimal::Decimal;

use creditcalc_eval::summary::MARYLAND;
use creditcalc_eval::{Estimate, Normalized};

use crate::fmt::format_usd;

/// Shown under every estimate.
const DISCLAIMER: &str = "This estimate is based on simplified tax rules and is \
not a tool for determining actual tax credit eligibility.";

const NOT_QUALIFIED: &str = "Based on your tax ID type and filing status, you do \
not meet the preliminary requirements for these credits.";

pub(crate) fn render_text(estimate: &Estimate, quiet: bool) -> String {
    let summary = &estimate.summary;
    let mut out = String::new();

    if summary.qualified {
        out.push_str("Estimated credits:\n");
        for line in &summary.lines {
            out.push_str(&format!("  {}: {}\n", line.label, format_usd(line.amount)));
        }
        if summary.lines.len() > 1 {
            out.push_str(&format!("  Total: {}\n", format_usd(summary.total)));
        }
    } else {
        out.push_str(&format!("{}\n", NOT_QUALIFIED));
        out.push_str(&format!("  Total: {}\n", format_usd(Decimal::ZERO)));
    }

    out.push_str("\nEligibility checks:\n");
    out.push_str(&check_line(
        "Federal EITC ID check",
        &estimate.readings.federal_eitc.id_check,
    ));
    out.push_str(&check_line(
        "Federal CTC ID check",
        &estimate.readings.federal_ctc.id_check,
    ));
    if estimate.filing_state == MARYLAND {
        out.push_str(&check_line(
            "Maryland EITC ID check",
            &estimate.readings.md_eitc.id_check,
        ));
    }

    for note in &summary.notes {
        out.push_str(&format!("\nNote: {}", note));
    }
    if !quiet {
        out.push_str(&format!("\nNote: {}", DISCLAIMER));
    }
    if !summary.notes.is_empty() || !quiet {
        out.push('\n');
    }
    out
}

fn check_line(label: &str, value: &Normalized) -> String {
    let status = if value.is_truthy() {
        "Eligible"
    } else if value.is_false() {
        "Ineligible"
    } else {
        "-"
    };
    format!("  {}: {}\n", label, status)
}
