//! Eligibility aggregation: normalized readings to a render-ready summary.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

use crate::normalize::Normalized;

pub const FEDERAL_EITC_LABEL: &str = "Federal EITC";
pub const FEDERAL_CTC_LABEL: &str = "Federal Refundable CTC";
pub const MARYLAND_EITC_LABEL: &str = "Maryland EITC";

/// Attached when a Maryland filer passes the Maryland ID check but not the
/// federal one -- the taxpayer-ID-only eligibility path.
pub const MD_ITIN_NOTE: &str =
    "ITIN holders qualify for Maryland EITC but not Federal EITC.";

/// Jurisdiction code under which Maryland EITC counts toward the result.
pub const MARYLAND: &str = "MD";

// ──────────────────────────────────────────────
// Decisions
// ──────────────────────────────────────────────

/// Per-credit decision pair read back from the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditDecision {
    /// Boolean-like: do the filers' taxpayer-ID kinds pass for this credit?
    pub id_check: Normalized,
    /// Numeric-like: the maximum credit amount.
    pub max_amount: Normalized,
}

impl CreditDecision {
    /// A credit counts as qualifying when its ID check passed.
    pub fn qualifies(&self) -> bool {
        self.id_check.is_truthy()
    }

    pub fn to_json_value(&self) -> Value {
        json!({
            "id_check": self.id_check.to_json_value(),
            "max_amount": self.max_amount.to_json_value(),
        })
    }
}

/// Everything read back from the engine for one estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct Readings {
    pub federal_eitc: CreditDecision,
    pub federal_ctc: CreditDecision,
    pub md_eitc: CreditDecision,
    /// Read but informational only.
    pub adjusted_gross_income: Normalized,
    /// Read but informational only.
    pub eitc_income_limit: Normalized,
}

impl Readings {
    pub fn to_json_value(&self) -> Value {
        json!({
            "federal_eitc": self.federal_eitc.to_json_value(),
            "federal_ctc": self.federal_ctc.to_json_value(),
            "md_eitc": self.md_eitc.to_json_value(),
            "adjusted_gross_income": self.adjusted_gross_income.to_json_value(),
            "eitc_income_limit": self.eitc_income_limit.to_json_value(),
        })
    }
}

// ──────────────────────────────────────────────
// Summary
// ──────────────────────────────────────────────

/// One displayable credit amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditLine {
    pub label: &'static str,
    pub amount: Decimal,
}

/// Render-ready aggregate for one evaluation. Built fresh every time; has
/// no identity of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Whether any counted credit's ID check passed.
    pub qualified: bool,
    /// Non-zero credit amounts, in display order.
    pub lines: Vec<CreditLine>,
    /// Sum of the listed amounts.
    pub total: Decimal,
    /// Special-case notes for the renderer to append.
    pub notes: Vec<String>,
}

/// Fold normalized readings into a summary.
///
/// Maryland EITC is considered -- for qualification, for its amount line,
/// and for the total -- only when filing in Maryland.
pub fn summarize(filing_state: &str, readings: &Readings) -> Summary {
    let fed_eitc_pass = readings.federal_eitc.qualifies();
    let fed_ctc_pass = readings.federal_ctc.qualifies();
    let in_maryland = filing_state == MARYLAND;
    let md_pass = in_maryland && readings.md_eitc.qualifies();

    let qualified = fed_eitc_pass || fed_ctc_pass || md_pass;

    let mut lines = Vec::new();
    let mut total = Decimal::ZERO;
    if qualified {
        let mut add = |label, amount: Decimal| {
            if amount > Decimal::ZERO {
                lines.push(CreditLine { label, amount });
                total += amount;
            }
        };
        add(FEDERAL_EITC_LABEL, readings.federal_eitc.max_amount.amount());
        add(FEDERAL_CTC_LABEL, readings.federal_ctc.max_amount.amount());
        if in_maryland {
            add(MARYLAND_EITC_LABEL, readings.md_eitc.max_amount.amount());
        }
    }

    let mut notes = Vec::new();
    if md_pass && !fed_eitc_pass {
        notes.push(MD_ITIN_NOTE.to_string());
    }

    Summary {
        qualified,
        lines,
        total,
        notes,
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
