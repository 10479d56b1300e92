//! Fact paths written and read during an estimate.
//!
//! Paths are opaque identifiers into the engine's fact space; nothing here
//! parses them. They must match the combined dictionary the engine loaded.

// ── Input facts, written in this order ───────────────────────────────

pub const FILING_STATE: &str = "/filingState";
pub const FILING_STATUS: &str = "/filingStatus";
pub const PRIMARY_FILER_TAX_ID: &str = "/primaryFilerTaxId";
pub const SECONDARY_FILER_TAX_ID: &str = "/secondaryFilerTaxId";
pub const NUM_QUALIFYING_CHILDREN: &str = "/numQualifyingChildren";

// ── Derived facts read back ──────────────────────────────────────────

pub const FED_EITC_ID_CHECK: &str = "/filersHaveValidIdsForFederalEitc";
pub const FED_CTC_ID_CHECK: &str = "/filersHaveValidIdsForFederalCtc";
pub const MD_EITC_ID_CHECK: &str = "/filersHaveValidIdsForMdEitc";
pub const FED_EITC_MAX_AMOUNT: &str = "/federalEitcMaxAmount";
pub const FED_CTC_MAX_REFUNDABLE_AMOUNT: &str = "/federalCtcMaxRefundableAmount";
pub const MD_EITC_AMOUNT: &str = "/mdEitcAmount";

// Informational reads: displayed nowhere yet, but part of every estimate.
pub const ADJUSTED_GROSS_INCOME: &str = "/adjustedGrossIncome";
pub const EITC_INCOME_LIMIT: &str = "/eitcIncomeLimit";
