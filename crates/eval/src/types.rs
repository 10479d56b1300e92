//! Form-level input types and the estimate error taxonomy.

use std::fmt;
use std::str::FromStr;

use crate::graph::GraphError;

// ──────────────────────────────────────────────
// Enumerated inputs
// ──────────────────────────────────────────────

/// Federal filing status, written to the engine as its canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
    QualifyingSurvivingSpouse,
}

impl FilingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::MarriedFilingJointly => "MarriedFilingJointly",
            FilingStatus::MarriedFilingSeparately => "MarriedFilingSeparately",
            FilingStatus::HeadOfHousehold => "HeadOfHousehold",
            FilingStatus::QualifyingSurvivingSpouse => "QualifyingSurvivingSpouse",
        }
    }

    /// Joint filing carries a second filer whose taxpayer-ID kind matters.
    pub fn is_joint(&self) -> bool {
        matches!(self, FilingStatus::MarriedFilingJointly)
    }
}

impl FromStr for FilingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [FilingStatus; 5] = [
            FilingStatus::Single,
            FilingStatus::MarriedFilingJointly,
            FilingStatus::MarriedFilingSeparately,
            FilingStatus::HeadOfHousehold,
            FilingStatus::QualifyingSurvivingSpouse,
        ];
        ALL.into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown filing status '{}'", s))
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Taxpayer-ID kind for one filer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxIdKind {
    Ssn,
    Itin,
    /// No taxpayer ID -- also the forced value for an absent second filer.
    Neither,
}

impl TaxIdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxIdKind::Ssn => "SSN",
            TaxIdKind::Itin => "ITIN",
            TaxIdKind::Neither => "Neither",
        }
    }
}

impl FromStr for TaxIdKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [TaxIdKind; 3] = [TaxIdKind::Ssn, TaxIdKind::Itin, TaxIdKind::Neither];
        ALL.into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tax ID kind '{}'", s))
    }
}

impl fmt::Display for TaxIdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Form input
// ──────────────────────────────────────────────

/// Raw form answers for one estimate. `None` means the field was not
/// supplied; validation decides which of those are fatal.
#[derive(Debug, Clone, Default)]
pub struct EstimateInput {
    /// Jurisdiction code, e.g. "CO" or "MD".
    pub filing_state: Option<String>,
    pub filing_status: Option<FilingStatus>,
    pub primary_tax_id: Option<TaxIdKind>,
    /// Only honored for joint filers; forced to `Neither` otherwise.
    pub secondary_tax_id: Option<TaxIdKind>,
    /// Defaults to 0 when absent.
    pub num_qualifying_children: Option<u32>,
}

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Errors raised while driving the engine through one estimate.
#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    /// A required form field is absent. Raised before any engine write.
    #[error("missing required input: {field}")]
    MissingInput { field: &'static str },

    /// The engine rejected a fact write.
    #[error("engine rejected write at {path}: {source}")]
    Set {
        path: &'static str,
        source: GraphError,
    },

    /// The engine failed a fact read.
    #[error("engine read failed at {path}: {source}")]
    Get {
        path: &'static str,
        source: GraphError,
    },
}
