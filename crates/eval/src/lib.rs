//! creditcalc-eval: drives the external fact graph engine and folds its
//! results into credit eligibility estimates.
//!
//! The engine consumes a combined dictionary (see `creditcalc-core`) and
//! exposes named facts. One estimate is a linear pass: validate the form
//! answers, write the input facts, read the derived facts back, normalize
//! every result, aggregate into a [`Summary`].

pub mod graph;
pub mod normalize;
pub mod paths;
pub mod summary;
pub mod types;

pub use graph::{FactGraph, GraphError, GraphLoader, ScriptedGraph, ScriptedLoader};
pub use normalize::{normalize, Normalized};
pub use summary::{summarize, CreditDecision, CreditLine, Readings, Summary};
pub use types::{EstimateError, EstimateInput, FilingStatus, TaxIdKind};

use serde_json::{json, Value};

/// Result of one estimate: everything read back plus the render-ready
/// summary. Recomputed from scratch on every submission, never patched.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// The jurisdiction the summary was aggregated under.
    pub filing_state: String,
    pub readings: Readings,
    pub summary: Summary,
}

impl Estimate {
    /// JSON rendering for `--output json` and diagnostics.
    pub fn to_json_value(&self) -> Value {
        json!({
            "filing_state": self.filing_state,
            "readings": self.readings.to_json_value(),
            "summary": serde_json::to_value(&self.summary).unwrap_or(Value::Null),
        })
    }
}

/// Run one estimate against a loaded fact graph.
///
/// Validation is all-or-nothing: if a required field is missing, the graph
/// is never touched. All writes complete before the first read -- the
/// engine's dependency resolution relies on that ordering. Any engine
/// failure re-raises with the fact path attached and yields no partial
/// result.
pub fn evaluate(
    graph: &mut dyn FactGraph,
    input: &EstimateInput,
) -> Result<Estimate, EstimateError> {
    // Validate.
    let filing_state = input
        .filing_state
        .as_deref()
        .filter(|state| !state.is_empty())
        .ok_or(EstimateError::MissingInput {
            field: "filingState",
        })?;
    let filing_status = input.filing_status.ok_or(EstimateError::MissingInput {
        field: "filingStatus",
    })?;
    let primary_tax_id = input.primary_tax_id.ok_or(EstimateError::MissingInput {
        field: "primaryFilerTaxId",
    })?;

    // A second filer only exists under joint filing; every other status
    // forces the sentinel no matter what the form carried.
    let secondary_tax_id = if filing_status.is_joint() {
        input.secondary_tax_id.unwrap_or(TaxIdKind::Neither)
    } else {
        TaxIdKind::Neither
    };
    let children = input.num_qualifying_children.unwrap_or(0);

    // Write.
    set(graph, paths::FILING_STATE, json!(filing_state))?;
    set(graph, paths::FILING_STATUS, json!(filing_status.as_str()))?;
    set(graph, paths::PRIMARY_FILER_TAX_ID, json!(primary_tax_id.as_str()))?;
    set(
        graph,
        paths::SECONDARY_FILER_TAX_ID,
        json!(secondary_tax_id.as_str()),
    )?;
    set(graph, paths::NUM_QUALIFYING_CHILDREN, json!(children))?;

    // Read and normalize.
    let fed_eitc_id_check = read(graph, paths::FED_EITC_ID_CHECK)?;
    let fed_ctc_id_check = read(graph, paths::FED_CTC_ID_CHECK)?;
    let md_eitc_id_check = read(graph, paths::MD_EITC_ID_CHECK)?;
    let fed_eitc_max_amount = read(graph, paths::FED_EITC_MAX_AMOUNT)?;
    let fed_ctc_max_refundable = read(graph, paths::FED_CTC_MAX_REFUNDABLE_AMOUNT)?;
    let md_eitc_amount = read(graph, paths::MD_EITC_AMOUNT)?;
    let adjusted_gross_income = read(graph, paths::ADJUSTED_GROSS_INCOME)?;
    let eitc_income_limit = read(graph, paths::EITC_INCOME_LIMIT)?;

    let readings = Readings {
        federal_eitc: CreditDecision {
            id_check: fed_eitc_id_check,
            max_amount: fed_eitc_max_amount,
        },
        federal_ctc: CreditDecision {
            id_check: fed_ctc_id_check,
            max_amount: fed_ctc_max_refundable,
        },
        md_eitc: CreditDecision {
            id_check: md_eitc_id_check,
            max_amount: md_eitc_amount,
        },
        adjusted_gross_income,
        eitc_income_limit,
    };

    // Aggregate.
    let summary = summarize(filing_state, &readings);

    Ok(Estimate {
        filing_state: filing_state.to_string(),
        readings,
        summary,
    })
}

fn set(
    graph: &mut dyn FactGraph,
    path: &'static str,
    value: Value,
) -> Result<(), EstimateError> {
    graph
        .set(path, value)
        .map_err(|source| EstimateError::Set { path, source })
}

fn read(graph: &dyn FactGraph, path: &'static str) -> Result<Normalized, EstimateError> {
    let raw = graph
        .get(path)
        .map_err(|source| EstimateError::Get { path, source })?;
    Ok(normalize(raw.as_ref()))
}

// ──────────────────────────────────────────────
// Integration tests
// ──────────────────────────────────────────────
