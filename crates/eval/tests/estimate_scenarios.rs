//! End-to-end estimate scenarios against the scripted fact graph.
//!
//! These mirror how the form drives the engine: one linear evaluation per
//! submission, writes before reads, summary aggregated per jurisdiction.

use rust_decimal::Decimal;
use serde_json::{json, Value};

use creditcalc_eval::{
    evaluate, paths, summary::MARYLAND_EITC_LABEL, summary::MD_ITIN_NOTE, EstimateError,
    EstimateInput, FactGraph, FilingStatus, GraphError, Normalized, ScriptedGraph, TaxIdKind,
};

fn input(state: &str, status: FilingStatus, primary: TaxIdKind) -> EstimateInput {
    EstimateInput {
        filing_state: Some(state.to_string()),
        filing_status: Some(status),
        primary_tax_id: Some(primary),
        secondary_tax_id: None,
        num_qualifying_children: Some(2),
    }
}

// ──────────────────────────────────────────────
// Qualification scenarios
// ──────────────────────────────────────────────

#[test]
fn colorado_single_ssn_two_children() {
    let mut graph = ScriptedGraph::from_json(&json!({
        "/filersHaveValidIdsForFederalEitc": true,
        "/filersHaveValidIdsForFederalCtc": true,
        "/filersHaveValidIdsForMdEitc": true,
        "/federalEitcMaxAmount": 7152,
        "/federalCtcMaxRefundableAmount": 3400,
        "/mdEitcAmount": 3576,
        "/adjustedGrossIncome": 25000,
    }))
    .unwrap();

    let estimate = evaluate(
        &mut graph,
        &input("CO", FilingStatus::Single, TaxIdKind::Ssn),
    )
    .unwrap();

    assert!(estimate.summary.qualified);
    assert_eq!(estimate.summary.total, Decimal::from(10552));
    // No Maryland line outside Maryland, even with a passing MD check.
    assert!(estimate
        .summary
        .lines
        .iter()
        .all(|line| line.label != MARYLAND_EITC_LABEL));
    assert!(estimate.summary.notes.is_empty());
}

#[test]
fn maryland_itin_qualifies_through_state_credit_only() {
    let mut graph = ScriptedGraph::from_json(&json!({
        "/filersHaveValidIdsForFederalEitc": false,
        "/filersHaveValidIdsForFederalCtc": false,
        "/filersHaveValidIdsForMdEitc": true,
        "/federalEitcMaxAmount": 0,
        "/federalCtcMaxRefundableAmount": 0,
        "/mdEitcAmount": {"v": {"unscaled": {"lo": 357600}, "scale": 2}},
    }))
    .unwrap();

    let estimate = evaluate(
        &mut graph,
        &input("MD", FilingStatus::Single, TaxIdKind::Itin),
    )
    .unwrap();

    assert!(estimate.summary.qualified);
    assert_eq!(estimate.summary.total, Decimal::from(3576));
    assert_eq!(estimate.summary.lines.len(), 1);
    assert_eq!(estimate.summary.lines[0].label, MARYLAND_EITC_LABEL);
    assert_eq!(estimate.summary.notes, vec![MD_ITIN_NOTE.to_string()]);
}

#[test]
fn nothing_qualifies_without_valid_ids() {
    let mut graph = ScriptedGraph::from_json(&json!({
        "/filersHaveValidIdsForFederalEitc": false,
        "/filersHaveValidIdsForFederalCtc": false,
        "/filersHaveValidIdsForMdEitc": false,
        "/federalEitcMaxAmount": 0,
        "/federalCtcMaxRefundableAmount": 0,
        "/mdEitcAmount": 0,
    }))
    .unwrap();

    let estimate = evaluate(
        &mut graph,
        &input("CO", FilingStatus::Single, TaxIdKind::Neither),
    )
    .unwrap();

    assert!(!estimate.summary.qualified);
    assert!(estimate.summary.lines.is_empty());
    assert_eq!(estimate.summary.total, Decimal::ZERO);
}

#[test]
fn unanswered_engine_reads_come_back_incomplete() {
    let mut graph = ScriptedGraph::empty();

    let estimate = evaluate(
        &mut graph,
        &input("CO", FilingStatus::Single, TaxIdKind::Ssn),
    )
    .unwrap();

    assert!(!estimate.summary.qualified);
    assert_eq!(
        estimate.readings.federal_eitc.id_check,
        Normalized::Incomplete
    );
    assert_eq!(estimate.readings.eitc_income_limit, Normalized::Incomplete);
}

// ──────────────────────────────────────────────
// Input validation and write sequencing
// ──────────────────────────────────────────────

#[test]
fn missing_filing_state_halts_before_any_write() {
    let mut graph = ScriptedGraph::empty();
    let mut form = input("CO", FilingStatus::Single, TaxIdKind::Ssn);
    form.filing_state = None;

    let err = evaluate(&mut graph, &form).unwrap_err();
    assert!(matches!(
        err,
        EstimateError::MissingInput {
            field: "filingState"
        }
    ));
    assert_eq!(graph.writes().len(), 0);
}

#[test]
fn empty_filing_state_counts_as_missing() {
    let mut graph = ScriptedGraph::empty();
    let mut form = input("CO", FilingStatus::Single, TaxIdKind::Ssn);
    form.filing_state = Some(String::new());

    assert!(matches!(
        evaluate(&mut graph, &form).unwrap_err(),
        EstimateError::MissingInput {
            field: "filingState"
        }
    ));
    assert_eq!(graph.writes().len(), 0);
}

#[test]
fn missing_filing_status_and_primary_id_are_named() {
    let mut graph = ScriptedGraph::empty();

    let mut form = input("CO", FilingStatus::Single, TaxIdKind::Ssn);
    form.filing_status = None;
    assert!(matches!(
        evaluate(&mut graph, &form).unwrap_err(),
        EstimateError::MissingInput {
            field: "filingStatus"
        }
    ));

    let mut form = input("CO", FilingStatus::Single, TaxIdKind::Ssn);
    form.primary_tax_id = None;
    assert!(matches!(
        evaluate(&mut graph, &form).unwrap_err(),
        EstimateError::MissingInput {
            field: "primaryFilerTaxId"
        }
    ));
    assert_eq!(graph.writes().len(), 0);
}

#[test]
fn writes_happen_in_declaration_order_before_reads() {
    let mut graph = ScriptedGraph::empty();
    evaluate(
        &mut graph,
        &input("CO", FilingStatus::Single, TaxIdKind::Ssn),
    )
    .unwrap();

    let written: Vec<&str> = graph.writes().iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(
        written,
        vec![
            paths::FILING_STATE,
            paths::FILING_STATUS,
            paths::PRIMARY_FILER_TAX_ID,
            paths::SECONDARY_FILER_TAX_ID,
            paths::NUM_QUALIFYING_CHILDREN,
        ]
    );
}

#[test]
fn secondary_id_forced_to_neither_unless_filing_jointly() {
    let mut graph = ScriptedGraph::empty();
    let mut form = input("CO", FilingStatus::Single, TaxIdKind::Ssn);
    form.secondary_tax_id = Some(TaxIdKind::Ssn);
    evaluate(&mut graph, &form).unwrap();
    assert_eq!(
        graph.get(paths::SECONDARY_FILER_TAX_ID).unwrap(),
        Some(json!("Neither"))
    );

    let mut graph = ScriptedGraph::empty();
    let mut form = input("CO", FilingStatus::MarriedFilingJointly, TaxIdKind::Ssn);
    form.secondary_tax_id = Some(TaxIdKind::Itin);
    evaluate(&mut graph, &form).unwrap();
    assert_eq!(
        graph.get(paths::SECONDARY_FILER_TAX_ID).unwrap(),
        Some(json!("ITIN"))
    );

    // Joint filing with no answer still defaults the sentinel.
    let mut graph = ScriptedGraph::empty();
    let form = input("CO", FilingStatus::MarriedFilingJointly, TaxIdKind::Ssn);
    evaluate(&mut graph, &form).unwrap();
    assert_eq!(
        graph.get(paths::SECONDARY_FILER_TAX_ID).unwrap(),
        Some(json!("Neither"))
    );
}

#[test]
fn children_count_defaults_to_zero() {
    let mut graph = ScriptedGraph::empty();
    let mut form = input("CO", FilingStatus::Single, TaxIdKind::Ssn);
    form.num_qualifying_children = None;
    evaluate(&mut graph, &form).unwrap();
    assert_eq!(
        graph.get(paths::NUM_QUALIFYING_CHILDREN).unwrap(),
        Some(json!(0))
    );
}

// ──────────────────────────────────────────────
// Engine failure wrapping
// ──────────────────────────────────────────────

/// Graph that fails a chosen operation, for failure-path coverage.
struct FailingGraph {
    fail_set_at: Option<&'static str>,
    fail_get_at: Option<&'static str>,
}

impl FactGraph for FailingGraph {
    fn set(&mut self, path: &str, _value: Value) -> Result<(), GraphError> {
        if self.fail_set_at == Some(path) {
            return Err(GraphError::engine("type mismatch"));
        }
        Ok(())
    }

    fn get(&self, path: &str) -> Result<Option<Value>, GraphError> {
        if self.fail_get_at == Some(path) {
            return Err(GraphError::engine("not derivable"));
        }
        Ok(None)
    }

    fn to_json(&self) -> String {
        "{}".to_string()
    }
}

#[test]
fn write_failure_wraps_the_path() {
    let mut graph = FailingGraph {
        fail_set_at: Some(paths::FILING_STATUS),
        fail_get_at: None,
    };

    let err = evaluate(
        &mut graph,
        &input("CO", FilingStatus::Single, TaxIdKind::Ssn),
    )
    .unwrap_err();

    match err {
        EstimateError::Set { path, .. } => assert_eq!(path, paths::FILING_STATUS),
        other => panic!("expected Set error, got {}", other),
    }
}

#[test]
fn read_failure_wraps_the_path() {
    let mut graph = FailingGraph {
        fail_set_at: None,
        fail_get_at: Some(paths::MD_EITC_ID_CHECK),
    };

    let err = evaluate(
        &mut graph,
        &input("MD", FilingStatus::Single, TaxIdKind::Itin),
    )
    .unwrap_err();

    match err {
        EstimateError::Get { path, .. } => assert_eq!(path, paths::MD_EITC_ID_CHECK),
        other => panic!("expected Get error, got {}", other),
    }
}
