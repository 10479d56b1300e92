//! Fact graph seam: the external rule engine as this crate sees it.
//!
//! The engine itself -- dependency resolution, derivation, typing of facts --
//! lives outside this repository. Everything here talks to it through
//! [`FactGraph`]: write a fact, read a computed result, dump the state.
//! [`ScriptedGraph`] is the in-tree implementation used by tests and by the
//! CLI's offline mode; it derives nothing and answers from a fixed script.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Value};

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Error reported by a fact graph operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An engine-specific failure (unknown path, wrong value shape, ...).
    Engine(String),
}

impl GraphError {
    pub fn engine(message: impl Into<String>) -> Self {
        GraphError::Engine(message.into())
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::Engine(message) => write!(f, "fact graph error: {}", message),
        }
    }
}

impl std::error::Error for GraphError {}

// ──────────────────────────────────────────────
// Traits
// ──────────────────────────────────────────────

/// A loaded fact graph instance.
///
/// One instance serves one evaluation at a time: all writes of an
/// evaluation complete before its first read, and callers wanting a clean
/// slate load a fresh instance rather than sharing this one concurrently.
pub trait FactGraph {
    /// Write a fact value at its absolute path.
    fn set(&mut self, path: &str, value: Value) -> Result<(), GraphError>;

    /// Read the computed result at a path. `Ok(None)` means the fact is
    /// undefined or not yet derivable -- not an error.
    fn get(&self, path: &str) -> Result<Option<Value>, GraphError>;

    /// Full JSON dump of the current fact state, for diagnostic display.
    fn to_json(&self) -> String;
}

/// Constructs a [`FactGraph`] from a combined dictionary document.
///
/// The caller owns the returned instance and its lifecycle; there is no
/// process-wide graph.
pub trait GraphLoader {
    fn load(&self, dictionary_xml: &str) -> Result<Box<dyn FactGraph>, GraphError>;
}

// ──────────────────────────────────────────────
// ScriptedGraph
// ──────────────────────────────────────────────

/// A fact graph scripted from a fixed map of path to raw result.
///
/// `set` records the write (in order) and stores the value; `get` answers
/// from the script plus anything written. Useful for tests and for running
/// the estimate pipeline without the real engine.
#[derive(Debug, Default)]
pub struct ScriptedGraph {
    results: BTreeMap<String, Value>,
    writes: Vec<(String, Value)>,
}

impl ScriptedGraph {
    /// Create a graph answering from the given results.
    pub fn new(results: BTreeMap<String, Value>) -> Self {
        Self {
            results,
            writes: Vec::new(),
        }
    }

    /// Create a graph with no scripted results.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a JSON object mapping paths to raw results.
    pub fn from_json(value: &Value) -> Result<Self, GraphError> {
        let obj = value
            .as_object()
            .ok_or_else(|| GraphError::engine("results script must be a JSON object"))?;
        let results = obj
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<BTreeMap<_, _>>();
        Ok(Self::new(results))
    }

    /// Every write applied so far, in application order.
    pub fn writes(&self) -> &[(String, Value)] {
        &self.writes
    }
}

impl FactGraph for ScriptedGraph {
    fn set(&mut self, path: &str, value: Value) -> Result<(), GraphError> {
        if path.is_empty() {
            return Err(GraphError::engine("empty fact path"));
        }
        self.writes.push((path.to_string(), value.clone()));
        self.results.insert(path.to_string(), value);
        Ok(())
    }

    fn get(&self, path: &str) -> Result<Option<Value>, GraphError> {
        if path.is_empty() {
            return Err(GraphError::engine("empty fact path"));
        }
        Ok(self.results.get(path).cloned())
    }

    fn to_json(&self) -> String {
        let facts: Value = self
            .results
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<serde_json::Map<_, _>>()
            .into();
        json!({ "facts": facts }).to_string()
    }
}

/// Loader producing [`ScriptedGraph`] instances from a shared script.
///
/// The dictionary document is accepted but not interpreted -- a scripted
/// graph has no rules to compile.
pub struct ScriptedLoader {
    results: Value,
}

impl ScriptedLoader {
    pub fn new(results: Value) -> Self {
        Self { results }
    }
}

impl GraphLoader for ScriptedLoader {
    fn load(&self, _dictionary_xml: &str) -> Result<Box<dyn FactGraph>, GraphError> {
        Ok(Box::new(ScriptedGraph::from_json(&self.results)?))
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
