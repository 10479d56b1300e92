//! creditcalc-core: fact dictionary documents and the dictionary merger.
//!
//! A fact dictionary is an XML document with an optional `Meta` section and
//! a `Facts` section holding `Fact` entries keyed by a `path` attribute.
//! Credit rules ship as independently-authored module documents; [`merge()`]
//! composes them into the single complete dictionary the rule engine loads.
//!
//! The fact payloads themselves (names, types, derivation expressions) are
//! opaque here -- this crate moves subtrees around, it never interprets them.

/// Root tag of a module fragment awaiting composition.
pub const MODULE_ROOT_TAG: &str = "FactDictionaryModule";
/// Root tag of a complete, loadable dictionary.
pub const DICTIONARY_ROOT_TAG: &str = "FactDictionary";
/// Tag of the section holding fact entries.
pub const FACTS_TAG: &str = "Facts";

pub mod error;
pub mod merge;

pub use error::MergeError;
pub use merge::{fact_paths, merge};
