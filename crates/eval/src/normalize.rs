//! Result normalization: decode the engine's polymorphic raw results.
//!
//! A path read can come back absent, as a bare scalar, as an object wrapping
//! a scalar under one of several property names, or as a fixed-point decimal
//! encoding. [`normalize`] folds all of those into one tagged value. All
//! numerics are `rust_decimal::Decimal` -- no `f64` in the evaluation path.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::fmt;

/// Wrapper property names tried on object results, highest precedence
/// first. An object exposing more than one resolves to the first match.
const WRAPPER_KEYS: [&str; 3] = ["v", "get", "value"];

/// A raw engine result folded into one of five shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Fact undefined or not yet derivable.
    Incomplete,
    Bool(bool),
    Num(Decimal),
    Str(String),
    /// Result shape the decoder does not know; carried for diagnostics
    /// rather than silently passed downstream.
    Unrecognized(Value),
}

/// Normalize a raw path read. Total over its input: never fails, worst
/// case the value comes back tagged [`Normalized::Unrecognized`].
pub fn normalize(raw: Option<&Value>) -> Normalized {
    match raw {
        None => Normalized::Incomplete,
        Some(value) => normalize_value(value),
    }
}

fn normalize_value(value: &Value) -> Normalized {
    match value {
        Value::Null => Normalized::Incomplete,
        Value::Bool(b) => Normalized::Bool(*b),
        Value::String(s) => Normalized::Str(s.clone()),
        Value::Number(n) => match decimal_from_number(n) {
            Some(d) => Normalized::Num(d),
            None => Normalized::Unrecognized(value.clone()),
        },
        Value::Object(map) => {
            for key in WRAPPER_KEYS {
                if let Some(inner) = map.get(key) {
                    // The engine nests its completeness wrapper around
                    // decimal payloads, so unwrap recursively.
                    return normalize_value(inner);
                }
            }
            match decode_decimal(map) {
                Some(d) => Normalized::Num(d),
                None => Normalized::Unrecognized(value.clone()),
            }
        }
        Value::Array(_) => Normalized::Unrecognized(value.clone()),
    }
}

/// Decode the engine's fixed-point decimal carrier:
/// `{"unscaled": {"lo": .., "hi": ..}, "scale": ..}` with `hi` and `scale`
/// defaulting to 0. The value is `(lo + hi * 2^32) / 10^scale`, exact for
/// the magnitudes involved.
fn decode_decimal(map: &serde_json::Map<String, Value>) -> Option<Decimal> {
    let unscaled = map.get("unscaled")?.as_object()?;
    let lo = unscaled.get("lo")?.as_u64()?;
    let hi = unscaled.get("hi").and_then(Value::as_u64).unwrap_or(0);
    let scale = map.get("scale").and_then(Value::as_u64).unwrap_or(0);
    if scale > 28 {
        // Beyond Decimal's representable scale; treat as unrecognized.
        return None;
    }
    let units = lo as i128 + (hi as i128) * (1i128 << 32);
    Some(Decimal::from_i128_with_scale(units, scale as u32))
}

fn decimal_from_number(n: &serde_json::Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    n.as_f64().and_then(Decimal::from_f64)
}

impl Normalized {
    /// True when the underlying check passed: boolean `true` or the
    /// engine's string rendering of it.
    pub fn is_truthy(&self) -> bool {
        matches!(self, Normalized::Bool(true))
            || matches!(self, Normalized::Str(s) if s == "true")
    }

    /// True when the underlying check explicitly failed, as opposed to
    /// being incomplete.
    pub fn is_false(&self) -> bool {
        matches!(self, Normalized::Bool(false))
            || matches!(self, Normalized::Str(s) if s == "false")
    }

    /// Dollar amount carried by this value: numbers directly, numeric
    /// strings parsed, everything else 0. Trailing zeros are stripped so
    /// decoded fixed-point values compare and render as plain dollars.
    pub fn amount(&self) -> Decimal {
        match self {
            Normalized::Num(d) => d.normalize(),
            Normalized::Str(s) => s.trim().parse().map(|d: Decimal| d.normalize()).unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        }
    }

    /// JSON rendering for diagnostic output. Amounts come out as strings
    /// with trailing zeros stripped.
    pub fn to_json_value(&self) -> Value {
        match self {
            Normalized::Incomplete => Value::String("Incomplete".to_string()),
            Normalized::Bool(b) => Value::Bool(*b),
            Normalized::Num(d) => Value::String(d.normalize().to_string()),
            Normalized::Str(s) => Value::String(s.clone()),
            Normalized::Unrecognized(v) => v.clone(),
        }
    }
}

impl fmt::Display for Normalized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Normalized::Incomplete => write!(f, "Incomplete"),
            Normalized::Bool(b) => write!(f, "{}", b),
            Normalized::Num(d) => write!(f, "{}", d.normalize()),
            Normalized::Str(s) => write!(f, "{}", s),
            Normalized::Unrecognized(_) => write!(f, "unrecognized"),
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
