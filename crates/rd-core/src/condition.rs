//! Variable comparisons for branch conditions.

use serde::{Deserialize, Serialize};

use crate::id::VariableId;

/// How a variable's value is compared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Approximately equal, within the session epsilon.
    Equal(f64),
    /// Not approximately equal.
    NotEqual(f64),
    /// Strictly greater.
    Greater(f64),
    /// Strictly less.
    Less(f64),
    /// Greater or equal.
    GreaterOrEqual(f64),
    /// Less or equal.
    LessOrEqual(f64),
    /// Inside `min..=max`.
    Range {
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },
}

impl Comparison {
    /// Test `value` against this comparison.
    pub fn holds(&self, value: f64, epsilon: f64) -> bool {
        match *self {
            Comparison::Equal(target) => approx_eq(value, target, epsilon),
            Comparison::NotEqual(target) => !approx_eq(value, target, epsilon),
            Comparison::Greater(target) => value > target,
            Comparison::Less(target) => value < target,
            Comparison::GreaterOrEqual(target) => value >= target,
            Comparison::LessOrEqual(target) => value <= target,
            Comparison::Range { min, max } => value >= min && value <= max,
        }
    }

    /// Short operator form, e.g. `>= 100`.
    pub fn describe(&self) -> String {
        match *self {
            Comparison::Equal(t) => format!("== {t}"),
            Comparison::NotEqual(t) => format!("!= {t}"),
            Comparison::Greater(t) => format!("> {t}"),
            Comparison::Less(t) => format!("< {t}"),
            Comparison::GreaterOrEqual(t) => format!(">= {t}"),
            Comparison::LessOrEqual(t) => format!("<= {t}"),
            Comparison::Range { min, max } => format!("in {min}..={max}"),
        }
    }
}

/// Approximate float equality, scaled for large magnitudes.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= epsilon * scale
}

/// A single comparison against a named variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableCondition {
    /// Variable to read.
    pub variable: VariableId,
    /// Comparison to apply.
    pub comparison: Comparison,
}

impl VariableCondition {
    /// Create a condition.
    pub fn new(variable: impl Into<VariableId>, comparison: Comparison) -> Self {
        Self {
            variable: variable.into(),
            comparison,
        }
    }
}
