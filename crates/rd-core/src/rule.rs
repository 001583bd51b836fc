//! Change rules (coverage -> variable mutation) and result rules (coverage -> score).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::id::{KeywordId, VariableId};

/// Arithmetic applied to a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `current + operand`
    Add,
    /// `current - operand`
    Subtract,
    /// `current * operand`
    Multiply,
    /// `floor(current / operand)`
    DivideAndFloor,
    /// `operand`
    Set,
}

impl Operation {
    /// Compute the new value. Returns `None` when dividing by zero.
    pub fn apply(self, current: f64, operand: f64) -> Option<f64> {
        match self {
            Operation::Add => Some(current + operand),
            Operation::Subtract => Some(current - operand),
            Operation::Multiply => Some(current * operand),
            Operation::DivideAndFloor => {
                if operand == 0.0 {
                    None
                } else {
                    Some((current / operand).floor())
                }
            }
            Operation::Set => Some(operand),
        }
    }

    /// Operator symbol used in change descriptions.
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::DivideAndFloor => "//",
            Operation::Set => "=",
        }
    }
}

/// One variable mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    /// Target variable.
    pub variable: VariableId,
    /// Operation to apply.
    pub op: Operation,
    /// Right-hand operand.
    pub operand: f64,
}

impl Modification {
    /// Create a modification.
    pub fn new(variable: impl Into<VariableId>, op: Operation, operand: f64) -> Self {
        Self {
            variable: variable.into(),
            op,
            operand,
        }
    }
}

/// Requires a keyword to be covered (or not covered).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCondition {
    /// Keyword in the same content block.
    pub keyword: KeywordId,
    /// `true`: must be covered. `false`: must not be covered.
    pub covered: bool,
}

impl KeywordCondition {
    /// The keyword must be covered.
    pub fn covered(keyword: impl Into<KeywordId>) -> Self {
        Self {
            keyword: keyword.into(),
            covered: true,
        }
    }

    /// The keyword must be left visible.
    pub fn uncovered(keyword: impl Into<KeywordId>) -> Self {
        Self {
            keyword: keyword.into(),
            covered: false,
        }
    }
}

/// Mutates variables when every keyword condition matches.
///
/// A rule with no conditions fires unconditionally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeRule {
    /// Optional label used in change logs.
    #[serde(default)]
    pub description: Option<String>,
    /// All must hold.
    #[serde(default)]
    pub conditions: Vec<KeywordCondition>,
    /// Applied in order when the rule fires.
    #[serde(default)]
    pub modifications: Vec<Modification>,
}

impl ChangeRule {
    /// Create an empty, unconditional rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a keyword condition.
    pub fn with_condition(mut self, condition: KeywordCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a modification.
    pub fn with_modification(mut self, modification: Modification) -> Self {
        self.modifications.push(modification);
        self
    }

    /// Every keyword id the rule refers to.
    pub fn keyword_refs(&self) -> impl Iterator<Item = &KeywordId> {
        self.conditions.iter().map(|c| &c.keyword)
    }
}

/// Adds score deltas when the required keywords are covered and the
/// forbidden ones are not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRule {
    /// Outcome name.
    pub name: String,
    /// Keywords that must be covered.
    #[serde(default)]
    pub required_covered: BTreeSet<KeywordId>,
    /// Keywords that must stay visible.
    #[serde(default)]
    pub required_uncovered: BTreeSet<KeywordId>,
    /// Score counter deltas, accumulated when the rule fires.
    #[serde(default)]
    pub deltas: BTreeMap<String, i64>,
}

impl ResultRule {
    /// Create a rule with no requirements and no deltas.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Require a keyword to be covered.
    pub fn requires_covered(mut self, keyword: impl Into<KeywordId>) -> Self {
        self.required_covered.insert(keyword.into());
        self
    }

    /// Require a keyword to stay visible.
    pub fn requires_uncovered(mut self, keyword: impl Into<KeywordId>) -> Self {
        self.required_uncovered.insert(keyword.into());
        self
    }

    /// Add a score delta.
    pub fn with_delta(mut self, counter: impl Into<String>, delta: i64) -> Self {
        *self.deltas.entry(counter.into()).or_insert(0) += delta;
        self
    }

    /// Every keyword id the rule refers to.
    pub fn keyword_refs(&self) -> impl Iterator<Item = &KeywordId> {
        self.required_covered.iter().chain(&self.required_uncovered)
    }
}
