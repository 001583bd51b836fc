use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Configuration for a narrative session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial variable values. Undeclared variables read as 0.
    pub variables: BTreeMap<String, f64>,
    /// Selection budget for nodes without content.
    pub default_budget: usize,
    /// Outcome-variable value that counts as a won timed challenge.
    pub success_value: f64,
    /// Tolerance for equality comparisons.
    pub equality_epsilon: f64,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            variables: BTreeMap::new(),
            default_budget: 100,
            success_value: 1.0,
            equality_epsilon: 1e-6,
            max_events: 0,
        }
    }
}

impl SessionConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Declare a variable with its initial value.
    pub fn with_variable(mut self, name: impl Into<String>, value: f64) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Set the budget used by nodes without content.
    pub fn with_default_budget(mut self, budget: usize) -> Self {
        self.default_budget = budget;
        self
    }

    /// Set the value that marks a timed challenge as won.
    pub fn with_success_value(mut self, value: f64) -> Self {
        self.success_value = value;
        self
    }

    /// Set the equality tolerance.
    pub fn with_equality_epsilon(mut self, epsilon: f64) -> Self {
        self.equality_epsilon = epsilon;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}
