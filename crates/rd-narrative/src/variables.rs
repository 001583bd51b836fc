//! Named numeric variables shared by every node of a session.

use std::collections::BTreeMap;
use std::fmt;

use rd_core::{Operation, VariableCondition, VariableId};
use tracing::{debug, warn};

use crate::config::SessionConfig;

/// One applied modification.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableChange {
    /// The modified variable.
    pub variable: VariableId,
    /// Value before.
    pub old: f64,
    /// Value after.
    pub new: f64,
}

/// Called with the variable and its new value after every change.
pub type VariableSubscriber = Box<dyn FnMut(&VariableId, f64)>;

/// Variable values plus change subscribers.
///
/// Reading a variable that was never declared yields 0; the first
/// modification creates it.
pub struct VariableStore {
    values: BTreeMap<VariableId, f64>,
    epsilon: f64,
    subscribers: Vec<VariableSubscriber>,
}

impl fmt::Debug for VariableStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableStore")
            .field("values", &self.values)
            .field("epsilon", &self.epsilon)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

impl VariableStore {
    /// Create an empty store comparing with `epsilon`.
    pub fn new(epsilon: f64) -> Self {
        Self {
            values: BTreeMap::new(),
            epsilon,
            subscribers: Vec::new(),
        }
    }

    /// Create a store holding the configured initial values.
    pub fn from_config(config: &SessionConfig) -> Self {
        let mut store = Self::new(config.equality_epsilon);
        for (name, value) in &config.variables {
            store.values.insert(VariableId::new(name.as_str()), *value);
        }
        store
    }

    /// Current value, 0 if never set.
    pub fn get(&self, id: &VariableId) -> f64 {
        self.values.get(id).copied().unwrap_or(0.0)
    }

    /// Whether the variable has been declared or modified.
    pub fn is_defined(&self, id: &VariableId) -> bool {
        self.values.contains_key(id)
    }

    /// Apply `op` with `operand` and notify subscribers.
    ///
    /// Division by zero leaves the value untouched, notifies no one and
    /// returns `None`.
    pub fn modify(&mut self, id: &VariableId, op: Operation, operand: f64) -> Option<VariableChange> {
        let old = self.get(id);
        let Some(new) = op.apply(old, operand) else {
            warn!(variable = %id, operand, "division by zero ignored");
            return None;
        };
        self.values.insert(id.clone(), new);
        debug!(variable = %id, old, new, op = op.symbol(), operand, "variable modified");
        for subscriber in &mut self.subscribers {
            subscriber(id, new);
        }
        Some(VariableChange {
            variable: id.clone(),
            old,
            new,
        })
    }

    /// Test a single condition.
    pub fn evaluate(&self, condition: &VariableCondition) -> bool {
        condition
            .comparison
            .holds(self.get(&condition.variable), self.epsilon)
    }

    /// Whether every condition holds. An empty list holds.
    pub fn evaluate_all(&self, conditions: &[VariableCondition]) -> bool {
        conditions.iter().all(|c| self.evaluate(c))
    }

    /// Register a change subscriber.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&VariableId, f64) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// All defined variables, sorted by name.
    pub fn snapshot(&self) -> Vec<(VariableId, f64)> {
        self.values.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    /// The tolerance used by equality comparisons.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}
