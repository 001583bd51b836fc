//! Firing change rules and result rules against keyword coverage.

use std::collections::BTreeMap;
use std::fmt;

use rd_core::{ChangeRule, KeywordId, NodeId, Operation, ResultRule, VariableId};
use rd_selection::CoverageReport;
use tracing::{info, warn};

use crate::variables::VariableStore;

/// One variable change caused by a change rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeLogEntry {
    /// Description of the rule that fired, if it has one.
    pub description: Option<String>,
    /// Modified variable.
    pub variable: VariableId,
    /// Applied operation.
    pub op: Operation,
    /// Right-hand operand.
    pub operand: f64,
    /// Value before.
    pub old: f64,
    /// Value after.
    pub new: f64,
}

impl fmt::Display for ChangeLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(description) = &self.description {
            write!(f, "{description}: ")?;
        }
        write!(
            f,
            "{}: {} {} {} = {}",
            self.variable,
            self.old,
            self.op.symbol(),
            self.operand,
            self.new
        )
    }
}

/// What a change-rule pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitReport {
    /// Node whose rules were evaluated.
    pub node: Option<NodeId>,
    /// Indices of the rules that fired, in authored order.
    pub fired_change_rules: Vec<usize>,
    /// Every applied modification, in order.
    pub variable_changes: Vec<ChangeLogEntry>,
}

/// Accumulated score counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: BTreeMap<String, i64>,
}

impl ScoreBoard {
    /// Add `delta` to `counter`. Totals are not clamped.
    pub fn add(&mut self, counter: &str, delta: i64) -> i64 {
        let total = self.totals.entry(counter.to_string()).or_insert(0);
        *total += delta;
        *total
    }

    /// Current total of a counter, 0 if never touched.
    pub fn get(&self, counter: &str) -> i64 {
        self.totals.get(counter).copied().unwrap_or(0)
    }

    /// All counters, sorted by name.
    pub fn totals(&self) -> &BTreeMap<String, i64> {
        &self.totals
    }

    /// Whether no counter has been touched.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// What a result-rule pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreReport {
    /// Names of the rules that fired, in authored order.
    pub fired: Vec<String>,
    /// Board totals after the pass.
    pub totals: BTreeMap<String, i64>,
}

/// Evaluates a content block's rules against its coverage report.
#[derive(Debug, Clone, Copy)]
pub struct RuleEngine<'a> {
    coverage: &'a CoverageReport,
}

impl<'a> RuleEngine<'a> {
    /// Evaluate rules against `coverage`.
    pub fn new(coverage: &'a CoverageReport) -> Self {
        Self { coverage }
    }

    /// Coverage of a keyword; unknown ids are logged and fail the rule.
    fn covered(&self, keyword: &KeywordId, rule: &str) -> Option<bool> {
        let covered = self.coverage.get(keyword);
        if covered.is_none() {
            warn!(%keyword, rule, "rule refers to unknown keyword");
        }
        covered
    }

    /// Fire every matching change rule, in order, against `variables`.
    ///
    /// Later rules see the values written by earlier ones.
    pub fn run_change_rules(&self, rules: &[ChangeRule], variables: &mut VariableStore) -> SubmitReport {
        let mut report = SubmitReport::default();
        for (index, rule) in rules.iter().enumerate() {
            let label = rule.description.as_deref().unwrap_or("");
            let matched = rule
                .conditions
                .iter()
                .all(|c| self.covered(&c.keyword, label) == Some(c.covered));
            if !matched {
                continue;
            }

            info!(rule = index, description = label, "change rule fired");
            report.fired_change_rules.push(index);
            for m in &rule.modifications {
                if let Some(change) = variables.modify(&m.variable, m.op, m.operand) {
                    report.variable_changes.push(ChangeLogEntry {
                        description: rule.description.clone(),
                        variable: change.variable,
                        op: m.op,
                        operand: m.operand,
                        old: change.old,
                        new: change.new,
                    });
                }
            }
        }
        report
    }

    /// Whether a result rule's requirements all hold.
    pub fn result_rule_matches(&self, rule: &ResultRule) -> bool {
        rule.required_covered
            .iter()
            .all(|k| self.covered(k, &rule.name) == Some(true))
            && rule
                .required_uncovered
                .iter()
                .all(|k| self.covered(k, &rule.name) == Some(false))
    }

    /// Fire every matching result rule and accumulate its deltas into `board`.
    pub fn run_result_rules(&self, rules: &[ResultRule], board: &mut ScoreBoard) -> ScoreReport {
        let mut fired = Vec::new();
        for rule in rules.iter().filter(|r| self.result_rule_matches(r)) {
            info!(rule = %rule.name, "result rule fired");
            for (counter, delta) in &rule.deltas {
                board.add(counter, *delta);
            }
            fired.push(rule.name.clone());
        }
        ScoreReport {
            fired,
            totals: board.totals().clone(),
        }
    }
}
