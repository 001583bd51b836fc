//! Narrative session: one player's traversal of a graph.
//!
//! `NarrativeSession` owns the selection book, variables, score board and
//! the timed-challenge countdown, and moves between nodes of a read-only
//! [`Graph`]. Every node entry clears the selections, cancels any running
//! countdown, sets the budget, registers the node's surface and, for timed
//! challenges, starts a fresh countdown.

use std::time::Duration;

use rd_core::condition::approx_eq;
use rd_core::{
    ContentBlock, Graph, Interval, Node, NodeId, NodeKind, NodeKindTag, PointerResolver,
    ScreenPos, SelectionObserver, TextSurfaceId, VariableId,
};
use rd_selection::{
    CommitOutcome, CoverageReport, IntervalSet, KeywordCoverageEvaluator, PreviewOutcome,
    SelectionBook,
};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::event::{EventLog, SessionEventKind};
use crate::rules::{RuleEngine, ScoreBoard, ScoreReport, SubmitReport};
use crate::timer::DeadlineTimer;
use crate::variables::VariableStore;

/// Where the session is after a traversal call.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceOutcome {
    /// The current node.
    pub node: NodeId,
    /// Its kind.
    pub kind: NodeKindTag,
    /// Its displayed content.
    pub content: Option<ContentBlock>,
    /// Whether the call changed the current node.
    pub moved: bool,
}

impl AdvanceOutcome {
    fn at(node: &Node, moved: bool) -> Self {
        Self {
            node: node.id,
            kind: node.kind.tag(),
            content: node.content().cloned(),
            moved,
        }
    }
}

/// A running playthrough of a narrative graph.
pub struct NarrativeSession {
    graph: Graph,
    config: SessionConfig,
    current: Node,
    submitted: bool,
    book: SelectionBook,
    variables: VariableStore,
    scores: ScoreBoard,
    timer: Option<DeadlineTimer>,
    events: EventLog,
    observers: Vec<Box<dyn SelectionObserver>>,
}

impl NarrativeSession {
    /// Start a session at the graph's start node.
    pub fn new(graph: Graph, config: SessionConfig) -> SessionResult<Self> {
        let current = graph.start_node()?.clone();
        let mut session = Self {
            book: SelectionBook::new(config.default_budget),
            variables: VariableStore::from_config(&config),
            scores: ScoreBoard::default(),
            events: EventLog::new(config.max_events),
            timer: None,
            submitted: false,
            observers: Vec::new(),
            current: current.clone(),
            graph,
            config,
        };
        session.enter(current);
        Ok(session)
    }

    // -- Accessors --

    /// The authored graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The node the session is on.
    pub fn current_node(&self) -> &Node {
        &self.current
    }

    /// Variable values.
    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// Accumulated score counters.
    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    /// Session event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Selection state of every surface.
    pub fn selections(&self) -> &SelectionBook {
        &self.book
    }

    /// Committed intervals of a surface.
    pub fn intervals(&self, surface: &TextSurfaceId) -> &[Interval] {
        self.book.intervals(surface)
    }

    /// Time left on the current challenge, if one is counting down.
    pub fn challenge_remaining(&self) -> Option<Duration> {
        self.timer
            .as_ref()
            .filter(|t| t.is_running())
            .map(DeadlineTimer::remaining)
    }

    /// Selected characters of the current node's text.
    pub fn selected_text(&self) -> String {
        self.current
            .content()
            .map(|c| self.book.selected_text(&c.surface, &c.text))
            .unwrap_or_default()
    }

    /// Coverage of the current node's keywords.
    pub fn coverage(&self) -> CoverageReport {
        self.current
            .content()
            .map(|c| coverage_of(&self.book, c))
            .unwrap_or_default()
    }

    // -- Collaborators --

    /// Call `subscriber` with every variable change.
    pub fn subscribe_variables(&mut self, subscriber: impl FnMut(&VariableId, f64) + 'static) {
        self.variables.subscribe(subscriber);
    }

    /// Notify `observer` of every selection change.
    pub fn add_selection_observer(&mut self, observer: Box<dyn SelectionObserver>) {
        self.observers.push(observer);
    }

    fn notify(&mut self, surface: &TextSurfaceId) {
        let committed = self.book.intervals(surface);
        let pending = self.book.pending(surface);
        for observer in &mut self.observers {
            observer.selection_changed(surface, committed, pending);
        }
    }

    // -- Selection --

    /// Select `start..=end` on `surface` if the budget allows.
    pub fn commit_selection(
        &mut self,
        surface: &TextSurfaceId,
        start: usize,
        end: usize,
    ) -> CommitOutcome {
        let outcome = self.book.commit(surface, start, end);
        self.record_commit(surface, start, end, &outcome);
        outcome
    }

    fn record_commit(
        &mut self,
        surface: &TextSurfaceId,
        start: usize,
        end: usize,
        outcome: &CommitOutcome,
    ) {
        match outcome.merged {
            Some(merged) if outcome.accepted => {
                self.events.record(
                    SessionEventKind::SelectionCommitted {
                        surface: surface.clone(),
                        merged,
                    },
                    format!("selected {merged} on {surface} ({} used)", outcome.total_used),
                );
            }
            _ => {
                self.events.record(
                    SessionEventKind::SelectionRejected {
                        surface: surface.clone(),
                        start,
                        end,
                    },
                    format!("selection {start}..{end} on {surface} rejected"),
                );
            }
        }
        self.notify(surface);
    }

    /// Check `start..=end` against the budget without committing it.
    pub fn preview_selection(
        &self,
        surface: &TextSurfaceId,
        start: usize,
        end: usize,
    ) -> PreviewOutcome {
        self.book.preview(surface, start, end)
    }

    /// Press the pointer at `index` on `surface`.
    pub fn begin_drag(&mut self, surface: &TextSurfaceId, index: usize) -> Option<PreviewOutcome> {
        let previous = self.book.dragging().cloned();
        let preview = self.book.begin_drag(surface, index);
        if let Some(previous) = previous.filter(|p| p != surface) {
            self.notify(&previous);
        }
        self.notify(surface);
        preview
    }

    /// Move the pointer to `index` while dragging.
    pub fn drag_to(&mut self, index: usize) -> Option<PreviewOutcome> {
        let preview = self.book.drag_to(index)?;
        if let Some(surface) = self.book.dragging().cloned() {
            self.notify(&surface);
        }
        Some(preview)
    }

    /// Release the pointer, committing the pending interval.
    pub fn end_drag(&mut self) -> Option<CommitOutcome> {
        let surface = self.book.dragging().cloned()?;
        let anchor = self.book.drag_anchor()?;
        let pending = self.book.pending(&surface);
        let outcome = self.book.end_drag()?;
        let (start, end) = pending.map_or((anchor, anchor), |iv| (iv.start, iv.end));
        self.record_commit(&surface, start, end, &outcome);
        Some(outcome)
    }

    /// Abandon the drag without committing.
    pub fn cancel_drag(&mut self) {
        if let Some(surface) = self.book.cancel_drag() {
            self.notify(&surface);
        }
    }

    /// Select the span between two screen positions in one step.
    ///
    /// Returns `None` when either position is off the text.
    pub fn commit_pointer_drag(
        &mut self,
        resolver: &dyn PointerResolver,
        surface: &TextSurfaceId,
        from: ScreenPos,
        to: ScreenPos,
    ) -> Option<CommitOutcome> {
        let start = resolver.resolve(from, surface)?;
        let end = resolver.resolve(to, surface)?;
        Some(self.commit_selection(surface, start, end))
    }

    /// Deselect one character. Returns the surface's intervals afterwards.
    pub fn erase_at(&mut self, surface: &TextSurfaceId, index: usize) -> Vec<Interval> {
        let before = self.book.set(surface).map_or(0, IntervalSet::total_length);
        let after = self.book.erase_at(surface, index);
        if after.iter().map(Interval::len).sum::<usize>() < before {
            self.events.record(
                SessionEventKind::SelectionErased {
                    surface: surface.clone(),
                    removed: 1,
                },
                format!("erased {index} on {surface}"),
            );
            self.notify(surface);
        }
        after
    }

    /// Deselect `start..=end`. Returns the number of characters removed.
    pub fn erase_range(&mut self, surface: &TextSurfaceId, start: usize, end: usize) -> usize {
        let removed = self.book.erase_range(surface, start, end);
        if removed > 0 {
            self.events.record(
                SessionEventKind::SelectionErased {
                    surface: surface.clone(),
                    removed,
                },
                format!("erased {removed} characters on {surface}"),
            );
            self.notify(surface);
        }
        removed
    }

    /// Clear every selection on the current node.
    pub fn clear_all(&mut self) {
        self.book.clear_all();
        self.events
            .record(SessionEventKind::SelectionsCleared, "selections cleared");
        let surfaces: Vec<_> = self.book.surfaces().cloned().collect();
        for surface in &surfaces {
            self.notify(surface);
        }
    }

    // -- Rules --

    /// Run the current node's change rules against its selection.
    ///
    /// `node` must be the current node.
    pub fn submit(&mut self, node: NodeId) -> SessionResult<SubmitReport> {
        if node != self.current.id {
            return Err(SessionError::NotCurrentNode {
                requested: node,
                current: self.current.id,
            });
        }
        let report = self.run_change_rules();
        self.submitted = true;
        Ok(report)
    }

    fn run_change_rules(&mut self) -> SubmitReport {
        let node = self.current.id;
        let mut report = match self.current.content() {
            Some(content) => {
                let coverage = coverage_of(&self.book, content);
                RuleEngine::new(&coverage).run_change_rules(&content.change_rules, &mut self.variables)
            }
            None => SubmitReport::default(),
        };
        report.node = Some(node);

        for &rule in &report.fired_change_rules {
            self.events.record(
                SessionEventKind::ChangeRuleFired { node, rule },
                format!("change rule {rule} fired on {node}"),
            );
        }
        for entry in &report.variable_changes {
            self.events.record(
                SessionEventKind::VariableChanged {
                    variable: entry.variable.clone(),
                    old: entry.old,
                    new: entry.new,
                },
                entry.to_string(),
            );
        }
        report
    }

    /// Run the current node's result rules and add their deltas to the score.
    pub fn score(&mut self) -> ScoreReport {
        let node = self.current.id;
        let report = match self.current.content() {
            Some(content) => {
                let coverage = coverage_of(&self.book, content);
                RuleEngine::new(&coverage).run_result_rules(&content.result_rules, &mut self.scores)
            }
            None => ScoreReport {
                fired: Vec::new(),
                totals: self.scores.totals().clone(),
            },
        };
        for rule in &report.fired {
            self.events.record(
                SessionEventKind::ScoreChanged {
                    node,
                    rule: rule.clone(),
                },
                format!("result '{rule}' on {node}"),
            );
        }
        report
    }

    // -- Traversal --

    /// Follow the current node's automatic transition.
    ///
    /// Linear nodes go to `next`; branch nodes take the first branch whose
    /// conditions hold, else the default. A terminal node stays put. A timed
    /// challenge is refused while its countdown runs.
    pub fn advance(&mut self) -> SessionResult<AdvanceOutcome> {
        let id = self.current.id;
        let target = match &self.current.kind {
            NodeKind::Linear { next } => next.ok_or(SessionError::MissingTransition(id)),
            NodeKind::Branch { branches, default } => {
                let mut chosen = None;
                for branch in branches {
                    if !self.variables.evaluate_all(&branch.conditions) {
                        continue;
                    }
                    match branch.target {
                        Some(target) => {
                            debug!(node = %id, branch = %branch.name, %target, "branch matched");
                            chosen = Some(target);
                            break;
                        }
                        None => {
                            warn!(node = %id, branch = %branch.name, "matching branch has no target");
                        }
                    }
                }
                chosen
                    .or(*default)
                    .ok_or(SessionError::NoBranchMatched(id))
            }
            NodeKind::TimedChallenge { .. } => {
                if self.challenge_remaining().is_some() {
                    debug!(node = %id, "challenge still counting down");
                    return Err(SessionError::ChallengePending(id));
                }
                // countdown already fired but the transition failed; retry
                let success = self.outcome_from_variable();
                return self.resolve_challenge(success, true);
            }
            NodeKind::Terminal { .. } => return Ok(AdvanceOutcome::at(&self.current, false)),
        };
        let target = target.map_err(|e| self.fail(e))?;
        self.transition_to(target)
    }

    /// Take branch `index` of the current branch node.
    ///
    /// An out-of-range index or a branch without a target falls back to the
    /// default.
    pub fn select_branch(&mut self, index: usize) -> SessionResult<AdvanceOutcome> {
        let id = self.current.id;
        let NodeKind::Branch { branches, default } = &self.current.kind else {
            return Err(SessionError::NotABranch(id));
        };
        let chosen = branches.get(index).and_then(|b| b.target);
        if chosen.is_none() {
            warn!(node = %id, index, "branch unavailable, using default");
        }
        let target = chosen
            .or(*default)
            .ok_or(SessionError::NoBranchMatched(id))
            .map_err(|e| self.fail(e))?;
        self.transition_to(target)
    }

    /// Resolve the current timed challenge before its deadline.
    pub fn report_challenge_outcome(&mut self, success: bool) -> SessionResult<AdvanceOutcome> {
        if !matches!(self.current.kind, NodeKind::TimedChallenge { .. }) {
            return Err(SessionError::NotAChallenge(self.current.id));
        }
        self.resolve_challenge(success, false)
    }

    /// Advance the challenge countdown by `elapsed`.
    ///
    /// Returns the new position when the deadline passes and the challenge
    /// resolves from its outcome variable.
    pub fn tick(&mut self, elapsed: Duration) -> SessionResult<Option<AdvanceOutcome>> {
        let Some(timer) = self.timer.as_mut() else {
            return Ok(None);
        };
        if !timer.tick(elapsed) {
            return Ok(None);
        }
        debug!(node = %timer.node(), "challenge deadline elapsed");
        let success = self.outcome_from_variable();
        self.resolve_challenge(success, true).map(Some)
    }

    /// Return to the start node. Variables and scores are kept.
    pub fn reset(&mut self) -> SessionResult<AdvanceOutcome> {
        let start = self.graph.start_node()?.clone();
        if let Some(timer) = self.timer.as_mut() {
            timer.cancel();
        }
        self.events
            .record(SessionEventKind::SessionReset, "returned to start");
        info!(node = %start.id, "session reset");
        self.enter(start);
        Ok(AdvanceOutcome::at(&self.current, true))
    }

    fn outcome_from_variable(&self) -> bool {
        match &self.current.kind {
            NodeKind::TimedChallenge {
                outcome_variable, ..
            } => approx_eq(
                self.variables.get(outcome_variable),
                self.config.success_value,
                self.config.equality_epsilon,
            ),
            _ => false,
        }
    }

    fn resolve_challenge(&mut self, success: bool, timed_out: bool) -> SessionResult<AdvanceOutcome> {
        let id = self.current.id;
        let target = match &self.current.kind {
            NodeKind::TimedChallenge {
                success_target,
                failure_target,
                ..
            } => {
                if success {
                    *success_target
                } else {
                    *failure_target
                }
            }
            _ => return Err(SessionError::NotAChallenge(id)),
        };
        info!(node = %id, success, timed_out, "challenge resolved");
        self.events.record(
            SessionEventKind::ChallengeResolved {
                node: id,
                success,
                timed_out,
            },
            format!(
                "challenge {id} {} {}",
                if success { "won" } else { "lost" },
                if timed_out { "at the deadline" } else { "by report" }
            ),
        );
        let target = target
            .ok_or(SessionError::MissingTransition(id))
            .map_err(|e| self.fail(e))?;
        self.transition_to(target)
    }

    fn fail(&mut self, error: SessionError) -> SessionError {
        warn!(node = %self.current.id, %error, "traversal failed");
        self.events.record(
            SessionEventKind::TraversalFailed {
                node: self.current.id,
                reason: error.to_string(),
            },
            error.to_string(),
        );
        error
    }

    fn transition_to(&mut self, target: NodeId) -> SessionResult<AdvanceOutcome> {
        let Some(next) = self.graph.node(target).cloned() else {
            return Err(self.fail(SessionError::NodeNotFound(target)));
        };
        if !self.submitted {
            self.run_change_rules();
        }
        info!(from = %self.current.id, to = %target, "transition");
        self.enter(next);
        Ok(AdvanceOutcome::at(&self.current, true))
    }

    fn enter(&mut self, node: Node) {
        let stale: Vec<_> = self.book.surfaces().cloned().collect();
        self.book.unregister_all();
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }

        let budget = node
            .content()
            .map_or(self.config.default_budget, |c| c.budget);
        self.book.set_budget(budget);
        if let Some(content) = node.content() {
            self.book
                .register_surface(content.surface.clone(), content.char_len());
        }
        if let NodeKind::TimedChallenge { deadline, .. } = node.kind {
            self.timer = Some(DeadlineTimer::start(node.id, deadline));
        }

        info!(node = %node.label(), kind = %node.kind.tag(), budget, "entered node");
        self.events.record(
            SessionEventKind::NodeEntered {
                node: node.id,
                kind: node.kind.tag(),
            },
            format!("entered {}", node.label()),
        );
        self.current = node;
        self.submitted = false;

        for surface in &stale {
            self.notify(surface);
        }
    }
}

fn coverage_of(book: &SelectionBook, content: &ContentBlock) -> CoverageReport {
    let text_len = content.char_len();
    for keyword in content.keywords.iter().filter(|k| !k.fits(text_len)) {
        warn!(keyword = %keyword.id, end = keyword.end, text_len, "keyword runs past the text");
    }
    let empty = IntervalSet::new();
    let set = book.set(&content.surface).unwrap_or(&empty);
    KeywordCoverageEvaluator::new(set).evaluate_all(&content.keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rd_core::{
        Branch, ChangeRule, Comparison, Keyword, KeywordCondition, Modification, Operation,
        ResultRule, VariableCondition,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    fn body() -> TextSurfaceId {
        TextSurfaceId::default()
    }

    fn memo() -> ContentBlock {
        ContentBlock::new("The mayor took the bribe.")
            .with_keyword(Keyword::new("mayor", 4, 9))
            .with_keyword(Keyword::new("bribe", 19, 24))
            .with_budget(10)
            .with_change_rule(
                ChangeRule::new()
                    .with_description("protect the mayor")
                    .with_condition(KeywordCondition::covered("mayor"))
                    .with_modification(Modification::new("loyalty", Operation::Add, 1.0)),
            )
            .with_result_rule(
                ResultRule::new("cover-up")
                    .requires_covered("mayor")
                    .requires_uncovered("bribe")
                    .with_delta("suspicion", 2),
            )
    }

    fn graph() -> Graph {
        Graph::new("memo", NodeId(1))
            .with_node(Node::linear(1, 2).with_content(memo()))
            .unwrap()
            .with_node(Node::branch(
                2,
                vec![Branch::new("loyal", 3).with_condition(VariableCondition::new(
                    "loyalty",
                    Comparison::GreaterOrEqual(1.0),
                ))],
                Some(4),
            ))
            .unwrap()
            .with_node(Node::terminal(3))
            .unwrap()
            .with_node(Node::terminal(4))
            .unwrap()
    }

    fn session() -> NarrativeSession {
        NarrativeSession::new(graph(), SessionConfig::default()).unwrap()
    }

    #[test]
    fn starts_at_start_node_with_budget() {
        let session = session();
        assert_eq!(session.current_node().id, NodeId(1));
        assert_eq!(session.selections().ledger().max(), 10);
        assert_eq!(session.selections().surface_len(&body()), Some(25));
    }

    #[test]
    fn missing_start_is_an_error() {
        let graph = Graph::new("empty", NodeId(1));
        assert!(matches!(
            NarrativeSession::new(graph, SessionConfig::default()),
            Err(SessionError::Core(_))
        ));
    }

    #[test]
    fn commit_reject_and_events() {
        let mut session = session();
        assert!(session.commit_selection(&body(), 4, 8).accepted);
        assert!(!session.commit_selection(&body(), 10, 17).accepted);
        assert_eq!(session.intervals(&body()), &[Interval::new(4, 8)]);
        assert_eq!(session.selected_text(), "mayor");

        let kinds: Vec<_> = session.events().events().iter().map(|e| &e.kind).collect();
        assert!(matches!(kinds[1], SessionEventKind::SelectionCommitted { .. }));
        assert!(matches!(kinds[2], SessionEventKind::SelectionRejected { .. }));
    }

    #[test]
    fn submit_requires_current_node() {
        let mut session = session();
        let err = session.submit(NodeId(2)).unwrap_err();
        assert!(matches!(err, SessionError::NotCurrentNode { .. }));
    }

    #[test]
    fn unsubmitted_node_runs_rules_on_exit() {
        let mut session = session();
        session.commit_selection(&body(), 4, 8);
        session.advance().unwrap();
        assert_eq!(session.variables().get(&"loyalty".into()), 1.0);
        assert!(session.intervals(&body()).is_empty());

        let outcome = session.advance().unwrap();
        assert_eq!(outcome.node, NodeId(3));
    }

    #[test]
    fn submitted_node_does_not_rerun_on_exit() {
        let mut session = session();
        session.commit_selection(&body(), 4, 8);
        session.submit(NodeId(1)).unwrap();
        session.advance().unwrap();
        assert_eq!(session.variables().get(&"loyalty".into()), 1.0);
    }

    #[test]
    fn score_accumulates_each_call() {
        let mut session = session();
        session.commit_selection(&body(), 4, 8);
        let report = session.score();
        assert_eq!(report.fired, vec!["cover-up"]);
        session.score();
        assert_eq!(session.scores().get("suspicion"), 4);
    }

    #[test]
    fn select_branch_falls_back_to_default() {
        let mut session = session();
        session.advance().unwrap();
        let outcome = session.select_branch(7).unwrap();
        assert_eq!(outcome.node, NodeId(4));
    }

    #[test]
    fn select_branch_on_linear_refused() {
        let mut session = session();
        assert!(matches!(
            session.select_branch(0),
            Err(SessionError::NotABranch(NodeId(1)))
        ));
    }

    #[test]
    fn terminal_advance_is_a_no_op() {
        let mut session = session();
        session.advance().unwrap();
        session.advance().unwrap();
        let outcome = session.advance().unwrap();
        assert!(!outcome.moved);
        assert_eq!(outcome.kind, NodeKindTag::Terminal);
    }

    #[test]
    fn reset_keeps_variables() {
        let mut session = session();
        session.commit_selection(&body(), 4, 8);
        session.advance().unwrap();
        session.reset().unwrap();
        assert_eq!(session.current_node().id, NodeId(1));
        assert_eq!(session.variables().get(&"loyalty".into()), 1.0);
    }

    #[test]
    fn dangling_linear_target_holds_position() {
        let graph = Graph::new("dangling", NodeId(1))
            .with_node(Node::linear(1, 9))
            .unwrap();
        let mut session = NarrativeSession::new(graph, SessionConfig::default()).unwrap();
        assert!(matches!(
            session.advance(),
            Err(SessionError::NodeNotFound(NodeId(9)))
        ));
        assert_eq!(session.current_node().id, NodeId(1));
        assert!(matches!(
            session.events().last().map(|e| &e.kind),
            Some(SessionEventKind::TraversalFailed { .. })
        ));
    }

    struct Recorder(Rc<RefCell<Vec<(usize, Option<Interval>)>>>);

    impl SelectionObserver for Recorder {
        fn selection_changed(
            &mut self,
            _surface: &TextSurfaceId,
            committed: &[Interval],
            pending: Option<Interval>,
        ) {
            self.0.borrow_mut().push((committed.len(), pending));
        }
    }

    #[test]
    fn observers_see_drag_and_commit() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut session = session();
        session.add_selection_observer(Box::new(Recorder(Rc::clone(&seen))));

        session.begin_drag(&body(), 4);
        session.drag_to(8);
        session.end_drag();

        let seen = seen.borrow();
        assert_eq!(seen[0], (0, Some(Interval::point(4))));
        assert_eq!(seen[1], (0, Some(Interval::new(4, 8))));
        assert_eq!(seen[2], (1, None));
    }

    #[test]
    fn dropped_drag_is_rejected_at_its_anchor() {
        let mut session = session();
        assert!(session.commit_selection(&body(), 0, 9).accepted);
        let preview = session.begin_drag(&body(), 15).unwrap();
        assert_eq!(preview.interval, None);

        let outcome = session.end_drag().unwrap();
        assert!(!outcome.accepted);
        assert!(matches!(
            session.events().last().map(|e| &e.kind),
            Some(SessionEventKind::SelectionRejected { start: 15, end: 15, .. })
        ));
    }

    struct Grid;

    impl PointerResolver for Grid {
        fn resolve(&self, pos: ScreenPos, _surface: &TextSurfaceId) -> Option<usize> {
            (pos.x >= 0.0).then(|| (pos.x / 10.0) as usize)
        }
    }

    #[test]
    fn pointer_drag_resolves_positions() {
        let mut session = session();
        let outcome = session
            .commit_pointer_drag(&Grid, &body(), ScreenPos::new(42.0, 0.0), ScreenPos::new(85.0, 0.0))
            .unwrap();
        assert_eq!(outcome.merged, Some(Interval::new(4, 8)));
        assert!(session
            .commit_pointer_drag(&Grid, &body(), ScreenPos::new(-1.0, 0.0), ScreenPos::new(5.0, 0.0))
            .is_none());
    }

    #[test]
    fn variable_subscribers_fire() {
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let mut session = session();
        session.subscribe_variables(move |_, _| *sink.borrow_mut() += 1);
        session.commit_selection(&body(), 4, 8);
        session.submit(NodeId(1)).unwrap();
        assert_eq!(*count.borrow(), 1);
    }
}
