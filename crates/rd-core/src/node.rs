//! Node kinds and the content a node displays.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::condition::VariableCondition;
use crate::id::{KeywordId, NodeId, TextSurfaceId, VariableId};
use crate::keyword::Keyword;
use crate::rule::{ChangeRule, ResultRule};

fn default_budget() -> usize {
    100
}

/// Text shown by a node, with its keywords and rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Surface the text is displayed on.
    #[serde(default)]
    pub surface: TextSurfaceId,
    /// The displayed text.
    pub text: String,
    /// Keyword spans over `text`, in characters.
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    /// Evaluated in order on submit.
    #[serde(default)]
    pub change_rules: Vec<ChangeRule>,
    /// Evaluated by the scoring flow.
    #[serde(default)]
    pub result_rules: Vec<ResultRule>,
    /// Maximum number of characters that may be selected on this node.
    #[serde(default = "default_budget")]
    pub budget: usize,
}

impl ContentBlock {
    /// Create a block on the default surface.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            surface: TextSurfaceId::default(),
            text: text.into(),
            keywords: Vec::new(),
            change_rules: Vec::new(),
            result_rules: Vec::new(),
            budget: default_budget(),
        }
    }

    /// Put the text on the given surface.
    pub fn on_surface(mut self, surface: impl Into<TextSurfaceId>) -> Self {
        self.surface = surface.into();
        self
    }

    /// Add a keyword.
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.push(keyword);
        self
    }

    /// Add a change rule.
    pub fn with_change_rule(mut self, rule: ChangeRule) -> Self {
        self.change_rules.push(rule);
        self
    }

    /// Add a result rule.
    pub fn with_result_rule(mut self, rule: ResultRule) -> Self {
        self.result_rules.push(rule);
        self
    }

    /// Set the selection budget.
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// Length of the text in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Look up a keyword by id.
    pub fn keyword(&self, id: &KeywordId) -> Option<&Keyword> {
        self.keywords.iter().find(|k| &k.id == id)
    }
}

/// One conditional exit of a branch node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Label for logs.
    #[serde(default)]
    pub name: String,
    /// All must hold for the branch to be taken.
    #[serde(default)]
    pub conditions: Vec<VariableCondition>,
    /// Destination.
    #[serde(default)]
    pub target: Option<NodeId>,
}

impl Branch {
    /// Create an unconditional branch to `target`.
    pub fn new(name: impl Into<String>, target: u32) -> Self {
        Self {
            name: name.into(),
            conditions: Vec::new(),
            target: Some(NodeId(target)),
        }
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: VariableCondition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// What a node does when the player moves on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// Always continues to `next`.
    Linear {
        /// Following node.
        #[serde(default)]
        next: Option<NodeId>,
    },
    /// Takes the first branch whose conditions hold, else `default`.
    Branch {
        /// Checked in authored order.
        #[serde(default)]
        branches: Vec<Branch>,
        /// Fallback destination.
        #[serde(default)]
        default: Option<NodeId>,
    },
    /// Resolved by the player before `deadline`, or from `outcome_variable` after it.
    TimedChallenge {
        /// Time allowed before the node resolves itself.
        #[serde(with = "duration_secs")]
        deadline: Duration,
        /// Read when the deadline elapses.
        outcome_variable: VariableId,
        /// Destination on success.
        #[serde(default)]
        success_target: Option<NodeId>,
        /// Destination on failure.
        #[serde(default)]
        failure_target: Option<NodeId>,
    },
    /// An ending.
    Terminal {
        /// Ending label.
        #[serde(default)]
        ending: Option<String>,
    },
}

impl NodeKind {
    /// Fieldless discriminant.
    pub fn tag(&self) -> NodeKindTag {
        match self {
            NodeKind::Linear { .. } => NodeKindTag::Linear,
            NodeKind::Branch { .. } => NodeKindTag::Branch,
            NodeKind::TimedChallenge { .. } => NodeKindTag::TimedChallenge,
            NodeKind::Terminal { .. } => NodeKindTag::Terminal,
        }
    }

    /// Every node id this kind may transition to, in authored order.
    pub fn targets(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Linear { next } => next.iter().copied().collect(),
            NodeKind::Branch { branches, default } => branches
                .iter()
                .filter_map(|b| b.target)
                .chain(default.iter().copied())
                .collect(),
            NodeKind::TimedChallenge {
                success_target,
                failure_target,
                ..
            } => success_target
                .iter()
                .chain(failure_target.iter())
                .copied()
                .collect(),
            NodeKind::Terminal { .. } => Vec::new(),
        }
    }
}

/// The kind of a node without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKindTag {
    /// [`NodeKind::Linear`]
    Linear,
    /// [`NodeKind::Branch`]
    Branch,
    /// [`NodeKind::TimedChallenge`]
    TimedChallenge,
    /// [`NodeKind::Terminal`]
    Terminal,
}

impl fmt::Display for NodeKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKindTag::Linear => "linear",
            NodeKindTag::Branch => "branch",
            NodeKindTag::TimedChallenge => "timed challenge",
            NodeKindTag::Terminal => "terminal",
        };
        f.write_str(s)
    }
}

/// One narrative unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique id within the graph.
    pub id: NodeId,
    /// Name for logs and tooling.
    #[serde(default)]
    pub name: String,
    /// Displayed content. Ignored on terminal nodes.
    #[serde(default)]
    pub content: Option<ContentBlock>,
    /// Transition behaviour.
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// Create a node without content.
    pub fn new(id: NodeId, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            content: None,
            kind,
        }
    }

    /// A linear node pointing at `next`.
    pub fn linear(id: u32, next: u32) -> Self {
        Self::new(NodeId(id), "", NodeKind::Linear {
            next: Some(NodeId(next)),
        })
    }

    /// A branch node.
    pub fn branch(id: u32, branches: Vec<Branch>, default: Option<u32>) -> Self {
        Self::new(NodeId(id), "", NodeKind::Branch {
            branches,
            default: default.map(NodeId),
        })
    }

    /// A timed challenge node.
    pub fn timed(
        id: u32,
        deadline: Duration,
        outcome_variable: impl Into<VariableId>,
        success_target: u32,
        failure_target: u32,
    ) -> Self {
        Self::new(NodeId(id), "", NodeKind::TimedChallenge {
            deadline,
            outcome_variable: outcome_variable.into(),
            success_target: Some(NodeId(success_target)),
            failure_target: Some(NodeId(failure_target)),
        })
    }

    /// A terminal node.
    pub fn terminal(id: u32) -> Self {
        Self::new(NodeId(id), "", NodeKind::Terminal { ending: None })
    }

    /// Set the name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attach content.
    pub fn with_content(mut self, content: ContentBlock) -> Self {
        self.content = Some(content);
        self
    }

    /// Content that participates in play. Terminal nodes have none.
    pub fn content(&self) -> Option<&ContentBlock> {
        match self.kind {
            NodeKind::Terminal { .. } => None,
            _ => self.content.as_ref(),
        }
    }

    /// Label for logs: the name if set, otherwise the id.
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.id.to_string()
        } else {
            format!("{} ({})", self.name, self.id)
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
