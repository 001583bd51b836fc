use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::id::{KeywordId, NodeId};
use crate::node::{Node, NodeKind};

/// The authored node graph. Read-only for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphDocument", into = "GraphDocument")]
pub struct Graph {
    /// Display name.
    pub name: String,
    start: NodeId,
    nodes: BTreeMap<NodeId, Node>,
}

/// On-the-wire shape: nodes as a flat list, checked for duplicate ids.
#[derive(Serialize, Deserialize)]
struct GraphDocument {
    #[serde(default)]
    name: String,
    start: NodeId,
    nodes: Vec<Node>,
}

impl TryFrom<GraphDocument> for Graph {
    type Error = CoreError;

    fn try_from(doc: GraphDocument) -> CoreResult<Self> {
        let mut graph = Graph::new(doc.name, doc.start);
        for node in doc.nodes {
            graph.add_node(node)?;
        }
        Ok(graph)
    }
}

impl From<Graph> for GraphDocument {
    fn from(graph: Graph) -> Self {
        Self {
            name: graph.name,
            start: graph.start,
            nodes: graph.nodes.into_values().collect(),
        }
    }
}

impl Graph {
    /// Create an empty graph that will start at `start`.
    pub fn new(name: impl Into<String>, start: NodeId) -> Self {
        Self {
            name: name.into(),
            start,
            nodes: BTreeMap::new(),
        }
    }

    /// Parse a graph from its JSON document form.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a node. Fails if the id is already taken.
    pub fn add_node(&mut self, node: Node) -> CoreResult<NodeId> {
        let id = node.id;
        if self.nodes.contains_key(&id) {
            return Err(CoreError::DuplicateNode(id));
        }
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Builder form of [`Graph::add_node`].
    pub fn with_node(mut self, node: Node) -> CoreResult<Self> {
        self.add_node(node)?;
        Ok(self)
    }

    /// The start node id.
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// The start node, failing with [`CoreError::MissingStart`].
    pub fn start_node(&self) -> CoreResult<&Node> {
        self.nodes
            .get(&self.start)
            .ok_or(CoreError::MissingStart(self.start))
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check references and authored content. Never fails; problems are returned.
    pub fn validate(&self) -> Vec<GraphIssue> {
        let mut issues = Vec::new();

        if !self.nodes.contains_key(&self.start) {
            issues.push(GraphIssue::MissingStart(self.start));
        }

        for node in self.nodes.values() {
            for target in node.kind.targets() {
                if !self.nodes.contains_key(&target) {
                    issues.push(GraphIssue::DanglingTarget {
                        node: node.id,
                        target,
                    });
                }
            }

            match &node.kind {
                NodeKind::Linear { next: None } => {
                    issues.push(GraphIssue::NoExit(node.id));
                }
                NodeKind::Branch {
                    branches,
                    default: None,
                } if branches.iter().all(|b| b.target.is_none()) => {
                    issues.push(GraphIssue::NoExit(node.id));
                }
                NodeKind::Branch { default: None, .. } => {
                    issues.push(GraphIssue::BranchWithoutDefault(node.id));
                }
                NodeKind::TimedChallenge {
                    success_target,
                    failure_target,
                    ..
                } if success_target.is_none() || failure_target.is_none() => {
                    issues.push(GraphIssue::NoExit(node.id));
                }
                NodeKind::Terminal { .. } if node.content.is_some() => {
                    issues.push(GraphIssue::TerminalContent(node.id));
                }
                _ => {}
            }

            if let Some(content) = node.content() {
                let len = content.char_len();
                let mut known = BTreeSet::new();
                for keyword in &content.keywords {
                    if !known.insert(&keyword.id) {
                        issues.push(GraphIssue::DuplicateKeyword {
                            node: node.id,
                            keyword: keyword.id.clone(),
                        });
                    }
                    if keyword.is_empty() || !keyword.fits(len) {
                        issues.push(GraphIssue::KeywordOutOfRange {
                            node: node.id,
                            keyword: keyword.id.clone(),
                        });
                    }
                }

                let referenced = content
                    .change_rules
                    .iter()
                    .flat_map(|r| r.keyword_refs())
                    .chain(content.result_rules.iter().flat_map(|r| r.keyword_refs()));
                let mut reported = BTreeSet::new();
                for keyword in referenced {
                    if !known.contains(keyword) && reported.insert(keyword) {
                        issues.push(GraphIssue::UnknownKeyword {
                            node: node.id,
                            keyword: keyword.clone(),
                        });
                    }
                }
            }
        }

        issues
    }
}

/// A problem found by [`Graph::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    /// The start node does not exist.
    MissingStart(NodeId),
    /// A transition points at a node that does not exist.
    DanglingTarget {
        /// Node holding the reference.
        node: NodeId,
        /// Missing target.
        target: NodeId,
    },
    /// A non-terminal node has no way to leave it.
    NoExit(NodeId),
    /// A branch node has no default; traversal holds if no branch matches.
    BranchWithoutDefault(NodeId),
    /// A terminal node carries content that will never be shown.
    TerminalContent(NodeId),
    /// Two keywords in one block share an id.
    DuplicateKeyword {
        /// Owning node.
        node: NodeId,
        /// Repeated id.
        keyword: KeywordId,
    },
    /// A keyword span is empty or extends past the text.
    KeywordOutOfRange {
        /// Owning node.
        node: NodeId,
        /// Offending keyword.
        keyword: KeywordId,
    },
    /// A rule refers to a keyword the block does not define.
    UnknownKeyword {
        /// Owning node.
        node: NodeId,
        /// Unresolved id.
        keyword: KeywordId,
    },
}

impl GraphIssue {
    /// Whether the issue can stop traversal. The rest are authoring warnings.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            GraphIssue::MissingStart(_) | GraphIssue::DanglingTarget { .. } | GraphIssue::NoExit(_)
        )
    }
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphIssue::MissingStart(id) => write!(f, "start node {id} does not exist"),
            GraphIssue::DanglingTarget { node, target } => {
                write!(f, "node {node} points at missing node {target}")
            }
            GraphIssue::NoExit(id) => write!(f, "node {id} has no outgoing transition"),
            GraphIssue::BranchWithoutDefault(id) => {
                write!(f, "branch node {id} has no default target")
            }
            GraphIssue::TerminalContent(id) => {
                write!(f, "terminal node {id} has content that is never shown")
            }
            GraphIssue::DuplicateKeyword { node, keyword } => {
                write!(f, "node {node} defines keyword '{keyword}' twice")
            }
            GraphIssue::KeywordOutOfRange { node, keyword } => {
                write!(f, "keyword '{keyword}' on node {node} is empty or past the end of the text")
            }
            GraphIssue::UnknownKeyword { node, keyword } => {
                write!(f, "a rule on node {node} refers to unknown keyword '{keyword}'")
            }
        }
    }
}
