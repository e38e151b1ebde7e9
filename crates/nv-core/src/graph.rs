use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::Path;

use tracing::debug;

use crate::error::{ScriptError, ScriptResult, ValidationError};
use crate::node::{AutoAdvance, Choice, Node, NodeId};
use crate::raw::{RawAutoAdvance, RawChoice, RawNode, RawScript};
use crate::validate::validate;

/// How an [`Edge`] leaves its source node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeKind {
    /// A player choice with its label.
    Choice(String),
    /// An explicit `next` continuation.
    Next,
    /// A timed transition.
    AutoAdvance,
}

/// A directed link between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<'a> {
    /// Source node.
    pub from: &'a NodeId,
    /// Target node.
    pub to: &'a NodeId,
    /// How the link is taken.
    pub kind: EdgeKind,
}

/// The validated story: nodes keyed by ID, a start node, and a chapter label.
///
/// A `ScriptGraph` can only be obtained through [`ScriptGraph::load`] (or the
/// parsing helpers built on it), so every reference inside it resolves. It
/// exposes no mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptGraph {
    chapter: String,
    start: NodeId,
    nodes: BTreeMap<NodeId, Node>,
}

impl ScriptGraph {
    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Validate a raw script and build the graph.
    pub fn load(raw: RawScript) -> Result<Self, ValidationError> {
        let issues = validate(&raw);
        if !issues.is_empty() {
            return Err(ValidationError::new(issues));
        }

        let nodes: BTreeMap<NodeId, Node> = raw
            .nodes
            .into_iter()
            .map(|(key, node)| {
                let id = NodeId::from(key);
                let node = convert_node(id.clone(), node);
                (id, node)
            })
            .collect();

        debug!(
            chapter = %raw.chapter,
            start = %raw.start_node,
            nodes = nodes.len(),
            "loaded script"
        );

        Ok(Self {
            chapter: raw.chapter,
            start: NodeId::from(raw.start_node),
            nodes,
        })
    }

    /// Parse and validate a script from JSON text.
    pub fn from_json(json: &str) -> ScriptResult<Self> {
        let raw = RawScript::from_json(json)?;
        Ok(Self::load(raw)?)
    }

    /// Read, parse, and validate a script file.
    pub fn from_path(path: &Path) -> ScriptResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Convert back into the authoring format, with every flag explicit.
    pub fn to_raw(&self) -> RawScript {
        RawScript {
            chapter: self.chapter.clone(),
            start_node: self.start.to_string(),
            nodes: self
                .nodes
                .values()
                .map(|node| (node.id.to_string(), raw_node(node)))
                .collect(),
        }
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Resolve a node by ID.
    pub fn get(&self, id: &str) -> ScriptResult<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| ScriptError::NodeNotFound(NodeId::from(id)))
    }

    /// Whether a node with this ID exists.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// The chapter label.
    pub fn chapter(&self) -> &str {
        &self.chapter
    }

    /// ID of the node every session starts at.
    pub fn start_id(&self) -> &NodeId {
        &self.start
    }

    /// The start node.
    pub fn start_node(&self) -> &Node {
        // Validation guarantees the start node exists.
        &self.nodes[&self.start]
    }

    /// All nodes, ordered by ID.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // -----------------------------------------------------------------------
    // Analysis
    // -----------------------------------------------------------------------

    /// Every link in the graph, grouped by source node.
    pub fn edges(&self) -> Vec<Edge<'_>> {
        let mut edges = Vec::new();
        for node in self.nodes.values() {
            for choice in &node.choices {
                edges.push(Edge {
                    from: &node.id,
                    to: &choice.goto,
                    kind: EdgeKind::Choice(choice.label.clone()),
                });
            }
            if let Some(next) = &node.next {
                edges.push(Edge {
                    from: &node.id,
                    to: next,
                    kind: EdgeKind::Next,
                });
            }
            if let Some(auto) = &node.auto_advance {
                edges.push(Edge {
                    from: &node.id,
                    to: &auto.goto,
                    kind: EdgeKind::AutoAdvance,
                });
            }
        }
        edges
    }

    /// IDs of every node reachable from the start node, including itself.
    pub fn reachable_from_start(&self) -> BTreeSet<&NodeId> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([&self.start]);
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(id) {
                queue.extend(node.targets().filter(|t| !seen.contains(t)));
            }
        }
        seen
    }

    /// Nodes that no path from the start node reaches.
    pub fn unreachable(&self) -> Vec<&Node> {
        let reachable = self.reachable_from_start();
        self.nodes
            .values()
            .filter(|n| !reachable.contains(&n.id))
            .collect()
    }

    /// All ending nodes.
    pub fn endings(&self) -> Vec<&Node> {
        self.nodes.values().filter(|n| n.is_ending).collect()
    }

    /// Render the graph as a Graphviz digraph.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph script {\n");
        out.push_str(&format!("  label={};\n", quote(&self.chapter)));
        for node in self.nodes.values() {
            let shape = if node.is_ending {
                "doublecircle"
            } else if node.id == self.start {
                "box"
            } else {
                "ellipse"
            };
            out.push_str(&format!("  {} [shape={shape}];\n", quote(node.id.as_str())));
        }
        for edge in self.edges() {
            let label = match &edge.kind {
                EdgeKind::Choice(label) => quote(label),
                EdgeKind::Next => quote("next"),
                EdgeKind::AutoAdvance => quote("auto"),
            };
            out.push_str(&format!(
                "  {} -> {} [label={label}];\n",
                quote(edge.from.as_str()),
                quote(edge.to.as_str())
            ));
        }
        out.push('}');
        out.push('\n');
        out
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn convert_node(id: NodeId, raw: RawNode) -> Node {
    let is_ending = raw.resolve_is_ending(id.as_str());
    Node {
        name: raw.name,
        text: raw.text,
        background: raw.bg,
        character: raw.character,
        choices: raw
            .choices
            .into_iter()
            .map(|c| Choice::new(c.text, c.goto))
            .collect(),
        is_ending,
        auto_advance: raw.auto_advance.map(|a| AutoAdvance {
            delay_ms: a.delay_ms,
            effect: a.effect,
            goto: NodeId::from(a.goto),
        }),
        next: raw.next.map(NodeId::from),
        id,
    }
}

fn raw_node(node: &Node) -> RawNode {
    RawNode {
        id: Some(node.id.to_string()),
        bg: node.background.clone(),
        character: node.character.clone(),
        name: node.name.clone(),
        text: node.text.clone(),
        choices: node
            .choices
            .iter()
            .map(|c| RawChoice {
                text: c.label.clone(),
                goto: c.goto.to_string(),
            })
            .collect(),
        is_ending: Some(node.is_ending),
        auto_advance: node.auto_advance.as_ref().map(|a| RawAutoAdvance {
            delay_ms: a.delay_ms,
            effect: a.effect.clone(),
            goto: a.goto.to_string(),
        }),
        next: node.next.as_ref().map(NodeId::to_string),
    }
}
