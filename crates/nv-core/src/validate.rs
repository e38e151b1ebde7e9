use std::fmt;

use crate::node::NodeId;
use crate::raw::RawScript;

/// How a node refers to another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// The choice at this index.
    Choice(usize),
    /// The node's `next` continuation.
    Next,
    /// The node's `autoAdvance.goto`.
    AutoAdvance,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Choice(i) => write!(f, "choice {}", i + 1),
            Self::Next => write!(f, "next"),
            Self::AutoAdvance => write!(f, "autoAdvance"),
        }
    }
}

/// A single structural problem in a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The start node ID is not a key of the node mapping.
    MissingStartNode(NodeId),
    /// A node's mapping key is empty.
    EmptyNodeId,
    /// A node's `id` field disagrees with its mapping key.
    IdMismatch {
        /// The mapping key.
        key: NodeId,
        /// The `id` field.
        id: NodeId,
    },
    /// A reference points at a node that does not exist.
    DanglingReference {
        /// The node holding the reference.
        node: NodeId,
        /// Which field holds it.
        via: ReferenceKind,
        /// The missing target.
        target: NodeId,
    },
    /// A node has choices and also a continuation, which could never be taken.
    ContinuationWithChoices(NodeId),
    /// An ending has choices or a continuation.
    EndingNotTerminal(NodeId),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStartNode(id) => write!(f, "start node \"{id}\" is not defined"),
            Self::EmptyNodeId => write!(f, "a node has an empty id"),
            Self::IdMismatch { key, id } => {
                write!(f, "node \"{key}\" declares a different id \"{id}\"")
            }
            Self::DanglingReference { node, via, target } => {
                write!(f, "node \"{node}\" {via} goes to undefined node \"{target}\"")
            }
            Self::ContinuationWithChoices(id) => {
                write!(f, "node \"{id}\" has both choices and a continuation")
            }
            Self::EndingNotTerminal(id) => {
                write!(f, "ending \"{id}\" must not have choices or a continuation")
            }
        }
    }
}

/// Check a raw script for structural problems.
///
/// Unreachable nodes are not issues; see
/// [`ScriptGraph::unreachable`](crate::ScriptGraph::unreachable).
pub fn validate(raw: &RawScript) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !raw.nodes.contains_key(&raw.start_node) {
        issues.push(ValidationIssue::MissingStartNode(NodeId::from(
            raw.start_node.as_str(),
        )));
    }

    for (key, node) in &raw.nodes {
        if key.is_empty() {
            issues.push(ValidationIssue::EmptyNodeId);
            continue;
        }
        if let Some(id) = node.id.as_deref().filter(|id| *id != key.as_str()) {
            issues.push(ValidationIssue::IdMismatch {
                key: NodeId::from(key.as_str()),
                id: NodeId::from(id),
            });
        }

        let references = node
            .choices
            .iter()
            .enumerate()
            .map(|(i, c)| (ReferenceKind::Choice(i), c.goto.as_str()))
            .chain(node.next.as_deref().map(|t| (ReferenceKind::Next, t)))
            .chain(
                node.auto_advance
                    .as_ref()
                    .map(|a| (ReferenceKind::AutoAdvance, a.goto.as_str())),
            );
        for (via, target) in references {
            if !raw.nodes.contains_key(target) {
                issues.push(ValidationIssue::DanglingReference {
                    node: NodeId::from(key.as_str()),
                    via,
                    target: NodeId::from(target),
                });
            }
        }

        let has_continuation = node.has_continuation();
        if node.resolve_is_ending(key) {
            if !node.choices.is_empty() || has_continuation {
                issues.push(ValidationIssue::EndingNotTerminal(NodeId::from(key.as_str())));
            }
        } else if !node.choices.is_empty() && has_continuation {
            issues.push(ValidationIssue::ContinuationWithChoices(NodeId::from(
                key.as_str(),
            )));
        }
    }

    issues
}
