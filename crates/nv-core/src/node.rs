use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a node within a script.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node ID from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A labeled, player-selectable edge to another node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// The text shown to the player.
    pub label: String,
    /// The node entered when this choice is selected.
    pub goto: NodeId,
}

impl Choice {
    /// Create a new choice.
    pub fn new(label: impl Into<String>, goto: impl Into<NodeId>) -> Self {
        Self {
            label: label.into(),
            goto: goto.into(),
        }
    }
}

/// Automatic continuation of a transition node.
///
/// Once the node's text is fully revealed the optional effect fires, and
/// `delay_ms` later the engine enters `goto` without waiting for input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoAdvance {
    /// Delay between reveal completion and entering `goto`.
    pub delay_ms: u64,
    /// One-shot visual effect for the host to render, e.g. `"flash"`.
    pub effect: Option<String>,
    /// The node entered after the delay.
    pub goto: NodeId,
}

/// One unit of narrative content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Speaker name; empty when no speaker is shown.
    pub name: String,
    /// Body text. Embedded line breaks are preserved verbatim.
    pub text: String,
    /// Background tag for the host to resolve.
    pub background: String,
    /// Character illustration tag for the host to resolve.
    pub character: String,
    /// Player choices, in display order.
    pub choices: Vec<Choice>,
    /// Whether continuing from this node restarts the session.
    pub is_ending: bool,
    /// Timed continuation, for transition nodes.
    pub auto_advance: Option<AutoAdvance>,
    /// Explicit continuation for a pass-through node.
    pub next: Option<NodeId>,
}

impl Node {
    /// Create a node with the given ID and text and no choices.
    pub fn new(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            text: text.into(),
            background: String::new(),
            character: String::new(),
            choices: Vec::new(),
            is_ending: false,
            auto_advance: None,
            next: None,
        }
    }

    /// The speaker name, or `None` when the node has no speaker.
    pub fn speaker(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(&self.name)
        }
    }

    /// Length of the body text in characters.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the player must pick a choice to leave this node.
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Whether `target` is one of this node's choice targets.
    pub fn has_target(&self, target: &str) -> bool {
        self.choices.iter().any(|c| c.goto == *target)
    }

    /// The node a "continue" action leads to, if any.
    ///
    /// An explicit `next` takes precedence over a transition's `goto`.
    pub fn continuation(&self) -> Option<&NodeId> {
        self.next
            .as_ref()
            .or_else(|| self.auto_advance.as_ref().map(|a| &a.goto))
    }

    /// Every node ID this node references, with choices first.
    pub fn targets(&self) -> impl Iterator<Item = &NodeId> {
        self.choices
            .iter()
            .map(|c| &c.goto)
            .chain(self.next.iter())
            .chain(self.auto_advance.iter().map(|a| &a.goto))
    }
}
