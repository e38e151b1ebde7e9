//! Output records the engine pushes to its host.

use nv_core::{Node, NodeId};
use serde::Serialize;

/// The action a "continue" control performs on the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinueAction {
    /// Move to the node's continuation.
    Continue,
    /// Restart the session from the start node.
    Restart,
}

impl ContinueAction {
    /// Button label for this action.
    pub fn label(self) -> &'static str {
        match self {
            Self::Continue => "Continue",
            Self::Restart => "Restart",
        }
    }

    /// The continue action offered by `node`, if any.
    ///
    /// Nodes with choices and dialogue-only nodes without a continuation
    /// offer none.
    pub fn for_node(node: &Node) -> Option<Self> {
        if node.is_ending {
            Some(Self::Restart)
        } else if node.has_choices() {
            None
        } else {
            node.continuation().map(|_| Self::Continue)
        }
    }
}

/// A choice as presented to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceView {
    /// Label text.
    pub label: String,
    /// Node entered when chosen; pass this to `choose`.
    pub target_node_id: NodeId,
}

/// Everything a host needs to render a newly entered node.
///
/// Emitted once per node entry, before any of its text is revealed, so
/// static chrome (speaker, portrait, background) can be drawn immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    /// The node entered.
    pub node_id: NodeId,
    /// Speaker name; `None` hides the name plate.
    pub speaker_name: Option<String>,
    /// The complete text; reveal progress arrives separately.
    pub full_text: String,
    /// Background tag.
    pub background_tag: String,
    /// Character illustration tag.
    pub character_tag: String,
    /// Choices in display order.
    pub choices: Vec<ChoiceView>,
    /// Whether continuing restarts the session.
    pub is_ending: bool,
    /// The continue control to show, if any.
    pub continue_action: Option<ContinueAction>,
    /// Nodes entered since the last (re)start, including this one.
    pub step_count: u32,
    /// The script's chapter label.
    pub chapter_label: String,
}

impl ViewModel {
    /// Build the view-model for `node` at the given step.
    pub fn for_node(node: &Node, step_count: u32, chapter_label: &str) -> Self {
        Self {
            node_id: node.id.clone(),
            speaker_name: node.speaker().map(str::to_string),
            full_text: node.text.clone(),
            background_tag: node.background.clone(),
            character_tag: node.character.clone(),
            choices: node
                .choices
                .iter()
                .map(|c| ChoiceView {
                    label: c.label.clone(),
                    target_node_id: c.goto.clone(),
                })
                .collect(),
            is_ending: node.is_ending,
            continue_action: ContinueAction::for_node(node),
            step_count,
            chapter_label: chapter_label.to_string(),
        }
    }
}

/// Reveal progress of the current node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealProgress {
    /// The node whose text is revealing.
    pub node_id: NodeId,
    /// Characters shown so far.
    pub revealed_count: usize,
    /// Whether the whole text is now shown.
    pub complete: bool,
}

/// A one-shot visual effect for the host to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectSignal {
    /// The transition node that fired it.
    pub node_id: NodeId,
    /// Effect name, e.g. `"flash"`.
    pub effect: String,
}

/// Something the host should react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A node was entered.
    View(ViewModel),
    /// Reveal progress changed, on every tick and on skip.
    Reveal(RevealProgress),
    /// A transition effect fired.
    Effect(EffectSignal),
    /// The session restarted from an ending; a `View` of the start node follows.
    Restarted,
}

impl EngineEvent {
    /// The node this event refers to, if any.
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::View(v) => Some(&v.node_id),
            Self::Reveal(r) => Some(&r.node_id),
            Self::Effect(e) => Some(&e.node_id),
            Self::Restarted => None,
        }
    }
}
