//! The JSON authoring format.
//!
//! ```json
//! {
//!   "chapter": "Chapter 1",
//!   "startNode": "start",
//!   "nodes": {
//!     "start": {
//!       "id": "start", "bg": "library", "char": "narrator", "name": "",
//!       "text": "...", "choices": [{ "text": "Read on", "goto": "next" }]
//!     }
//!   }
//! }
//! ```
//!
//! These types mirror the file shape and are not validated; turn them into a
//! [`ScriptGraph`](crate::ScriptGraph) with [`ScriptGraph::load`](crate::ScriptGraph::load).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A whole script as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScript {
    /// Chapter label shown with the progress counter.
    #[serde(default)]
    pub chapter: String,
    /// ID of the node a session starts at.
    pub start_node: String,
    /// Nodes keyed by ID.
    pub nodes: BTreeMap<String, RawNode>,
}

/// A node as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    /// Node ID; defaults to the mapping key when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Background tag.
    #[serde(default)]
    pub bg: String,
    /// Character illustration tag.
    #[serde(default, rename = "char")]
    pub character: String,
    /// Speaker name.
    #[serde(default)]
    pub name: String,
    /// Body text.
    #[serde(default)]
    pub text: String,
    /// Player choices.
    #[serde(default)]
    pub choices: Vec<RawChoice>,
    /// Ending flag. When absent, IDs starting with `ending` count as endings
    /// provided the node has no choices and no continuation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ending: Option<bool>,
    /// Timed continuation for transition nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_advance: Option<RawAutoAdvance>,
    /// Explicit continuation for pass-through nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// A choice as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChoice {
    /// Label shown to the player.
    pub text: String,
    /// Target node ID.
    pub goto: String,
}

/// A transition as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAutoAdvance {
    /// Delay after reveal completion, in milliseconds.
    pub delay_ms: u64,
    /// Optional one-shot effect name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    /// Target node ID.
    pub goto: String,
}

/// ID prefix that marks an ending in scripts without an explicit `isEnding`.
pub const LEGACY_ENDING_PREFIX: &str = "ending";

impl RawScript {
    /// Parse a script from JSON text.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize the script as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl RawNode {
    /// Resolve the ending flag, falling back to the ID prefix convention.
    ///
    /// The prefix only marks nodes that could not lead anywhere else, so a
    /// legacy `ending_*` node with choices plays as an ordinary node.
    pub fn resolve_is_ending(&self, id: &str) -> bool {
        self.is_ending.unwrap_or_else(|| {
            id.starts_with(LEGACY_ENDING_PREFIX)
                && self.choices.is_empty()
                && !self.has_continuation()
        })
    }

    /// Whether the node sets `next` or `autoAdvance`.
    pub fn has_continuation(&self) -> bool {
        self.next.is_some() || self.auto_advance.is_some()
    }
}
