//! Session state owned by the engine.

use std::fmt;

use nv_core::NodeId;
use serde::Serialize;
use uuid::Uuid;

/// Identifies one play-through, for logs and hosts running several sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Where the engine is in its state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// Not started yet.
    #[default]
    Idle,
    /// The current node's text is being revealed.
    Revealing,
    /// The text is fully shown; waiting for a choice or continue.
    AwaitingInput,
    /// An ending is fully shown; continuing restarts the session.
    Terminal,
}

impl EngineState {
    /// Whether `choose`/`advance` are accepted.
    pub fn accepts_input(self) -> bool {
        matches!(self, Self::AwaitingInput | Self::Terminal)
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Revealing => write!(f, "revealing"),
            Self::AwaitingInput => write!(f, "awaiting input"),
            Self::Terminal => write!(f, "terminal"),
        }
    }
}

/// Progress of the current node's text reveal, in characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealState {
    revealed: usize,
    total: usize,
}

impl RevealState {
    /// A fresh reveal of `total` characters with nothing shown yet.
    pub fn new(total: usize) -> Self {
        Self { revealed: 0, total }
    }

    /// Characters currently shown.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Length of the full text.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the whole text is shown.
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.total
    }

    /// Show one more character. Returns the new count.
    pub fn step(&mut self) -> usize {
        if self.revealed < self.total {
            self.revealed += 1;
        }
        self.revealed
    }

    /// Show the whole text at once.
    pub fn complete(&mut self) {
        self.revealed = self.total;
    }

    /// The visible prefix of `text`.
    pub fn visible<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.revealed) {
            Some((byte, _)) => &text[..byte],
            None => text,
        }
    }
}

/// Mutable state of one play-through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The node being shown, `None` before the session starts.
    pub current: Option<NodeId>,
    /// Nodes entered since the last (re)start.
    pub step: u32,
    /// Reveal progress of the current node.
    pub reveal: RevealState,
    /// State machine position.
    pub phase: EngineState,
}

impl SessionState {
    /// A session that has not started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a node: make it current, count the step, restart the reveal.
    pub fn enter(&mut self, id: NodeId, text_len: usize) {
        self.current = Some(id);
        self.step = self.step.saturating_add(1);
        self.reveal = RevealState::new(text_len);
        self.phase = EngineState::Revealing;
    }

    /// Return to the pre-start state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
