//! Error types for the narrative engine.

use nv_core::{NodeId, ScriptError};
use thiserror::Error;

use crate::state::EngineState;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors returned by [`NarrativeEngine`](crate::NarrativeEngine) operations.
///
/// Every variant except [`EngineError::Script`] is a rejected input: the
/// engine reports it and keeps its prior state.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input arrived before `start()`.
    #[error("the session has not started")]
    NotStarted,

    /// `start()` was called on a running session.
    #[error("the session is already running (state: {0})")]
    AlreadyStarted(EngineState),

    /// Input arrived while text is still being revealed.
    #[error("node \"{0}\" is still revealing its text")]
    NotReady(NodeId),

    /// The target is not one of the current node's choices.
    #[error("\"{target}\" is not a choice of node \"{node}\"")]
    InvalidChoice {
        /// The current node.
        node: NodeId,
        /// The rejected target.
        target: String,
    },

    /// `advance()` was called on a node that requires a choice.
    #[error("node \"{0}\" requires a choice")]
    ChoiceRequired(NodeId),

    /// The script could not resolve a node.
    #[error(transparent)]
    Script(#[from] ScriptError),
}

impl EngineError {
    /// Whether the engine kept its state and can continue.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Script(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_inputs_are_recoverable() {
        assert!(EngineError::NotStarted.is_recoverable());
        assert!(EngineError::NotReady(NodeId::from("a")).is_recoverable());
        assert!(
            !EngineError::Script(ScriptError::NodeNotFound(NodeId::from("a"))).is_recoverable()
        );
    }

    #[test]
    fn invalid_choice_message() {
        let err = EngineError::InvalidChoice {
            node: NodeId::from("start"),
            target: "attic".into(),
        };
        assert_eq!(err.to_string(), "\"attic\" is not a choice of node \"start\"");
    }
}
