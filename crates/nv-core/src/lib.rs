//! Core types for Novella: story nodes, choices, and the script graph.
//!
//! This crate defines the data model a story script loads into. It is
//! independent of any player: you can build a [`ScriptGraph`] from a
//! [`RawScript`] constructed in code or deserialize one from JSON. Every graph
//! that exists has passed validation, so all of its references resolve.

/// Bundled demo chapter used by `nv init` and in tests.
pub mod demo;
/// Error types used throughout the crate.
pub mod error;
/// The validated, read-only script graph.
pub mod graph;
/// Node, choice, and transition types.
pub mod node;
/// The serialized authoring format.
pub mod raw;
/// Structural checks run while loading a script.
pub mod validate;

/// Re-export error types.
pub use error::{ScriptError, ScriptResult, ValidationError};
/// Re-export graph types.
pub use graph::{Edge, EdgeKind, ScriptGraph};
/// Re-export node types.
pub use node::{AutoAdvance, Choice, Node, NodeId};
/// Re-export the authoring format.
pub use raw::{RawAutoAdvance, RawChoice, RawNode, RawScript};
/// Re-export validation issue types.
pub use validate::{ReferenceKind, ValidationIssue};
