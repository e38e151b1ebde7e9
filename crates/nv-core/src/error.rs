use std::fmt;
use std::path::PathBuf;

use crate::node::NodeId;
use crate::validate::ValidationIssue;

/// Alias for `Result<T, ScriptError>`.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Errors that can occur when loading or querying a script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The script is structurally inconsistent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested node ID does not exist in the graph.
    #[error("node not found: \"{0}\"")]
    NodeNotFound(NodeId),

    /// The script text is not valid JSON for the authoring format.
    #[error("cannot parse script: {0}")]
    Parse(#[from] serde_json::Error),

    /// The script file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Every structural problem found while loading a script.
///
/// Never empty: a script with no issues loads successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub(crate) fn new(issues: Vec<ValidationIssue>) -> Self {
        debug_assert!(!issues.is_empty());
        Self { issues }
    }

    /// All issues, in the order they were found.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issues.as_slice() {
            [] => write!(f, "invalid script"),
            [only] => write!(f, "invalid script: {only}"),
            [first, rest @ ..] => write!(
                f,
                "invalid script: {first} (and {} more issue{})",
                rest.len(),
                if rest.len() == 1 { "" } else { "s" }
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
