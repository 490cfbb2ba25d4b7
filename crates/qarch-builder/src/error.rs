//! Error types for the builder crate.

use thiserror::Error;

/// Fatal errors that abort a build.
///
/// Everything else the builder encounters is reported as a
/// [`BuildWarning`](crate::BuildWarning) alongside a best-effort circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// An edge references a node id that is not in the graph.
    #[error("Malformed graph: edge '{edge}' references missing node '{node}'")]
    MalformedGraph {
        /// The offending edge.
        edge: String,
        /// The missing node id.
        node: String,
    },

    /// Two nodes share the same id.
    #[error("Malformed graph: duplicate node id '{0}'")]
    DuplicateNode(String),

    /// The circuit model rejected an operation.
    #[error("Circuit model error: {0}")]
    Ir(#[from] qarch_ir::IrError),

    /// The editor graph JSON could not be parsed.
    #[error("Invalid editor graph JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;
