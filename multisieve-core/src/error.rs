//! Error types for multisieve-core.

use thiserror::Error;

/// Result type for multisieve operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for multisieve operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The dependency graph is not a tree and could not be repaired.
    #[error("Structural graph error: {0}")]
    Structural(String),

    /// A merge was requested for a coreference class that does not exist.
    #[error("Unknown coreference class: {0}")]
    UnknownClass(String),

    /// A label fell outside a closed vocabulary (part-of-speech, entity type).
    #[error("Unknown {kind} label: {label:?}")]
    UnknownTag {
        /// Which vocabulary was being parsed.
        kind: &'static str,
        /// The offending label.
        label: String,
    },

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a structural graph error.
    #[must_use]
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    /// Create a structural error naming the nodes no root covers.
    #[must_use]
    pub fn not_a_tree<I, T>(uncovered: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: std::fmt::Display,
    {
        let names: Vec<String> = uncovered.into_iter().map(|n| n.to_string()).collect();
        Self::Structural(format!(
            "graph is not a tree, nodes not covered by any root: {}",
            names.join(", ")
        ))
    }

    /// Create an unknown coreference class error.
    #[must_use]
    pub fn unknown_class(id: impl std::fmt::Display) -> Self {
        Self::UnknownClass(id.to_string())
    }

    /// Create an unknown label error.
    #[must_use]
    pub fn unknown_tag(kind: &'static str, label: impl Into<String>) -> Self {
        Self::UnknownTag {
            kind,
            label: label.into(),
        }
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
