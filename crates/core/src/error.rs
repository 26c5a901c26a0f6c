//! Error types for autoconvert-core

use thiserror::Error;

/// Result type alias for autoconvert-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for autoconvert-core
#[derive(Debug, Error)]
pub enum Error {
    /// Manifest parsing or validation error
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// No valid conversion chain exists for a route within the length bound
    #[error("No conversion chain of length <= {max_length} satisfies the route")]
    RouteUnsatisfiable {
        /// The maximum chain length that was searched
        max_length: usize,
    },

    /// An in-flight search was superseded by a newer capability change
    #[error("Chain search was cancelled")]
    SearchCancelled,

    /// Graph materialization failed after a chain was resolved
    #[error("Materialization failed: {0}")]
    Materialize(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
