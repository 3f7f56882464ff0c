//! Toolchain projection error types.

/// Errors that can occur while projecting a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// The package version is not a semantic version.
    #[error("invalid package version '{input}': {source}")]
    Version {
        input: String,
        #[source]
        source: semver::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for toolchain operations.
pub type Result<T> = std::result::Result<T, ToolchainError>;
