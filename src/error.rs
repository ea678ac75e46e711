use thiserror::Error;

/// Unified error type for git-autotag operations
#[derive(Error, Debug)]
pub enum AutotagError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Branch not found: {0}")]
    BranchNotFound(String),

    #[error("No single common ancestor between '{dev}' and '{main}'")]
    NoCommonAncestor { main: String, dev: String },

    #[error("No version tag reachable from {0}")]
    LatestVersionNotFound(String),

    #[error("Refusing to re-tag: {0}")]
    AlreadyTagged(String),
}

/// Convenience type alias for Results in git-autotag
pub type Result<T> = std::result::Result<T, AutotagError>;

impl AutotagError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        AutotagError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        AutotagError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        AutotagError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        AutotagError::Remote(msg.into())
    }

    /// Create a branch-not-found error
    pub fn branch_not_found(branch: impl Into<String>) -> Self {
        AutotagError::BranchNotFound(branch.into())
    }

    /// Create an already-tagged error with context
    pub fn already_tagged(msg: impl Into<String>) -> Self {
        AutotagError::AlreadyTagged(msg.into())
    }
}
