use thiserror::Error;

/// Error kinds produced by the core engine (`spec.md` §7).
///
/// `Usage` and `TypeMismatch` are locally recovered by callers (a default is
/// substituted and a warning logged); `Resource` and `Fatal` should abort the
/// CLI with a non-zero exit code.
#[derive(Debug, Error)]
pub enum HarryError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("resource error: {0}")]
    Resource(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("fatal error: {0}")]
    Fatal(String),
}

pub type Result<T> = std::result::Result<T, HarryError>;
