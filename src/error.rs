use thiserror::Error;

/// Failure of a "list everything" call against the remote service.
///
/// The cache recovers from every variant the same way, so callers rarely
/// need to match on it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("remote source unreachable: {0}")]
    Unreachable(String),

    #[error("server returned error {code}: {message}")]
    Server { code: u32, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}
