/// Failure modes of the session bootstrap and the supplier query.
///
/// Acquisition failures surface to the caller; logout failures never do
/// (they are downgraded to warnings inside [`crate::Session::release`]).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The Service Layer rejected the login (non-2xx response).
    #[error("login rejected: HTTP {status}: {body}")]
    Authentication { status: u16, body: String },

    /// The external helper process failed, or its output carried no
    /// `200 OK` status line.
    #[error("helper process failed (exit code {code:?}): {stderr}")]
    Process { code: Option<i32>, stderr: String },

    /// A nominally successful login response was missing a cookie or a
    /// JSON field, or its body was not valid JSON.
    #[error("malformed login response: {0}")]
    Parse(String),

    /// The supplier query came back with a non-2xx status.
    #[error("supplier query failed: HTTP {status}: {body}")]
    Query { status: u16, body: String },

    /// Network-level failure on any call.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Missing or unusable configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
