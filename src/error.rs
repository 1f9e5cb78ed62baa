//! Error types for the `html_allowlist` crate.
//!
//! Only configuration can fail. Evaluating untrusted markup never produces an
//! error; rejections are reported through [`Rejection`](crate::Rejection).

/// All errors that can occur while assembling a [`Policy`](crate::Policy).
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// A pattern supplied to a regex matcher failed to compile.
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The builder configuration is invalid.
    #[error("Config error: {0}")]
    Config(String),
}

/// A type alias for `Result<T, PolicyError>`.
pub type Result<T> = std::result::Result<T, PolicyError>;
