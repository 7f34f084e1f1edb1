//! Error taxonomy shared across clients, formatters, and commands.

use thiserror::Error;

/// Errors surfaced by any part of the report pipeline.
///
/// There is no local recovery anywhere in this crate: every error propagates
/// to the entrypoint, which prints it and exits non-zero.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or contradictory configuration; fatal before any work starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A remote service rejected the request signature or credentials.
    #[error("authentication rejected: {0}")]
    Authentication(String),

    /// A referenced page or resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A remote call failed with a status code and message from the service.
    #[error("remote service error (status {code}): {message}")]
    RemoteService {
        /// Status code reported by the service, from the HTTP status line or
        /// the JSON error envelope.
        code: u16,
        /// Human-readable message from the service, if any.
        message: String,
    },

    /// Caller-supplied input failed validation before any network call.
    #[error("invalid input: {0}")]
    InputValidation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn remote_service_error_carries_code_and_message() {
        let err = Error::RemoteService { code: 400, message: "bad request".into() };
        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains("bad request"));
    }

    #[test]
    fn configuration_error_displays_detail() {
        let err = Error::Configuration("missing 'server' option".into());
        assert!(err.to_string().contains("missing 'server' option"));
    }
}
