//! Error types for the NuOrder client, configuration and sync.
//!
//! Every fallible function in this crate returns [`Result`]. Transport
//! failures keep their original source so callers can still downcast to the
//! underlying HTTP library error.

use thiserror::Error;

/// Boxed error produced by a [`Transport`](crate::transport::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// DNS, connection, TLS or timeout failure reported by the transport.
    #[error("HTTP transport failed: {0}")]
    Transport(#[source] BoxError),

    /// The marketplace answered with a status >= 400.
    ///
    /// `body` is the pretty-printed JSON body when it parsed, the raw text
    /// otherwise.
    #[error("Got HTTP {status}, with body:\n{body}")]
    HttpStatus { status: u16, body: String },

    /// A successful response did not have the shape a typed caller asked for.
    #[error("could not decode HTTP {status} response: {text}")]
    ResponseDecode { status: u16, text: String },

    /// A config key is missing, and no fallback was provided.
    #[error("`{key}` missing in section [{section}], and no default provided.")]
    ConfigKeyMissing { section: String, key: String },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid request URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported HTTP method `{0}`")]
    UnsupportedMethod(String),

    #[error("could not serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The OAuth handshake endpoint reported a `request_error`.
    #[error("OAuth handshake rejected: {0}")]
    Handshake(String),

    #[error(transparent)]
    Erp(#[from] crate::sync::ErpError),
}

impl Error {
    /// Errors the CLI reports as a one-line failure instead of a backtrace.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::ConfigKeyMissing { .. } | Error::HttpStatus { .. } | Error::Handshake(_)
        )
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } | Error::ResponseDecode { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_message_carries_code_and_body() {
        let err = Error::HttpStatus {
            status: 404,
            body: "{\n  \"error\": \"not found\"\n}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Got HTTP 404, with body:\n"));
        assert!(msg.contains("\"error\": \"not found\""));
        assert_eq!(err.status(), Some(404));
        assert!(err.is_user_facing());
    }

    #[test]
    fn config_key_missing_names_the_key() {
        let err = Error::ConfigKeyMissing {
            section: "sandbox".to_string(),
            key: "hostname".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`hostname` missing in section [sandbox], and no default provided."
        );
        assert!(err.is_user_facing());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::Transport(Box::new(io));
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "refused");
        assert!(!err.is_user_facing());
    }
}
