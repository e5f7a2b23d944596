//! Error types for canary checks.
//!
//! # Design
//! Every check returns `CheckError` on failure and the entry point wrapper
//! passes it through untouched. The variants form a closed set so hosts can
//! match exhaustively when classifying a failed run. HTTP failures keep the
//! raw status code and body so the log sink sees what the server returned.

use std::time::Duration;

/// Boxed source error carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `Check::run`.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Connection-level failure: DNS, TCP, TLS, or a broken body stream.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The configured deadline elapsed before a complete response arrived.
    #[error("request timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    /// A response arrived with a status code outside the accepted range.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A cloud service operation was rejected.
    #[error("{operation} failed: {message}")]
    Api { operation: String, message: String },

    /// The identifier library failed or produced an empty value.
    #[error("Failed uuid string generation: {0}")]
    Generation(String),

    /// The page produced no response or a status outside 200..=299.
    #[error("{0}")]
    Navigation(String),

    /// A check's own assertion did not hold.
    #[error("{0}")]
    Assertion(String),

    /// A configuration key the check needs is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CheckError {
    pub fn transport(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        CheckError::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Short tag naming the failure class, used in logs and run outcomes.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::Transport { .. } => "transport",
            CheckError::Timeout { .. } => "timeout",
            CheckError::Status { .. } => "status",
            CheckError::Api { .. } => "api",
            CheckError::Generation(_) => "generation",
            CheckError::Navigation(_) => "navigation",
            CheckError::Assertion(_) => "assertion",
            CheckError::Config(_) => "config",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, CheckError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn status_error_displays_code_and_body() {
        let err = CheckError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: maintenance");
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn timeout_error_reports_millis() {
        let err = CheckError::Timeout {
            after: Duration::from_millis(250),
        };
        assert_eq!(err.to_string(), "request timed out after 250ms");
        assert!(err.is_timeout());
    }

    #[test]
    fn transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = CheckError::transport("connect failed", io);
        assert_eq!(err.kind(), "transport");
        assert_eq!(err.source().unwrap().to_string(), "refused");
    }

    #[test]
    fn generation_error_uses_canary_wording() {
        let err = CheckError::Generation("string empty".to_string());
        assert_eq!(err.to_string(), "Failed uuid string generation: string empty");
    }
}
