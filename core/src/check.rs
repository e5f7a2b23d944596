//! The check contract and its entry point wrapper.

use async_trait::async_trait;
use tracing::Instrument;

use crate::error::CheckError;

/// One canary: a single external interaction classified as success or failure.
///
/// `run` performs exactly one call against its collaborator and never retries.
/// On success it returns the message the host records; on failure it returns
/// the error after logging it.
#[async_trait]
pub trait Check: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> Result<String, CheckError>;
}

/// Entry point the host invokes.
///
/// Runs `check` once and returns its result unchanged: no retry, no deadline
/// of its own, no error translation. The span only attributes log records.
pub async fn handler(check: &dyn Check) -> Result<String, CheckError> {
    let span = tracing::info_span!("canary", check = check.name());
    check.run().instrument(span).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        calls: AtomicUsize,
        outcome: fn() -> Result<String, CheckError>,
    }

    #[async_trait]
    impl Check for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn run(&self) -> Result<String, CheckError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    #[tokio::test]
    async fn handler_returns_success_unchanged() {
        let check = Scripted {
            calls: AtomicUsize::new(0),
            outcome: || Ok("all good".to_string()),
        };
        assert_eq!(handler(&check).await.unwrap(), "all good");
        assert_eq!(check.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn handler_propagates_failure_unchanged() {
        let check = Scripted {
            calls: AtomicUsize::new(0),
            outcome: || {
                Err(CheckError::Status {
                    status: 502,
                    body: "bad gateway".to_string(),
                })
            },
        };
        let err = handler(&check).await.unwrap_err();
        assert!(matches!(err, CheckError::Status { status: 502, ref body } if body == "bad gateway"));
        assert_eq!(check.calls.load(Ordering::SeqCst), 1, "no retry on failure");
    }
}
