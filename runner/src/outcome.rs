//! Result record for one runner invocation.

use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use canary_core::CheckError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Passed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub run_id: Uuid,
    pub check: String,
    pub status: RunStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    pub duration_ms: u64,
}

impl CheckOutcome {
    pub fn new(check: &str, result: &Result<String, CheckError>, elapsed: Duration) -> Self {
        let (status, message, error_kind) = match result {
            Ok(message) => (RunStatus::Passed, message.clone(), None),
            Err(err) => (RunStatus::Failed, err.to_string(), Some(err.kind())),
        };
        Self {
            run_id: Uuid::new_v4(),
            check: check.to_string(),
            status,
            message,
            error_kind,
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == RunStatus::Passed
    }
}
