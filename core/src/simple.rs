//! Simple canary: a template that always passes until someone edits it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::check::Check;
use crate::config::{CanaryConfig, DEFAULT_TEST_NAME};
use crate::error::CheckError;
use crate::log::CanaryLog;

/// Whether the simple canary fails. Edit this to exercise the failure path.
pub const FAIL: bool = false;

pub struct SimpleCheck {
    test_name: String,
    fail: bool,
    log: Arc<dyn CanaryLog>,
}

impl SimpleCheck {
    pub fn new(test_name: &str, log: Arc<dyn CanaryLog>) -> Self {
        Self {
            test_name: test_name.to_string(),
            fail: FAIL,
            log,
        }
    }

    /// Label from `TEST_NAME`, or `DEFAULT_TEST_NAME` when it is unset.
    pub fn from_config(config: &CanaryConfig, log: Arc<dyn CanaryLog>) -> Self {
        Self::new(config.test_name.as_deref().unwrap_or(DEFAULT_TEST_NAME), log)
    }

    /// Override the `FAIL` toggle for this instance.
    pub fn fail(mut self, fail: bool) -> Self {
        self.fail = fail;
        self
    }
}

#[async_trait]
impl Check for SimpleCheck {
    fn name(&self) -> &str {
        "simple"
    }

    async fn run(&self) -> Result<String, CheckError> {
        if self.fail {
            let err = CheckError::Assertion(format!("Failed {} check.", self.test_name));
            self.log
                .error(&format!("Simple check error: {err}"), Some(format!("{err:?}").as_str()));
            return Err(err);
        }
        Ok(format!("Successfully completed {} checks.", self.test_name))
    }
}
