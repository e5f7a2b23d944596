//! Dependency canary: proves an identifier library is present and working.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::check::Check;
use crate::error::{BoxError, CheckError};
use crate::log::CanaryLog;

/// Source of unique identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Result<String, BoxError>;
}

/// Random (version 4) UUIDs in hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4;

impl IdGenerator for UuidV4 {
    fn generate(&self) -> Result<String, BoxError> {
        Ok(Uuid::new_v4().to_string())
    }
}

pub struct UuidCheck<G = UuidV4> {
    generator: G,
    log: Arc<dyn CanaryLog>,
}

impl UuidCheck<UuidV4> {
    pub fn new(log: Arc<dyn CanaryLog>) -> Self {
        Self::with_generator(UuidV4, log)
    }
}

impl<G: IdGenerator> UuidCheck<G> {
    pub fn with_generator(generator: G, log: Arc<dyn CanaryLog>) -> Self {
        Self { generator, log }
    }

    fn generate(&self) -> Result<String, CheckError> {
        let id = self
            .generator
            .generate()
            .map_err(|e| CheckError::Generation(e.to_string()))?;

        if id.is_empty() {
            return Err(CheckError::Generation("string empty".to_string()));
        }
        Ok(id)
    }
}

#[async_trait]
impl<G: IdGenerator> Check for UuidCheck<G> {
    fn name(&self) -> &str {
        "deps"
    }

    async fn run(&self) -> Result<String, CheckError> {
        match self.generate() {
            Ok(id) => Ok(format!("Successfully created uuid string: {id}")),
            Err(err) => {
                self.log
                    .error(&format!("uuid error: {err}"), Some(format!("{err:?}").as_str()));
                Err(err)
            }
        }
    }
}
