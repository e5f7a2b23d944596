//! Cloud API canaries.
//!
//! Each check invokes one service operation through a small trait and passes
//! when the operation completes. The operation's response is logged as JSON;
//! its content is not inspected.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::check::Check;
use crate::config::DEFAULT_PARAMETER_PATH;
use crate::error::CheckError;
use crate::log::CanaryLog;

/// DynamoDB `ListTables`.
#[async_trait]
pub trait TableLister: Send + Sync {
    async fn list_tables(&self) -> Result<Value, CheckError>;
}

/// SSM `GetParametersByPath`.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    async fn get_parameters_by_path(&self, path: &str, recursive: bool) -> Result<Value, CheckError>;
}

pub struct ListTablesCheck<L> {
    tables: L,
    log: Arc<dyn CanaryLog>,
}

impl<L: TableLister> ListTablesCheck<L> {
    pub fn new(tables: L, log: Arc<dyn CanaryLog>) -> Self {
        Self { tables, log }
    }
}

#[async_trait]
impl<L: TableLister> Check for ListTablesCheck<L> {
    fn name(&self) -> &str {
        "list-tables"
    }

    async fn run(&self) -> Result<String, CheckError> {
        self.log.info("Starting DynamoDB:listTables canary.");

        match self.tables.list_tables().await {
            Ok(response) => self.log.info(&format!("listTables response: {response}")),
            Err(err) => {
                self.log
                    .error(&format!("listTables error: {err}"), Some(format!("{err:?}").as_str()));
                return Err(err);
            }
        }

        Ok("Successfully completed DynamoDB:listTables canary.".to_string())
    }
}

pub struct ParametersByPathCheck<S> {
    store: S,
    path: String,
    recursive: bool,
    log: Arc<dyn CanaryLog>,
}

impl<S: ParameterStore> ParametersByPathCheck<S> {
    /// Query `/cwsyn/` recursively.
    pub fn new(store: S, log: Arc<dyn CanaryLog>) -> Self {
        Self::with_path(store, DEFAULT_PARAMETER_PATH, true, log)
    }

    pub fn with_path(store: S, path: &str, recursive: bool, log: Arc<dyn CanaryLog>) -> Self {
        Self {
            store,
            path: path.to_string(),
            recursive,
            log,
        }
    }
}

#[async_trait]
impl<S: ParameterStore> Check for ParametersByPathCheck<S> {
    fn name(&self) -> &str {
        "parameters"
    }

    async fn run(&self) -> Result<String, CheckError> {
        self.log.info("Starting SSM:GetParametersByPath canary.");

        match self.store.get_parameters_by_path(&self.path, self.recursive).await {
            Ok(response) => self
                .log
                .info(&format!("getParametersByPath response: {response}")),
            Err(err) => {
                self.log.error(
                    &format!("getParametersByPath error: {err}"),
                    Some(format!("{err:?}").as_str()),
                );
                return Err(err);
            }
        }

        Ok("Successfully completed SSM:GetParametersByPath canary.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::MemoryLog;
    use serde_json::json;
    use std::sync::Mutex;

    struct Tables(Result<Value, ()>);

    #[async_trait]
    impl TableLister for Tables {
        async fn list_tables(&self) -> Result<Value, CheckError> {
            self.0.clone().map_err(|_| CheckError::Api {
                operation: "DynamoDB:listTables".to_string(),
                message: "AccessDeniedException".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct Store {
        calls: Mutex<Vec<(String, bool)>>,
        reject: bool,
    }

    #[async_trait]
    impl ParameterStore for Store {
        async fn get_parameters_by_path(&self, path: &str, recursive: bool) -> Result<Value, CheckError> {
            self.calls.lock().unwrap().push((path.to_string(), recursive));
            if self.reject {
                return Err(CheckError::Api {
                    operation: "SSM:GetParametersByPath".to_string(),
                    message: "ThrottlingException".to_string(),
                });
            }
            Ok(json!({ "Parameters": [{ "Name": "/cwsyn/endpoint" }] }))
        }
    }

    #[tokio::test]
    async fn list_tables_success_logs_start_and_response() {
        let log = Arc::new(MemoryLog::new());
        let check = ListTablesCheck::new(Tables(Ok(json!({ "TableNames": ["orders"] }))), log.clone());

        let message = check.run().await.unwrap();
        assert_eq!(message, "Successfully completed DynamoDB:listTables canary.");
        assert_eq!(
            log.infos(),
            vec![
                "Starting DynamoDB:listTables canary.".to_string(),
                r#"listTables response: {"TableNames":["orders"]}"#.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn list_tables_rejection_is_api_error() {
        let log = Arc::new(MemoryLog::new());
        let check = ListTablesCheck::new(Tables(Err(())), log.clone());

        let err = check.run().await.unwrap_err();
        assert_eq!(err.kind(), "api");
        assert_eq!(
            log.errors(),
            vec!["listTables error: DynamoDB:listTables failed: AccessDeniedException"]
        );
    }

    #[tokio::test]
    async fn parameters_query_default_path_recursively() {
        let log = Arc::new(MemoryLog::new());
        let check = ParametersByPathCheck::new(Store::default(), log.clone());

        let message = check.run().await.unwrap();
        assert_eq!(message, "Successfully completed SSM:GetParametersByPath canary.");
        assert_eq!(
            *check.store.calls.lock().unwrap(),
            vec![("/cwsyn/".to_string(), true)]
        );
        assert!(log.infos()[1].starts_with("getParametersByPath response: "));
    }

    #[tokio::test]
    async fn parameters_rejection_propagates() {
        let log = Arc::new(MemoryLog::new());
        let store = Store {
            reject: true,
            ..Store::default()
        };
        let check = ParametersByPathCheck::new(store, log.clone());

        let err = check.run().await.unwrap_err();
        assert!(matches!(err, CheckError::Api { ref message, .. } if message == "ThrottlingException"));
        assert_eq!(log.errors().len(), 1);
    }
}
