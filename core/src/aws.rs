//! AWS SDK adapters for the cloud canaries.

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use serde_json::{json, Value};

use crate::cloud::{ParameterStore, TableLister};
use crate::config::AwsConfig;
use crate::error::CheckError;

const PROVIDER_NAME: &str = "canary-env";

pub struct DynamoDbTables {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoDbTables {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }

    pub fn from_config(cfg: &AwsConfig) -> Result<Self, CheckError> {
        use aws_sdk_dynamodb::config::{Credentials, Region};

        let mut builder = aws_sdk_dynamodb::Config::builder().region(Region::new(require_region(cfg)?));
        if let (Some(access), Some(secret)) = (&cfg.access_key_id, &cfg.secret_access_key) {
            builder = builder.credentials_provider(Credentials::new(
                access,
                secret,
                cfg.session_token.clone(),
                None,
                PROVIDER_NAME,
            ));
        }
        if let Some(endpoint) = &cfg.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }
        Ok(Self::new(aws_sdk_dynamodb::Client::from_conf(builder.build())))
    }
}

#[async_trait]
impl TableLister for DynamoDbTables {
    async fn list_tables(&self) -> Result<Value, CheckError> {
        let output = self
            .client
            .list_tables()
            .send()
            .await
            .map_err(|e| api_error("DynamoDB:listTables", DisplayErrorContext(&e)))?;

        Ok(json!({
            "TableNames": output.table_names(),
            "LastEvaluatedTableName": output.last_evaluated_table_name(),
        }))
    }
}

pub struct SsmParameters {
    client: aws_sdk_ssm::Client,
}

impl SsmParameters {
    pub fn new(client: aws_sdk_ssm::Client) -> Self {
        Self { client }
    }

    pub fn from_config(cfg: &AwsConfig) -> Result<Self, CheckError> {
        use aws_sdk_ssm::config::{Credentials, Region};

        let mut builder = aws_sdk_ssm::Config::builder().region(Region::new(require_region(cfg)?));
        if let (Some(access), Some(secret)) = (&cfg.access_key_id, &cfg.secret_access_key) {
            builder = builder.credentials_provider(Credentials::new(
                access,
                secret,
                cfg.session_token.clone(),
                None,
                PROVIDER_NAME,
            ));
        }
        if let Some(endpoint) = &cfg.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }
        Ok(Self::new(aws_sdk_ssm::Client::from_conf(builder.build())))
    }
}

#[async_trait]
impl ParameterStore for SsmParameters {
    async fn get_parameters_by_path(&self, path: &str, recursive: bool) -> Result<Value, CheckError> {
        let output = self
            .client
            .get_parameters_by_path()
            .path(path)
            .recursive(recursive)
            .send()
            .await
            .map_err(|e| {
                api_error(
                    "SSM:GetParametersByPath",
                    aws_sdk_ssm::error::DisplayErrorContext(&e),
                )
            })?;

        // Values may be SecureStrings; only names and types reach the log.
        let parameters: Vec<Value> = output
            .parameters()
            .iter()
            .map(|p| {
                json!({
                    "Name": p.name(),
                    "Type": p.r#type().map(|t| t.as_str()),
                })
            })
            .collect();

        Ok(json!({
            "Parameters": parameters,
            "NextToken": output.next_token(),
        }))
    }
}

fn require_region(cfg: &AwsConfig) -> Result<String, CheckError> {
    cfg.region
        .clone()
        .ok_or_else(|| CheckError::Config("AWS_REGION is not set".to_string()))
}

fn api_error(operation: &str, err: impl std::fmt::Display) -> CheckError {
    CheckError::Api {
        operation: operation.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_is_required() {
        let cfg = AwsConfig::default();
        assert!(matches!(DynamoDbTables::from_config(&cfg), Err(CheckError::Config(_))));
        assert!(matches!(SsmParameters::from_config(&cfg), Err(CheckError::Config(_))));
    }

    #[test]
    fn clients_build_with_static_credentials_and_endpoint() {
        let cfg = AwsConfig {
            region: Some("eu-west-1".to_string()),
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            secret_access_key: Some("secret".to_string()),
            session_token: None,
            endpoint_url: Some("http://localhost:4566".to_string()),
        };
        assert!(DynamoDbTables::from_config(&cfg).is_ok());
        assert!(SsmParameters::from_config(&cfg).is_ok());
    }
}
