//! Canary configuration.
//!
//! # Design
//! Checks never read the environment themselves. The host builds a
//! `CanaryConfig` at call time (`from_env`) and hands the fields each check
//! needs to its constructor. `from_lookup` takes any key lookup so tests can
//! supply a map instead of mutating the process environment.

use std::time::Duration;

use crate::error::CheckError;

pub const ENDPOINT: &str = "ENDPOINT";
pub const RESPONSE_TIMEOUT: &str = "RESPONSE_TIMEOUT";
pub const API_KEY: &str = "API_KEY";
pub const TEST_NAME: &str = "TEST_NAME";
pub const PAGE_LOAD_TIMEOUT: &str = "PAGE_LOAD_TIMEOUT";

/// Settle delay the page-load check waits after navigation.
pub const DEFAULT_PAGE_SETTLE: Duration = Duration::from_secs(15);

/// Label the simple check reports when `TEST_NAME` is unset.
pub const DEFAULT_TEST_NAME: &str = "unnamed";

/// Parameter path queried by the SSM canary.
pub const DEFAULT_PARAMETER_PATH: &str = "/cwsyn/";

/// Settings read from the environment for a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanaryConfig {
    /// Target URL for the HTTP and page-load checks.
    pub endpoint: Option<String>,
    /// Raw `RESPONSE_TIMEOUT`; parsed by `response_timeout`.
    pub response_timeout_ms: Option<String>,
    /// Sent as both `app-id` and `x-api-key`.
    pub api_key: Option<String>,
    /// Label used in the simple check's messages.
    pub test_name: Option<String>,
    /// Raw `PAGE_LOAD_TIMEOUT`; parsed by `page_load_timeout`.
    pub page_load_timeout_ms: Option<String>,
    pub aws: AwsConfig,
}

/// Region, credentials and endpoint override for the cloud checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub endpoint_url: Option<String>,
}

impl CanaryConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, CheckError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    ///
    /// Values are kept as read; each check parses only the keys it uses.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CheckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            endpoint: get(ENDPOINT),
            response_timeout_ms: get(RESPONSE_TIMEOUT),
            api_key: get(API_KEY),
            test_name: get(TEST_NAME),
            page_load_timeout_ms: get(PAGE_LOAD_TIMEOUT),
            aws: AwsConfig {
                region: get("AWS_REGION").or_else(|| get("AWS_DEFAULT_REGION")),
                access_key_id: get("AWS_ACCESS_KEY_ID"),
                secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
                session_token: get("AWS_SESSION_TOKEN"),
                endpoint_url: get("AWS_ENDPOINT_URL"),
            },
        })
    }

    pub fn require_endpoint(&self) -> Result<&str, CheckError> {
        self.endpoint.as_deref().ok_or_else(|| missing(ENDPOINT))
    }

    pub fn require_api_key(&self) -> Result<&str, CheckError> {
        self.api_key.as_deref().ok_or_else(|| missing(API_KEY))
    }

    /// HTTP deadline from `RESPONSE_TIMEOUT`. `None` when unset or `0`.
    pub fn response_timeout(&self) -> Result<Option<Duration>, CheckError> {
        parse_millis(RESPONSE_TIMEOUT, self.response_timeout_ms.as_deref())
    }

    /// Navigation timeout from `PAGE_LOAD_TIMEOUT`. `None` when unset or `0`.
    pub fn page_load_timeout(&self) -> Result<Option<Duration>, CheckError> {
        parse_millis(PAGE_LOAD_TIMEOUT, self.page_load_timeout_ms.as_deref())
    }
}

fn missing(key: &str) -> CheckError {
    CheckError::Config(format!("{key} is not set"))
}

// Zero disables the deadline.
fn parse_millis(key: &str, raw: Option<&str>) -> Result<Option<Duration>, CheckError> {
    let Some(v) = raw else {
        return Ok(None);
    };
    match v.trim().parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(ms) => Ok(Some(Duration::from_millis(ms))),
        Err(_) => Err(CheckError::Config(format!(
            "{key} must be milliseconds, got {v:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<CanaryConfig, CheckError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CanaryConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn reads_all_recognized_keys() {
        let cfg = config(&[
            (ENDPOINT, "https://api.example.com/health"),
            (RESPONSE_TIMEOUT, "5000"),
            (API_KEY, "k3y"),
            (TEST_NAME, "smoke"),
            (PAGE_LOAD_TIMEOUT, "30000"),
            ("AWS_REGION", "eu-west-1"),
        ])
        .unwrap();

        assert_eq!(cfg.endpoint.as_deref(), Some("https://api.example.com/health"));
        assert_eq!(cfg.response_timeout().unwrap(), Some(Duration::from_millis(5000)));
        assert_eq!(cfg.api_key.as_deref(), Some("k3y"));
        assert_eq!(cfg.test_name.as_deref(), Some("smoke"));
        assert_eq!(cfg.page_load_timeout().unwrap(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.aws.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg, CanaryConfig::default());
    }

    #[test]
    fn blank_values_are_unset() {
        let cfg = config(&[(ENDPOINT, "  "), (API_KEY, "")]).unwrap();
        assert!(cfg.endpoint.is_none());
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn default_region_is_fallback() {
        let cfg = config(&[("AWS_DEFAULT_REGION", "us-east-1")]).unwrap();
        assert_eq!(cfg.aws.region.as_deref(), Some("us-east-1"));

        let cfg = config(&[("AWS_DEFAULT_REGION", "us-east-1"), ("AWS_REGION", "eu-south-1")]).unwrap();
        assert_eq!(cfg.aws.region.as_deref(), Some("eu-south-1"));
    }

    #[test]
    fn malformed_timeout_fails_only_when_parsed() {
        let cfg = config(&[(RESPONSE_TIMEOUT, "soon"), (PAGE_LOAD_TIMEOUT, "30s")]).unwrap();

        let err = cfg.response_timeout().unwrap_err();
        assert!(matches!(err, CheckError::Config(ref msg) if msg.contains(RESPONSE_TIMEOUT)));
        let err = cfg.page_load_timeout().unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: PAGE_LOAD_TIMEOUT must be milliseconds, got \"30s\""
        );
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        let cfg = config(&[(RESPONSE_TIMEOUT, "0"), (PAGE_LOAD_TIMEOUT, " 0 ")]).unwrap();
        assert_eq!(cfg.response_timeout().unwrap(), None);
        assert_eq!(cfg.page_load_timeout().unwrap(), None);
    }

    #[test]
    fn unset_timeout_is_none() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.response_timeout().unwrap(), None);
        assert_eq!(cfg.page_load_timeout().unwrap(), None);
    }

    #[test]
    fn require_reports_missing_key() {
        let cfg = config(&[]).unwrap();
        let err = cfg.require_endpoint().unwrap_err();
        assert_eq!(err.to_string(), "configuration error: ENDPOINT is not set");
        assert!(cfg.require_api_key().is_err());
    }
}
