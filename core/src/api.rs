//! HTTP API canary.
//!
//! Sends one authenticated GET to the configured endpoint and passes only on
//! a 200. The API key goes out twice, as `app-id` and `x-api-key`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::check::Check;
use crate::config::CanaryConfig;
use crate::error::CheckError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::log::CanaryLog;

pub struct ApiCheck<T = ReqwestTransport> {
    endpoint: String,
    api_key: String,
    timeout: Option<Duration>,
    transport: T,
    log: Arc<dyn CanaryLog>,
}

impl ApiCheck<ReqwestTransport> {
    /// Build from `ENDPOINT`, `API_KEY` and `RESPONSE_TIMEOUT`.
    pub fn from_config(config: &CanaryConfig, log: Arc<dyn CanaryLog>) -> Result<Self, CheckError> {
        Ok(Self::new(
            config.require_endpoint()?,
            config.require_api_key()?,
            config.response_timeout()?,
            ReqwestTransport::new(),
            log,
        ))
    }
}

impl<T: HttpTransport> ApiCheck<T> {
    pub fn new(
        endpoint: &str,
        api_key: &str,
        timeout: Option<Duration>,
        transport: T,
        log: Arc<dyn CanaryLog>,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            timeout,
            transport,
            log,
        }
    }

    pub fn build_request(&self) -> HttpRequest {
        HttpRequest::get(self.endpoint.as_str())
            .header("app-id", self.api_key.as_str())
            .header("x-api-key", self.api_key.as_str())
            .timeout(self.timeout)
    }

    async fn call(&self) -> Result<(), CheckError> {
        let response = self.transport.execute(self.build_request()).await?;
        self.log.info(&format!("API response: {}", to_json(&response)));
        check_status(response)
    }
}

#[async_trait]
impl<T: HttpTransport> Check for ApiCheck<T> {
    fn name(&self) -> &str {
        "api"
    }

    async fn run(&self) -> Result<String, CheckError> {
        if let Err(err) = self.call().await {
            self.log
                .error(&format!("API error: {err}"), Some(format!("{err:?}").as_str()));
            return Err(err);
        }
        Ok(format!("Successfully completed {} API checks.", self.endpoint))
    }
}

fn check_status(response: HttpResponse) -> Result<(), CheckError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(CheckError::Status {
        status: response.status,
        body: response.body,
    })
}

fn to_json(response: &HttpResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| format!("{response:?}"))
}
