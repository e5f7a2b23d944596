//! Page-load canary and the browser seam it drives.
//!
//! # Design
//! `Browser` and `Page` describe the handful of automation calls the canary
//! needs: open a page, navigate with a wait condition and timeout, wait,
//! screenshot, read the title. The check owns no rendering logic.
//!
//! `HttpBrowser` is the adapter the runner ships with. It does not render:
//! navigation is a single GET through an `HttpTransport`, the title comes
//! from the fetched document, and a "screenshot" is that document written to
//! the artifacts directory. Once the full body is read the DOM content is
//! available, so every `WaitUntil` condition is met on return.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::check::Check;
use crate::config::{CanaryConfig, DEFAULT_PAGE_SETTLE};
use crate::error::CheckError;
use crate::http::{HttpRequest, HttpTransport};
use crate::log::CanaryLog;

/// Status codes that count as a loaded page.
pub const ACCEPTED_STATUS: RangeInclusive<u16> = 200..=299;

const LOAD_FAILED: &str = "Failed to load page!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    Load,
    DomContentLoaded,
}

/// Main-document response observed during navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub url: String,
    pub status: u16,
}

#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn Page>, CheckError>;
}

#[async_trait]
pub trait Page: Send {
    /// Navigate to `url`. `Ok(None)` means navigation finished without a
    /// main-document response.
    async fn goto(
        &mut self,
        url: &str,
        wait_until: WaitUntil,
        timeout: Option<Duration>,
    ) -> Result<Option<PageResponse>, CheckError>;

    async fn wait_for(&mut self, duration: Duration);

    async fn screenshot(&mut self, name: &str) -> Result<(), CheckError>;

    async fn title(&mut self) -> Result<String, CheckError>;
}

pub struct PageLoadCheck<B> {
    endpoint: String,
    timeout: Option<Duration>,
    settle: Duration,
    browser: B,
    log: Arc<dyn CanaryLog>,
}

impl<B: Browser> PageLoadCheck<B> {
    pub fn new(endpoint: &str, timeout: Option<Duration>, browser: B, log: Arc<dyn CanaryLog>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            timeout,
            settle: DEFAULT_PAGE_SETTLE,
            browser,
            log,
        }
    }

    /// Build from `ENDPOINT` and `PAGE_LOAD_TIMEOUT`.
    pub fn from_config(config: &CanaryConfig, browser: B, log: Arc<dyn CanaryLog>) -> Result<Self, CheckError> {
        Ok(Self::new(
            config.require_endpoint()?,
            config.page_load_timeout()?,
            browser,
            log,
        ))
    }

    /// Replace the fixed delay between navigation and screenshot.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    async fn load(&self) -> Result<(), CheckError> {
        let mut page = self.browser.new_page().await?;

        let response = page
            .goto(&self.endpoint, WaitUntil::DomContentLoaded, self.timeout)
            .await?
            .ok_or_else(|| CheckError::Navigation(LOAD_FAILED.to_string()))?;

        page.wait_for(self.settle).await;
        page.screenshot("loaded").await?;

        let title = page.title().await?;
        self.log.info(&format!("Page title: {title}"));

        if !ACCEPTED_STATUS.contains(&response.status) {
            return Err(CheckError::Navigation(format!(
                "{LOAD_FAILED} (status {})",
                response.status
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<B: Browser> Check for PageLoadCheck<B> {
    fn name(&self) -> &str {
        "web"
    }

    async fn run(&self) -> Result<String, CheckError> {
        if let Err(err) = self.load().await {
            self.log
                .error(&format!("Page load error: {err}"), Some(format!("{err:?}").as_str()));
            return Err(err);
        }
        Ok(format!("Successfully loaded {}", self.endpoint))
    }
}

/// Non-rendering `Browser` that fetches pages over HTTP.
#[derive(Clone)]
pub struct HttpBrowser {
    transport: Arc<dyn HttpTransport>,
    artifacts: PathBuf,
}

impl HttpBrowser {
    pub fn new(transport: Arc<dyn HttpTransport>, artifacts: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            artifacts: artifacts.into(),
        }
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>, CheckError> {
        Ok(Box::new(HttpPage {
            transport: self.transport.clone(),
            artifacts: self.artifacts.clone(),
            document: None,
        }))
    }
}

struct HttpPage {
    transport: Arc<dyn HttpTransport>,
    artifacts: PathBuf,
    document: Option<String>,
}

#[async_trait]
impl Page for HttpPage {
    async fn goto(
        &mut self,
        url: &str,
        _wait_until: WaitUntil,
        timeout: Option<Duration>,
    ) -> Result<Option<PageResponse>, CheckError> {
        let request = HttpRequest::get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .timeout(timeout);
        let response = self.transport.execute(request).await?;

        self.document = Some(response.body);
        Ok(Some(PageResponse {
            url: url.to_string(),
            status: response.status,
        }))
    }

    async fn wait_for(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn screenshot(&mut self, name: &str) -> Result<(), CheckError> {
        let path = self.artifacts.join(format!("{name}.html"));
        write_artifact(&path, self.document.as_deref().unwrap_or_default())
            .await
            .map_err(|e| CheckError::Navigation(format!("failed to save {}: {e}", path.display())))
    }

    async fn title(&mut self) -> Result<String, CheckError> {
        Ok(self
            .document
            .as_deref()
            .and_then(extract_title)
            .unwrap_or_default())
    }
}

async fn write_artifact(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await
}

/// Text of the first `<title>` element, whitespace collapsed.
pub fn extract_title(html: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with `html`.
    let lower = html.to_ascii_lowercase();
    let open = lower.find("<title")?;
    let start = open + lower[open..].find('>')? + 1;
    let end = start + lower[start..].find("</title")?;
    Some(html[start..end].split_whitespace().collect::<Vec<_>>().join(" "))
}
