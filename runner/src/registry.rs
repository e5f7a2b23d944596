//! Maps check names to constructed checks.

use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;

use canary_core::{
    ApiCheck, CanaryConfig, CanaryLog, Check, CheckError, DynamoDbTables, HttpBrowser,
    ListTablesCheck, PageLoadCheck, ParametersByPathCheck, ReqwestTransport, SimpleCheck,
    SsmParameters, UuidCheck,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckKind {
    /// GET `ENDPOINT` with `API_KEY` headers; passes on 200
    Api,
    /// DynamoDB ListTables
    ListTables,
    /// SSM GetParametersByPath under /cwsyn/
    Parameters,
    /// Generate a UUID v4
    Deps,
    /// Always passes; reports `TEST_NAME`
    Simple,
    /// Load `ENDPOINT` as a page; passes on 2xx
    Web,
}

impl CheckKind {
    pub fn name(self) -> &'static str {
        match self {
            CheckKind::Api => "api",
            CheckKind::ListTables => "list-tables",
            CheckKind::Parameters => "parameters",
            CheckKind::Deps => "deps",
            CheckKind::Simple => "simple",
            CheckKind::Web => "web",
        }
    }

    /// Environment keys the check reads.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            CheckKind::Api => &["ENDPOINT", "API_KEY", "RESPONSE_TIMEOUT"],
            CheckKind::ListTables | CheckKind::Parameters => &[
                "AWS_REGION",
                "AWS_ACCESS_KEY_ID",
                "AWS_SECRET_ACCESS_KEY",
                "AWS_SESSION_TOKEN",
                "AWS_ENDPOINT_URL",
            ],
            CheckKind::Deps => &[],
            CheckKind::Simple => &["TEST_NAME"],
            CheckKind::Web => &["ENDPOINT", "PAGE_LOAD_TIMEOUT"],
        }
    }
}

pub fn build_check(
    kind: CheckKind,
    config: &CanaryConfig,
    artifacts: &Path,
    log: Arc<dyn CanaryLog>,
) -> Result<Box<dyn Check>, CheckError> {
    let check: Box<dyn Check> = match kind {
        CheckKind::Api => Box::new(ApiCheck::from_config(config, log)?),
        CheckKind::ListTables => Box::new(ListTablesCheck::new(
            DynamoDbTables::from_config(&config.aws)?,
            log,
        )),
        CheckKind::Parameters => Box::new(ParametersByPathCheck::new(
            SsmParameters::from_config(&config.aws)?,
            log,
        )),
        CheckKind::Deps => Box::new(UuidCheck::new(log)),
        CheckKind::Simple => Box::new(SimpleCheck::from_config(config, log)),
        CheckKind::Web => {
            let browser = HttpBrowser::new(Arc::new(ReqwestTransport::new()), artifacts);
            Box::new(PageLoadCheck::from_config(config, browser, log)?)
        }
    };
    Ok(check)
}
