//! Canary checks and the entry point that runs them.
//!
//! # Overview
//! A canary performs one external interaction (an HTTP call, a cloud API
//! operation, a page load, an identifier generation, or a fixed flag) and
//! reports a success message or a `CheckError`. The host calls `handler`,
//! which runs the check once and hands back its result unchanged.
//!
//! # Design
//! - Every external collaborator sits behind a trait (`HttpTransport`,
//!   `TableLister`, `ParameterStore`, `IdGenerator`, `Browser`, `CanaryLog`)
//!   so checks are testable without the network.
//! - Configuration arrives as an explicit `CanaryConfig`; checks never read
//!   the environment.
//! - Nothing is kept between invocations. Running a check twice against the
//!   same collaborators gives the same outcome.

pub mod api;
#[cfg(feature = "aws")]
pub mod aws;
pub mod check;
pub mod cloud;
pub mod config;
pub mod deps;
pub mod error;
pub mod http;
pub mod log;
pub mod simple;
pub mod web;

pub use api::ApiCheck;
#[cfg(feature = "aws")]
pub use aws::{DynamoDbTables, SsmParameters};
pub use check::{handler, Check};
pub use cloud::{ListTablesCheck, ParameterStore, ParametersByPathCheck, TableLister};
pub use config::{AwsConfig, CanaryConfig};
pub use deps::{IdGenerator, UuidCheck, UuidV4};
pub use error::CheckError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use log::{CanaryLog, MemoryLog, TracingLog};
pub use simple::SimpleCheck;
pub use web::{Browser, HttpBrowser, Page, PageLoadCheck, PageResponse, WaitUntil};
