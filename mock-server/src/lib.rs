use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Html,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Body returned by the JSON endpoints.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusBody {
    pub status: u16,
}

/// API key `/protected` expects in both `app-id` and `x-api-key`.
pub type ApiKey = Arc<Option<String>>;

pub fn app() -> Router {
    app_with_api_key(None)
}

pub fn app_with_api_key(api_key: Option<&str>) -> Router {
    let key: ApiKey = Arc::new(api_key.map(str::to_string));
    Router::new()
        .route("/status/{code}", get(status))
        .route("/delay/{ms}", get(delay))
        .route("/headers", get(echo_headers))
        .route("/protected", get(protected))
        .route("/page/{code}", get(page))
        .with_state(key)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_api_key(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_api_key(Some(api_key))).await
}

fn parse_status(code: u16) -> Result<StatusCode, StatusCode> {
    StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, Json<StatusBody>), StatusCode> {
    let status = parse_status(code)?;
    Ok((status, Json(StatusBody { status: code })))
}

async fn delay(Path(ms): Path<u64>) -> Json<StatusBody> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(StatusBody { status: 200 })
}

async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    Json(
        headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect(),
    )
}

async fn protected(State(key): State<ApiKey>, headers: HeaderMap) -> (StatusCode, Json<StatusBody>) {
    let presented = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let authorized = match key.as_deref() {
        Some(expected) => {
            presented("app-id") == Some(expected) && presented("x-api-key") == Some(expected)
        }
        None => true,
    };
    let status = if authorized {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(StatusBody { status: status.as_u16() }))
}

async fn page(Path(code): Path<u16>) -> Result<(StatusCode, Html<String>), StatusCode> {
    let status = parse_status(code)?;
    Ok((status, Html(render_page(code))))
}

pub fn render_page(code: u16) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n    <title>Mock page {code}</title>\n</head>\n<body>\n    <h1>Status {code}</h1>\n</body>\n</html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_body_serializes_to_json() {
        let json = serde_json::to_value(StatusBody { status: 503 }).unwrap();
        assert_eq!(json["status"], 503);
    }

    #[test]
    fn out_of_range_code_is_bad_request() {
        assert_eq!(parse_status(42), Err(StatusCode::BAD_REQUEST));
        assert_eq!(parse_status(204), Ok(StatusCode::NO_CONTENT));
    }

    #[test]
    fn rendered_page_has_title() {
        let html = render_page(200);
        assert!(html.contains("<title>Mock page 200</title>"));
    }
}
