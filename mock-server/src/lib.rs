//! Local HTTP fixture server for exercising the transports end to end.
//!
//! Every route returns a fixed, predictable shape so that tests can assert on
//! status, headers and body without reaching the public network.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// `Content-Disposition` sent by `/download`.
pub const DOWNLOAD_DISPOSITION: &str = "attachment; filename=\"café.txt\"";

/// What `/echo` saw of the incoming request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Echo {
    /// All values received for `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/echo", any(echo))
        .route("/cookies", get(cookies))
        .route("/encoded", get(encoded))
        .route("/download", get(download))
        .route("/redirect/{hops}", get(redirect))
        .route("/status/{code}", get(status))
        .route("/slow/{secs}", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn hello() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html")], "Hello, World!")
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn cookies() -> (HeaderMap, &'static str) {
    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, HeaderValue::from_static("cookie1=value1"));
    headers.append(header::SET_COOKIE, HeaderValue::from_static("cookie2=value2"));
    headers.insert("x-custom-header", HeaderValue::from_static("custom value"));
    (headers, "cookies set")
}

/// Claims gzip but sends plain bytes; a client that decodes fails on it.
async fn encoded() -> impl IntoResponse {
    ([(header::CONTENT_ENCODING, "gzip")], "not really gzip")
}

/// A `Content-Disposition` whose file name is UTF-8, not ASCII.
async fn download() -> (HeaderMap, &'static str) {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_bytes(DOWNLOAD_DISPOSITION.as_bytes()) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    (headers, "file contents")
}

/// Each hop points at the next one down; `/redirect/0` lands on `/hello`.
async fn redirect(Path(hops): Path<u32>) -> impl IntoResponse {
    let target = match hops {
        0 => "/hello".to_string(),
        n => format!("/redirect/{}", n - 1),
    };
    (StatusCode::FOUND, [(header::LOCATION, target)])
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn slow(Path(secs): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_secs(secs)).await;
    "finally"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_serializes_headers_as_pairs() {
        let echo = Echo {
            method: "GET".to_string(),
            headers: vec![("user-agent".to_string(), "Mozilla/5.0".to_string())],
            body: String::new(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["headers"][0][0], "user-agent");
        assert_eq!(json["headers"][0][1], "Mozilla/5.0");
        assert_eq!(json["body"], "");
    }

    #[test]
    fn echo_header_lookup_ignores_case_and_keeps_order() {
        let echo = Echo {
            method: "GET".to_string(),
            headers: vec![
                ("x-tag".to_string(), "one".to_string()),
                ("accept".to_string(), "*/*".to_string()),
                ("x-tag".to_string(), "two".to_string()),
            ],
            body: String::new(),
        };
        assert_eq!(echo.header("X-Tag"), vec!["one", "two"]);
        assert!(echo.header("missing").is_empty());
    }
}
