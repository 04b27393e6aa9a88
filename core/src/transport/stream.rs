//! Transport backed by a blocking response stream.
//!
//! # Design
//! Every send builds a `StreamContext` from the request and the current
//! configuration, then opens a stream with a fresh `ureq` agent configured
//! from that context. The response status and header lines (the stream's
//! "wrapper data") are read before the body is drained.
//!
//! The agent adds no headers of its own beyond `Accept`: no `User-Agent`
//! and no `Accept-Encoding`, and bodies come back as the server sent them.
//!
//! A failure to open the stream carries no backend detail: the message is
//! always `Failed to send request`.

use std::time::Duration;

use bytes::Bytes;
use http::{Method, Request, Response, Uri};
use thiserror::Error;
use tracing::{debug, trace};
use ureq::config::AutoHeaderValue;
use ureq::{Agent, Body};

use super::{FakeResponse, HttpTransport};
use crate::config::TransportConfig;
use crate::error::{ClientError, NetworkError};
use crate::headers::{format_header_block, parse_incoming, HeaderFields};
use crate::response::{build_response, DefaultResponseFactory, ResponseFactory};

/// Options a stream is opened with, one set per send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamContext {
    pub method: Method,
    /// `"Name: value\r\n"` per header value.
    pub header: String,
    pub content: Bytes,
    /// `1` to follow redirects, `0` not to.
    pub follow_location: u8,
    pub max_redirects: u32,
    /// Seconds, `0` for none.
    pub timeout: u64,
}

impl StreamContext {
    /// The request body is only taken when it is non-empty.
    pub fn new(request: &Request<Bytes>, config: &TransportConfig) -> Self {
        let content = if request.body().is_empty() {
            Bytes::new()
        } else {
            request.body().clone()
        };
        Self {
            method: request.method().clone(),
            header: format_header_block(&HeaderFields::from(request.headers())),
            content,
            follow_location: u8::from(config.follow_location),
            max_redirects: config.max_redirects,
            timeout: config.timeout,
        }
    }

    fn agent(&self) -> Agent {
        let redirects = if self.follow_location == 1 {
            self.max_redirects
        } else {
            0
        };
        let timeout = (self.timeout > 0).then(|| Duration::from_secs(self.timeout));

        Agent::config_builder()
            .http_status_as_error(false)
            .user_agent(AutoHeaderValue::None)
            .accept_encoding(AutoHeaderValue::None)
            .max_redirects(redirects)
            .timeout_global(timeout)
            .build()
            .new_agent()
    }

    /// Open a readable response stream for `uri`.
    pub fn open(&self, uri: &Uri) -> Result<Response<Body>, OpenError> {
        let mut builder = Request::builder()
            .method(self.method.clone())
            .uri(uri.clone());
        for line in self.header.split("\r\n") {
            if let Some((name, value)) = line.split_once(':') {
                builder = builder.header(name.trim(), value.trim());
            }
        }

        let agent = self.agent();
        let stream = if self.content.is_empty() {
            agent.run(builder.body(())?)?
        } else {
            agent.run(builder.body(self.content.to_vec())?)?
        };
        Ok(stream)
    }
}

/// Why a stream could not be opened.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("invalid request: {0}")]
    Request(#[from] http::Error),

    #[error(transparent)]
    Backend(#[from] ureq::Error),
}

/// Sends requests over a `ureq` response stream.
#[derive(Debug, Default)]
pub struct StreamTransport<F = DefaultResponseFactory> {
    factory: F,
    config: TransportConfig,
    fake_response: Option<FakeResponse>,
}

impl StreamTransport {
    pub fn new() -> Self {
        Self::with_factory(DefaultResponseFactory)
    }
}

impl<F: ResponseFactory> StreamTransport<F> {
    pub fn with_factory(factory: F) -> Self {
        Self {
            factory,
            config: TransportConfig::default(),
            fake_response: None,
        }
    }

    pub fn with_config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    fn parse_response(&self, stream: &mut Response<Body>) -> Result<Response<Bytes>, ClientError> {
        let headers = wrapper_data(stream);
        let body = stream
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|_| ClientError::client("Failed to read response"))?;
        trace!(status = %stream.status(), header_lines = headers.len(), body_len = body.len(), "stream drained");

        build_response(
            &self.factory,
            stream.status(),
            &parse_incoming(&headers),
            Bytes::from(body),
        )
    }
}

impl<F: ResponseFactory> HttpTransport for StreamTransport<F> {
    fn send_request(&self, request: Request<Bytes>) -> Result<Response<Bytes>, ClientError> {
        if let Some(fake) = &self.fake_response {
            return Ok(fake.to_response());
        }

        let context = StreamContext::new(&request, &self.config);
        debug!(method = %context.method, uri = %request.uri(), "opening request stream");

        let opened = context.open(request.uri());
        let mut stream = match opened {
            Ok(stream) => stream,
            Err(_) => return Err(NetworkError::new("Failed to send request", request).into()),
        };

        let response = self.parse_response(&mut stream);
        drop(stream);
        response
    }

    fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut TransportConfig {
        &mut self.config
    }

    fn set_fake_response(&mut self, response: Response<Bytes>) -> &mut Self {
        self.fake_response = Some(response.into());
        self
    }
}

/// The status line followed by one `name: value` line per header value.
/// Bytes that are not UTF-8 are replaced, as with request headers.
fn wrapper_data<B>(stream: &Response<B>) -> Vec<String> {
    let mut lines = Vec::with_capacity(stream.headers().len() + 1);
    lines.push(format!("{:?} {}", stream.version(), stream.status()));
    for (name, value) in stream.headers() {
        lines.push(format!("{name}: {}", String::from_utf8_lossy(value.as_bytes())));
    }
    lines
}
