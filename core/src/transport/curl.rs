//! Transport backed by libcurl.
//!
//! # Design
//! One easy handle per send. libcurl writes the response header block and
//! the body into a single buffer (`CURLOPT_HEADER`), and the header size
//! reported afterwards tells where one ends and the other begins. With
//! redirects followed, the block holds the headers of every hop.
//!
//! The handle lives in `send_request`'s frame, so it is cleaned up on every
//! return path, error or not.

use std::time::Duration;

use ::curl::easy::{Easy, List};
use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use tracing::{debug, trace};

use super::{FakeResponse, HttpTransport};
use crate::config::TransportConfig;
use crate::error::{ClientError, NetworkError};
use crate::headers::{format_outgoing, parse_incoming, HeaderFields};
use crate::response::{build_response, DefaultResponseFactory, ResponseFactory};

/// Sends requests through libcurl.
#[derive(Debug)]
pub struct CurlTransport<F = DefaultResponseFactory> {
    factory: F,
    config: TransportConfig,
    fake_response: Option<FakeResponse>,
}

impl CurlTransport {
    /// Fails when the linked libcurl cannot speak HTTP.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_factory(DefaultResponseFactory)
    }
}

impl<F: ResponseFactory> CurlTransport<F> {
    pub fn with_factory(factory: F) -> Result<Self, ClientError> {
        ensure_http_support()?;
        Ok(Self {
            factory,
            config: TransportConfig::default(),
            fake_response: None,
        })
    }

    pub fn with_config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure `easy` for one exchange and run it, returning everything
    /// libcurl wrote.
    fn perform(
        &self,
        easy: &mut Easy,
        method: &Method,
        uri: &str,
        headers: &HeaderFields,
        body: &[u8],
    ) -> Result<Vec<u8>, ::curl::Error> {
        easy.url(uri)?;
        easy.custom_request(method.as_str())?;
        if *method == Method::HEAD {
            easy.nobody(true)?;
        }
        easy.show_header(true)?;
        if !body.is_empty() || carries_body(method) {
            easy.post_fields_copy(body)?;
        }

        let mut list = List::new();
        for line in format_outgoing(headers) {
            list.append(&line)?;
        }
        easy.http_headers(list)?;

        easy.follow_location(self.config.follow_location)?;
        easy.max_redirections(self.config.max_redirects)?;
        easy.timeout(Duration::from_secs(self.config.timeout))?;

        let mut buffer = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                buffer.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }
        Ok(buffer)
    }
}

impl<F: ResponseFactory> HttpTransport for CurlTransport<F> {
    fn send_request(&self, request: Request<Bytes>) -> Result<Response<Bytes>, ClientError> {
        if let Some(fake) = &self.fake_response {
            return Ok(fake.to_response());
        }

        let uri = request.uri().to_string();
        let headers = HeaderFields::from(request.headers());
        debug!(method = %request.method(), %uri, "sending request through libcurl");

        let mut easy = Easy::new();
        let outcome = self.perform(&mut easy, request.method(), &uri, &headers, request.body());
        let buffer = match outcome {
            Ok(buffer) => buffer,
            Err(err) => {
                let message = format!("Failed to send request: {}", describe(&err));
                return Err(NetworkError::new(message, request).into());
            }
        };

        let code = easy
            .response_code()
            .map_err(|_| ClientError::client("Failed to retrieve HTTP code"))?;
        let header_size = easy
            .header_size()
            .map_err(|_| ClientError::client("Failed to retrieve header size"))?;
        drop(easy);

        let status = u16::try_from(code)
            .ok()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .ok_or_else(|| ClientError::client("Failed to retrieve HTTP code"))?;
        let header_size = usize::try_from(header_size).unwrap_or(usize::MAX);
        let (raw_headers, body) = split_combined(buffer, header_size);
        trace!(%status, header_lines = raw_headers.len(), body_len = body.len(), "libcurl transfer done");

        build_response(&self.factory, status, &parse_incoming(&raw_headers), body)
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

/// Methods sent with a `Content-Length` even when the body is empty.
fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

fn ensure_http_support() -> Result<(), ClientError> {
    ::curl::init();
    let version = ::curl::Version::get();
    if version.protocols().any(|protocol| protocol == "http") {
        Ok(())
    } else {
        Err(ClientError::client(format!(
            "libcurl {} was built without HTTP support",
            version.version()
        )))
    }
}

/// libcurl's error text, with the detail buffer when it has one.
fn describe(err: &::curl::Error) -> String {
    match err.extra_description() {
        Some(extra) => format!("{}: {extra}", err.description()),
        None => err.description().to_string(),
    }
}

/// Split a combined buffer into raw header lines and the body.
fn split_combined(buffer: Vec<u8>, header_size: usize) -> (Vec<String>, Bytes) {
    let buffer = Bytes::from(buffer);
    let split = header_size.min(buffer.len());
    let lines = String::from_utf8_lossy(&buffer[..split])
        .split("\r\n")
        .map(str::to_owned)
        .collect();
    (lines, buffer.slice(split..))
}
