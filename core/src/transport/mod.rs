//! The contract every transport implements.
//!
//! # Design
//! The redirect and timeout setters are provided methods over
//! `config_mut`, so a transport only has to store a `TransportConfig`.
//! Setters return `&mut Self` for chaining and are therefore unavailable on
//! `dyn HttpTransport`; sending and reading the configuration are not.

mod any;
mod curl;
mod fake;
mod stream;

pub use any::AnyTransport;
pub use self::curl::CurlTransport;
pub use fake::{FakeTransport, RecordedRequest};
pub use stream::{OpenError, StreamContext, StreamTransport};

use bytes::Bytes;
use http::{HeaderMap, Request, Response, StatusCode, Version};

use crate::config::TransportConfig;
use crate::error::ClientError;

pub trait HttpTransport {
    /// Send `request` and wait for the complete response.
    ///
    /// On a send failure the request is handed back inside the
    /// `NetworkError`.
    fn send_request(&self, request: Request<Bytes>) -> Result<Response<Bytes>, ClientError>;

    fn config(&self) -> &TransportConfig;

    fn config_mut(&mut self) -> &mut TransportConfig;

    /// Make every following `send_request` return `response` without any
    /// I/O. Meant for tests of code that sits on top of a transport.
    fn set_fake_response(&mut self, response: Response<Bytes>) -> &mut Self
    where
        Self: Sized;

    /// Whole-transfer timeout in seconds, `0` for none.
    fn set_timeout(&mut self, seconds: u64) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().timeout = seconds;
        self
    }

    fn set_max_redirects(&mut self, count: u32) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().max_redirects = count;
        self
    }

    fn set_follow_location(&mut self, enabled: bool) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().follow_location = enabled;
        self
    }
}

/// A response kept by a transport and replayed on every send.
///
/// Response extensions are not kept.
#[derive(Debug, Clone)]
pub struct FakeResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
}

impl FakeResponse {
    pub fn to_response(&self) -> Response<Bytes> {
        let mut response = Response::new(self.body.clone());
        *response.status_mut() = self.status;
        *response.version_mut() = self.version;
        *response.headers_mut() = self.headers.clone();
        response
    }
}

impl From<Response<Bytes>> for FakeResponse {
    fn from(response: Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body,
        }
    }
}
