//! Picking a transport at construction time.

use bytes::Bytes;
use http::{Request, Response};
use tracing::info;

use super::{CurlTransport, FakeTransport, HttpTransport, StreamTransport};
use crate::config::TransportConfig;
use crate::error::ClientError;

/// One of the transports of this crate, chosen by the caller.
#[derive(Debug)]
pub enum AnyTransport {
    Curl(CurlTransport),
    Stream(StreamTransport),
    Fake(FakeTransport),
}

impl AnyTransport {
    /// libcurl when it can speak HTTP, the stream transport otherwise.
    pub fn detect(config: TransportConfig) -> Self {
        match CurlTransport::new() {
            Ok(curl) => AnyTransport::Curl(curl.with_config(config)),
            Err(err) => {
                info!(reason = %err, "libcurl unusable, falling back to the stream transport");
                AnyTransport::Stream(StreamTransport::new().with_config(config))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnyTransport::Curl(_) => "curl",
            AnyTransport::Stream(_) => "stream",
            AnyTransport::Fake(_) => "fake",
        }
    }
}

impl From<CurlTransport> for AnyTransport {
    fn from(transport: CurlTransport) -> Self {
        AnyTransport::Curl(transport)
    }
}

impl From<StreamTransport> for AnyTransport {
    fn from(transport: StreamTransport) -> Self {
        AnyTransport::Stream(transport)
    }
}

impl From<FakeTransport> for AnyTransport {
    fn from(transport: FakeTransport) -> Self {
        AnyTransport::Fake(transport)
    }
}

impl HttpTransport for AnyTransport {
    fn send_request(&self, request: Request<Bytes>) -> Result<Response<Bytes>, ClientError> {
        match self {
            AnyTransport::Curl(t) => t.send_request(request),
            AnyTransport::Stream(t) => t.send_request(request),
            AnyTransport::Fake(t) => t.send_request(request),
        }
    }

    fn config(&self) -> &TransportConfig {
        match self {
            AnyTransport::Curl(t) => t.config(),
            AnyTransport::Stream(t) => t.config(),
            AnyTransport::Fake(t) => t.config(),
        }
    }

    fn config_mut(&mut self) -> &mut TransportConfig {
        match self {
            AnyTransport::Curl(t) => t.config_mut(),
            AnyTransport::Stream(t) => t.config_mut(),
            AnyTransport::Fake(t) => t.config_mut(),
        }
    }

    fn set_fake_response(&mut self, response: Response<Bytes>) -> &mut Self {
        match self {
            AnyTransport::Curl(t) => {
                t.set_fake_response(response);
            }
            AnyTransport::Stream(t) => {
                t.set_fake_response(response);
            }
            AnyTransport::Fake(t) => {
                t.set_fake_response(response);
            }
        }
        self
    }
}
