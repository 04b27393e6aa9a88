//! Error types returned by the transports.
//!
//! # Design
//! `ClientError` is the single error type of `HttpTransport::send_request`.
//! Send failures get their own `NetworkError` so the caller can take the
//! original request back and decide whether to try again; nothing is retried
//! here. `RequestError` completes the taxonomy for malformed requests but no
//! transport in this crate produces it.

use bytes::Bytes;
use http::Request;
use thiserror::Error;

/// Errors returned by `HttpTransport` implementations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Generic client failure: the backend is unusable, its results could not
    /// be inspected, or the response could not be read after connecting.
    #[error("{message}")]
    Client { message: String },

    /// The request could not be sent.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The request itself is malformed.
    #[error(transparent)]
    Request(#[from] RequestError),
}

impl ClientError {
    pub fn client(message: impl Into<String>) -> Self {
        ClientError::Client {
            message: message.into(),
        }
    }

    /// The request carried by a network or request error.
    pub fn request(&self) -> Option<&Request<Bytes>> {
        match self {
            ClientError::Client { .. } => None,
            ClientError::Network(err) => Some(err.request()),
            ClientError::Request(err) => Some(err.request()),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

/// The transport failed to send the request: connection refused, DNS
/// failure, timeout or any other backend execution failure.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct NetworkError {
    message: String,
    request: Box<Request<Bytes>>,
}

impl NetworkError {
    pub fn new(message: impl Into<String>, request: Request<Bytes>) -> Self {
        Self {
            message: message.into(),
            request: Box::new(request),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The request that failed to send.
    pub fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    /// Hands the failed request back to the caller.
    pub fn into_request(self) -> Request<Bytes> {
        *self.request
    }
}

/// The request is malformed and was not sent.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RequestError {
    message: String,
    request: Box<Request<Bytes>>,
}

impl RequestError {
    pub fn new(message: impl Into<String>, request: Request<Bytes>) -> Self {
        Self {
            message: message.into(),
            request: Box::new(request),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    pub fn into_request(self) -> Request<Bytes> {
        *self.request
    }
}
