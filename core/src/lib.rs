//! Send an `http::Request` and get an `http::Response` back, through either
//! libcurl or a blocking `ureq` stream.
//!
//! # Overview
//! Both transports implement `HttpTransport`: one blocking
//! `send_request` per exchange plus redirect and timeout setters. Calling
//! code depends on the trait and picks a transport at construction time,
//! directly or through `AnyTransport::detect`.
//!
//! # Design
//! - Header formatting and parsing live in `headers` and are shared, so both
//!   transports produce identical responses for the same exchange.
//! - Backend handles are scoped to one `send_request` call; nothing is
//!   pooled, retried or cached.
//! - `FakeTransport` and `set_fake_response` let code built on a transport be
//!   tested without a network.

pub mod config;
pub mod error;
pub mod headers;
pub mod response;
pub mod transport;

pub use config::TransportConfig;
pub use error::{ClientError, NetworkError, RequestError};
pub use headers::{format_header_block, format_outgoing, parse_incoming, HeaderFields};
pub use response::{DefaultResponseFactory, ResponseFactory};
pub use transport::{
    AnyTransport, CurlTransport, FakeResponse, FakeTransport, HttpTransport, OpenError,
    RecordedRequest, StreamContext, StreamTransport,
};
