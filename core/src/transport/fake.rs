//! In-memory transport for tests of code built on `HttpTransport`.

use std::cell::RefCell;
use std::collections::VecDeque;

use bytes::Bytes;
use http::{Method, Request, Response, Uri};

use super::{FakeResponse, HttpTransport};
use crate::config::TransportConfig;
use crate::error::{ClientError, NetworkError};
use crate::headers::HeaderFields;
use crate::response::{DefaultResponseFactory, ResponseFactory};

/// A request as the fake transport received it, with the configuration in
/// force at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderFields,
    pub body: Bytes,
    pub config: TransportConfig,
}

#[derive(Debug)]
enum Outcome {
    Respond(FakeResponse),
    NetworkFailure(String),
}

/// Records every request and answers from a queue of canned outcomes.
///
/// With the queue empty it answers with a blank `200 OK`. A response set
/// through `set_fake_response` wins over the queue and nothing is recorded,
/// as with the real transports.
#[derive(Debug, Default)]
pub struct FakeTransport {
    config: TransportConfig,
    fake_response: Option<FakeResponse>,
    outcomes: RefCell<VecDeque<Outcome>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `response` for the next unanswered send.
    pub fn push_response(&self, response: Response<Bytes>) -> &Self {
        self.outcomes
            .borrow_mut()
            .push_back(Outcome::Respond(response.into()));
        self
    }

    /// Queue a send failure; the request comes back inside the error.
    pub fn push_network_error(&self, message: impl Into<String>) -> &Self {
        self.outcomes
            .borrow_mut()
            .push_back(Outcome::NetworkFailure(message.into()));
        self
    }

    /// Everything sent so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }
}

impl HttpTransport for FakeTransport {
    fn send_request(&self, request: Request<Bytes>) -> Result<Response<Bytes>, ClientError> {
        if let Some(fake) = &self.fake_response {
            return Ok(fake.to_response());
        }

        self.requests.borrow_mut().push(RecordedRequest {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: HeaderFields::from(request.headers()),
            body: request.body().clone(),
            config: self.config,
        });

        let next = self.outcomes.borrow_mut().pop_front();
        match next {
            Some(Outcome::Respond(response)) => Ok(response.to_response()),
            Some(Outcome::NetworkFailure(message)) => Err(NetworkError::new(message, request).into()),
            None => Ok(DefaultResponseFactory.create_response()),
        }
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
