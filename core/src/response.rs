//! Response construction shared by the transports.

use bytes::Bytes;
use http::{HeaderName, HeaderValue, Response, StatusCode};

use crate::error::ClientError;
use crate::headers::HeaderFields;

/// Creates the blank response a transport fills in.
pub trait ResponseFactory {
    fn create_response(&self) -> Response<Bytes>;
}

/// `200 OK`, no headers, empty body.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResponseFactory;

impl ResponseFactory for DefaultResponseFactory {
    fn create_response(&self) -> Response<Bytes> {
        Response::new(Bytes::new())
    }
}

impl<F> ResponseFactory for F
where
    F: Fn() -> Response<Bytes>,
{
    fn create_response(&self) -> Response<Bytes> {
        self()
    }
}

/// Fill a fresh response from what the backend returned.
///
/// Every value is appended on its own, so repeated headers stay separate.
/// The body is only written when there is one.
pub(crate) fn build_response<F: ResponseFactory + ?Sized>(
    factory: &F,
    status: StatusCode,
    headers: &HeaderFields,
    body: Bytes,
) -> Result<Response<Bytes>, ClientError> {
    let mut response = factory.create_response();
    *response.status_mut() = status;

    for (name, values) in headers.iter() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientError::client(format!("Invalid response header name: {name}")))?;
        for value in values {
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                ClientError::client(format!("Invalid value for response header {name}"))
            })?;
            response.headers_mut().append(header_name.clone(), header_value);
        }
    }

    if !body.is_empty() {
        *response.body_mut() = body;
    }

    Ok(response)
}
