//! The value returned by a successful dispatch.

use std::borrow::Cow;

use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::http::HttpResponse;

/// A completed HTTP exchange.
///
/// `result` holds the decoded body when the builder was given a result type
/// via `RequestBuilder::result`, and `()` otherwise. Any status code,
/// including 4xx and 5xx, is reported here rather than as an `Error`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T = ()> {
    pub code: u16,
    /// Status line, e.g. `HTTP/1.1 200 OK`.
    pub msg: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub result: T,
}

impl<T> Response<T> {
    pub(crate) fn from_parts(response: HttpResponse, result: T) -> Self {
        Self {
            code: response.status,
            msg: response.status_line,
            headers: response.headers,
            body: response.body,
            result,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the raw body as JSON on demand, independent of `result`.
    pub fn json<U: DeserializeOwned>(&self) -> Result<U, Error> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Decode(e.to_string()))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn into_result(self) -> T {
        self.result
    }
}
