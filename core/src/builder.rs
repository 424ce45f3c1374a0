//! Fluent request builder.
//!
//! # Design
//! Each setter consumes and returns the builder, so configuration chains
//! without shared mutable state. A terminal verb (`get`, `post`, `patch`,
//! `delete`) consumes the builder for good: a second dispatch from the same
//! value does not compile. Dispatch is split in two steps. `build_request`
//! resolves headers and credentials into a plain `HttpRequest`, then the
//! configured `Transport` executes it.
//!
//! A builder is meant for one thread and one request. Separate builders can
//! run concurrently; they share nothing except what the transport pools
//! internally.

use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::auth::Auth;
use crate::decode::{Decode, Discard, Json};
use crate::error::Error;
use crate::header::{Header, HeaderValue};
use crate::http::{set_header, HttpMethod, HttpRequest};
use crate::response::Response;
use crate::transport::{Transport, UreqTransport};

/// Optional parameters of a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Zero means no explicit timeout.
    pub timeout: Duration,
    pub payload: Option<Vec<u8>>,
    pub headers: Vec<Header>,
    pub auth: Auth,
}

/// Accumulates request configuration, then dispatches exactly once.
///
/// `D` selects what happens to the response body: `Discard` leaves it raw,
/// `Json<T>` (set through `result`) decodes it into `Response::result`.
pub struct RequestBuilder<D = Discard> {
    url: String,
    options: RequestOptions,
    transport: Box<dyn Transport>,
    decode: PhantomData<fn() -> D>,
}

impl<D> fmt::Debug for RequestBuilder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("url", &self.url)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            url: String::new(),
            options: RequestOptions::default(),
            transport: Box::new(UreqTransport),
            decode: PhantomData,
        }
    }
}

impl<D> RequestBuilder<D> {
    pub fn uri(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Basic wins over Bearer when both are filled in; see `Auth`.
    pub fn auth(mut self, auth: Auth) -> Self {
        self.options.auth = auth;
        self
    }

    /// Replace the header list.
    pub fn headers(mut self, headers: impl IntoIterator<Item = Header>) -> Self {
        self.options.headers = headers.into_iter().collect();
        self
    }

    /// Append a single header.
    pub fn header(mut self, tag: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.options.headers.push(Header::new(tag, value));
        self
    }

    pub fn payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.options.payload = Some(payload.into());
        self
    }

    /// Serialize `value` as the JSON payload and set `Content-Type`.
    pub fn json<S: Serialize + ?Sized>(self, value: &S) -> Result<Self, Error> {
        let body = serde_json::to_vec(value).map_err(|e| Error::Encode(e.to_string()))?;
        Ok(self.header("Content-Type", "application/json").payload(body))
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    /// Decode the response body as JSON into `T`. A body that does not parse
    /// fails the whole request with `Error::Decode`.
    pub fn result<T>(self) -> RequestBuilder<Json<T>> {
        RequestBuilder {
            url: self.url,
            options: self.options,
            transport: self.transport,
            decode: PhantomData,
        }
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Resolve the configuration into the request that would be sent.
    ///
    /// Headers keep their order. A later header replaces an earlier one with
    /// the same case-insensitive name, and the Authorization header derived
    /// from `Auth` is applied last.
    pub fn build_request(&self, method: HttpMethod) -> HttpRequest {
        let mut headers = Vec::with_capacity(self.options.headers.len() + 1);
        for header in &self.options.headers {
            set_header(&mut headers, &header.tag, header.value.to_string());
        }
        if let Some(value) = self.options.auth.authorization() {
            set_header(&mut headers, "Authorization", value);
        }

        HttpRequest {
            method,
            url: self.url.clone(),
            headers,
            body: self.options.payload.clone(),
            timeout: (!self.options.timeout.is_zero()).then_some(self.options.timeout),
        }
    }
}

impl<D: Decode> RequestBuilder<D> {
    pub fn get(self) -> Result<Response<D::Output>, Error> {
        self.send(HttpMethod::Get)
    }

    pub fn post(self) -> Result<Response<D::Output>, Error> {
        self.send(HttpMethod::Post)
    }

    pub fn patch(self) -> Result<Response<D::Output>, Error> {
        self.send(HttpMethod::Patch)
    }

    pub fn delete(self) -> Result<Response<D::Output>, Error> {
        self.send(HttpMethod::Delete)
    }

    /// Dispatch with an arbitrary method. No retries: the first failure is
    /// returned as is.
    pub fn send(self, method: HttpMethod) -> Result<Response<D::Output>, Error> {
        let request = self.build_request(method);
        let raw = self.transport.execute(&request)?;
        let result = D::decode(&raw.body).inspect_err(|err| {
            debug!(url = %request.url, status = raw.status, error = %err, "response body rejected");
        })?;
        Ok(Response::from_parts(raw, result))
    }
}

/// Start a new request with an empty configuration.
pub fn build() -> RequestBuilder {
    RequestBuilder::new()
}
