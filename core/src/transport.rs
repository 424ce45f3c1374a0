//! Executes an `HttpRequest` against the network.
//!
//! # Design
//! `Transport` is the only seam that performs I/O. `UreqTransport` is the
//! default and delegates connection handling, TLS and timeout enforcement to
//! `ureq`. Any `Fn(&HttpRequest) -> Result<HttpResponse, Error>` is also a
//! transport, which lets tests observe the exact request without a server.

use std::io;
use std::time::Duration;

use tracing::{debug, trace};
use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, Body, RequestBuilder};

use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one synchronous request/response exchange.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, Error> + Send + Sync,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        self(request)
    }
}

/// Blocking transport backed by `ureq`.
///
/// A fresh agent is configured per call so that each request carries its own
/// global timeout. Non-2xx statuses are returned as responses, not errors.
/// Redirects are not followed and the body is read without a size cap.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let agent = agent(request.timeout);
        let url = request.url.as_str();
        let body = request.body.as_deref();
        let sent = match request.method {
            HttpMethod::Get => send_without_body(with_headers(agent.get(url), request), body),
            HttpMethod::Delete => send_without_body(with_headers(agent.delete(url), request), body),
            HttpMethod::Post => send_with_body(with_headers(agent.post(url), request), body),
            HttpMethod::Patch => send_with_body(with_headers(agent.patch(url), request), body),
        };
        let mut response = sent.map_err(map_error)?;

        let status = response.status();
        let status_line = format!(
            "{:?} {} {}",
            response.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )
        .trim_end()
        .to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(map_error)?;

        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        Ok(HttpResponse {
            status: status.as_u16(),
            status_line,
            headers,
            body,
        })
    }
}

fn agent(timeout: Option<Duration>) -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .max_redirects(0)
        .timeout_global(timeout)
        .build()
        .new_agent()
}

fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_without_body(
    builder: RequestBuilder<WithoutBody>,
    body: Option<&[u8]>,
) -> Result<ureq::http::Response<Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.force_send_body().send(bytes),
        None => builder.call(),
    }
}

fn send_with_body(
    builder: RequestBuilder<WithBody>,
    body: Option<&[u8]>,
) -> Result<ureq::http::Response<Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}

/// Collapse `ureq` failures into the crate's error taxonomy.
fn map_error(err: ureq::Error) -> Error {
    match err {
        ureq::Error::Timeout(kind) => {
            trace!(?kind, "deadline exceeded");
            Error::Timeout
        }
        ureq::Error::Io(ref e) if e.kind() == io::ErrorKind::TimedOut => Error::Timeout,
        other => {
            debug!(error = %other, "transport failure");
            Error::Transport(other.to_string())
        }
    }
}
