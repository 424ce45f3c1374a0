//! Error types for request dispatch.
//!
//! # Design
//! `Timeout` gets a dedicated variant because callers frequently distinguish
//! "the deadline passed" from "the connection broke." Every other transport
//! failure lands in `Transport` with the underlying message. Non-2xx statuses
//! are not errors at all: they come back as a normal `Response`.

use thiserror::Error;

/// Errors returned by the terminal verbs of `RequestBuilder`.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured timeout elapsed before a response was obtained.
    #[error("request timed out")]
    Timeout,

    /// Any other network or transport failure (DNS, refused connection, TLS,
    /// malformed URL or header).
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body could not be decoded into the requested type.
    #[error("decoding response failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("encoding payload failed: {0}")]
    Encode(String),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }
}
