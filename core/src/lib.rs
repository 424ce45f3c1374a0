//! Fluent, blocking HTTP request builder with JSON result decoding.
//!
//! # Overview
//! ```no_run
//! use std::time::Duration;
//!
//! use apifast::{Auth, Header};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Item {
//!     id: u64,
//!     name: String,
//! }
//!
//! # fn main() -> Result<(), apifast::Error> {
//! let resp = apifast::build()
//!     .uri("http://localhost:3000/items/1")
//!     .timeout(Duration::from_secs(5))
//!     .auth(Auth::bearer("secret"))
//!     .headers(vec![Header::new("X-Request-Id", 42u32)])
//!     .result::<Item>()
//!     .get()?;
//! println!("{} {} {}", resp.code, resp.result.id, resp.result.name);
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - All networking is delegated to `ureq` through the `Transport` trait.
//! - One terminal call is one synchronous request/response cycle: no retries,
//!   no streaming, no partial results.
//! - Errors are `Timeout`, `Transport`, `Decode` (and `Encode` for `json`
//!   payloads). Non-2xx statuses are ordinary responses.
//! - The crate does no logging of its own. The one exception is `tracing`
//!   events at debug level and below, which produce no output unless the
//!   host installs a subscriber.
//! - 3xx responses are returned as is; redirects are never followed.

pub mod auth;
pub mod builder;
pub mod decode;
pub mod error;
pub mod header;
pub mod http;
pub mod response;
pub mod transport;

pub use auth::Auth;
pub use builder::{build, RequestBuilder, RequestOptions};
pub use decode::{Decode, Discard, Json};
pub use error::Error;
pub use header::{Header, HeaderValue};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::Response;
pub use transport::{Transport, UreqTransport};
