//! How a response body becomes `Response::result`.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::Error;

/// Turns raw body bytes into the typed result of a request.
pub trait Decode {
    type Output;

    fn decode(body: &[u8]) -> Result<Self::Output, Error>;
}

/// No result destination: the body is never parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Decode for Discard {
    type Output = ();

    fn decode(_body: &[u8]) -> Result<(), Error> {
        Ok(())
    }
}

/// Decode the body as JSON into `T`.
pub struct Json<T>(PhantomData<fn() -> T>);

impl<T> fmt::Debug for Json<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Json")
    }
}

impl<T: DeserializeOwned> Decode for Json<T> {
    type Output = T;

    fn decode(body: &[u8]) -> Result<T, Error> {
        serde_json::from_slice(body).map_err(|e| Error::Decode(e.to_string()))
    }
}
