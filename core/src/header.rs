//! Request headers whose values may be any scalar.
//!
//! Values are kept typed until the request is resolved, then rendered with
//! `Display`.

use std::fmt;

/// A header value: a closed set of scalar kinds rendered to text on dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// Rendered as lossy UTF-8.
    Bytes(Vec<u8>),
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Str(s) => f.write_str(s),
            HeaderValue::Int(n) => write!(f, "{n}"),
            HeaderValue::UInt(n) => write!(f, "{n}"),
            HeaderValue::Float(n) => write!(f, "{n}"),
            HeaderValue::Bool(b) => write!(f, "{b}"),
            HeaderValue::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Str(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Str(value)
    }
}

impl From<bool> for HeaderValue {
    fn from(value: bool) -> Self {
        HeaderValue::Bool(value)
    }
}

impl From<f64> for HeaderValue {
    fn from(value: f64) -> Self {
        HeaderValue::Float(value)
    }
}

impl From<Vec<u8>> for HeaderValue {
    fn from(value: Vec<u8>) -> Self {
        HeaderValue::Bytes(value)
    }
}

impl From<&[u8]> for HeaderValue {
    fn from(value: &[u8]) -> Self {
        HeaderValue::Bytes(value.to_vec())
    }
}

macro_rules! from_int {
    ($variant:ident, $target:ty, $($t:ty),+) => {
        $(
            impl From<$t> for HeaderValue {
                fn from(value: $t) -> Self {
                    HeaderValue::$variant(value as $target)
                }
            }
        )+
    };
}

from_int!(Int, i64, i8, i16, i32, i64, isize);
from_int!(UInt, u64, u8, u16, u32, u64, usize);

/// A single request header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub tag: String,
    pub value: HeaderValue,
}

impl Header {
    pub fn new(tag: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}
