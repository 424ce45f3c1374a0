//! Basic and Bearer credentials.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Credentials for a request.
///
/// At most one scheme is sent. If `username` and `password` are both
/// non-empty, Basic wins and `token` is ignored silently. Otherwise a
/// non-empty `token` is sent as Bearer. With neither, no Authorization header
/// is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Auth {
    pub username: String,
    pub password: String,
    pub token: String,
}

impl Auth {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            token: String::new(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// The Authorization header value these credentials produce, if any.
    pub fn authorization(&self) -> Option<String> {
        if !self.username.is_empty() && !self.password.is_empty() {
            let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
            return Some(format!("Basic {encoded}"));
        }
        if !self.token.is_empty() {
            return Some(format!("Bearer {}", self.token));
        }
        None
    }
}
