use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;

/// Errors surfaced by the storefront client.
///
/// The enum is `Clone` so a single refresh outcome can be delivered to every
/// caller joined on the same in-flight refresh; sources that are not
/// themselves clonable are shared behind an `Arc`.
#[derive(Debug, Clone)]
pub enum Error {
    /// Transport-level failure (connection, DNS, body read). Never retried
    /// automatically.
    Http(Arc<reqwest::Error>),
    Json(Arc<serde_json::Error>),
    Io(Arc<std::io::Error>),
    /// The server rejected a domain call with a non-success status after the
    /// session itself was settled. Recoverable at the call site.
    Api { status: StatusCode, message: String },
    /// Login or registration rejected; carries the server-provided message.
    AuthenticationFailed(String),
    /// A refresh was requested but no refresh token is stored.
    NoRefreshToken,
    /// The identity endpoint rejected the refresh token. Stored credentials
    /// have been cleared.
    RefreshFailed { status: StatusCode, message: String },
    /// The original call received an unauthorized response and the session
    /// could not be renewed.
    SessionExpired,
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(err) => write!(f, "transport error: {err}"),
            Error::Json(err) => write!(f, "json error: {err}"),
            Error::Io(err) => write!(f, "io error: {err}"),
            Error::Api { status, message } => write!(f, "api error {status}: {message}"),
            Error::AuthenticationFailed(message) => {
                write!(f, "authentication failed: {message}")
            }
            Error::NoRefreshToken => write!(f, "no refresh token available"),
            Error::RefreshFailed { status, message } => {
                write!(f, "token refresh failed ({status}): {message}")
            }
            Error::SessionExpired => write!(f, "session expired, please login again"),
            Error::Config(message) => write!(f, "config error: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err.as_ref()),
            Error::Json(err) => Some(err.as_ref()),
            Error::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(Arc::new(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(Arc::new(err))
    }
}
