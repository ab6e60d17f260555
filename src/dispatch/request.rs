use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use crate::errors::Error;

/// One outbound API call, described independently of the transport so the
/// dispatcher can rebuild and replay it after a token refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) endpoint: String,
    pub(crate) body: Option<Value>,
    pub(crate) headers: HeaderMap,
    pub(crate) skip_auth: bool,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            headers: HeaderMap::new(),
            skip_auth: false,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Attach a JSON body. Serialized eagerly so a replay sends identical
    /// bytes.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set a header, replacing any earlier value under the same name. The
    /// stored bearer credential still takes precedence over a caller-supplied
    /// authorization header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Send without a bearer credential even when one is stored, and never
    /// refresh on an unauthorized response.
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }
}
