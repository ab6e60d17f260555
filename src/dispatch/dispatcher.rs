use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{Level, debug, event, warn};

use crate::auth::Authenticator;
use crate::errors::Error;
use crate::store::CredentialStore;

use super::{ApiRequest, Payload};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Attempt {
    First,
    Retry,
}

/// Single point of truth for outbound API calls: attaches the stored bearer
/// credential, refreshes and replays exactly once on an unauthorized
/// response, and escalates unrecoverable session failures.
#[derive(Clone)]
pub struct RequestDispatcher {
    http: Client,
    api_url: String,
    store: Arc<dyn CredentialStore>,
    authenticator: Arc<Authenticator>,
}

impl RequestDispatcher {
    pub fn new(
        http: Client,
        api_url: String,
        store: Arc<dyn CredentialStore>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            http,
            api_url,
            store,
            authenticator,
        }
    }

    pub async fn get(&self, endpoint: &str) -> Result<Payload, Error> {
        self.send(ApiRequest::get(endpoint)).await
    }

    pub async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Payload, Error> {
        self.send(ApiRequest::post(endpoint).json(body)?).await
    }

    pub async fn put<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Payload, Error> {
        self.send(ApiRequest::put(endpoint).json(body)?).await
    }

    pub async fn patch<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Payload, Error> {
        self.send(ApiRequest::patch(endpoint).json(body)?).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Payload, Error> {
        self.send(ApiRequest::delete(endpoint)).await
    }

    /// Issue the call described by `request`.
    ///
    /// An unauthorized response on the first attempt triggers one token
    /// refresh and one replay; a second unauthorized response is terminal.
    /// Transport failures are never retried.
    pub async fn send(&self, request: ApiRequest) -> Result<Payload, Error> {
        let api_url = self.api_url.as_str();
        let url = format!("{api_url}{}", request.endpoint);
        let mut attempt = Attempt::First;
        loop {
            let resp = self.issue(&request, &url).await?;
            let status = resp.status();

            if status == StatusCode::UNAUTHORIZED && !request.skip_auth {
                match attempt {
                    Attempt::First => {
                        warn!(
                            "unauthorized response: method={} endpoint='{}'; refreshing session",
                            request.method, request.endpoint
                        );
                        if self.authenticator.refresh().await.is_err() {
                            // The authenticator already cleared the session
                            // and notified the expiry hook.
                            return Err(Error::SessionExpired);
                        }
                        attempt = Attempt::Retry;
                        continue;
                    }
                    Attempt::Retry => {
                        warn!(
                            "unauthorized after refresh: method={} endpoint='{}'; expiring session",
                            request.method, request.endpoint
                        );
                        self.authenticator.expire_session();
                        return Err(Error::SessionExpired);
                    }
                }
            }

            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                let message = if body.is_empty() {
                    format!(
                        "API Error: {} {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("")
                    )
                } else {
                    body
                };
                event!(
                    Level::WARN,
                    method = %request.method,
                    endpoint = %request.endpoint,
                    status = status.as_u16(),
                    retried = attempt == Attempt::Retry,
                    "request.outcome"
                );
                return Err(Error::Api { status, message });
            }

            let text = resp.text().await?;
            event!(
                Level::INFO,
                method = %request.method,
                endpoint = %request.endpoint,
                status = status.as_u16(),
                retried = attempt == Attempt::Retry,
                "request.outcome"
            );
            return Ok(parse_body(text));
        }
    }

    async fn issue(&self, request: &ApiRequest, url: &str) -> Result<reqwest::Response, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in request.headers.iter() {
            headers.insert(name, value.clone());
        }
        if !request.skip_auth
            && let Some(token) = self.store.access_token()
        {
            let bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                Error::Config(format!("stored access token is not a valid header value: {e}"))
            })?;
            headers.insert(AUTHORIZATION, bearer);
        }

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(headers);
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }
        debug!("issuing request: method={} url='{}'", request.method, url);
        Ok(builder.send().await?)
    }
}

fn parse_body(text: String) -> Payload {
    if text.is_empty() {
        return Payload::Empty;
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Payload::Json(value),
        Err(_) => Payload::Text(text),
    }
}
