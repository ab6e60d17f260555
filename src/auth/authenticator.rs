use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::Error;
use crate::store::CredentialStore;
use crate::telemetry::RefreshTelemetry;
use crate::types::{AuthResponse, Identity, LoginRequest, RefreshRequest, RegisterRequest};

/// Callback invoked when the session is beyond recovery and the user has to
/// log in again.
pub type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

type RefreshFuture = Shared<BoxFuture<'static, Result<Identity, Error>>>;

struct InFlightRefresh {
    future: RefreshFuture,
    telemetry: RefreshTelemetry,
}

/// Owns the identity endpoints and the credential lifecycle: login and
/// registration, single-flight token refresh, and best-effort logout.
pub struct Authenticator {
    http: Client,
    auth_url: String,
    store: Arc<dyn CredentialStore>,
    refresh_slot: Arc<Mutex<Option<InFlightRefresh>>>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl Authenticator {
    pub fn new(
        http: Client,
        auth_url: String,
        store: Arc<dyn CredentialStore>,
        on_session_expired: Option<SessionExpiredHook>,
    ) -> Self {
        Self {
            http,
            auth_url,
            store,
            refresh_slot: Arc::new(Mutex::new(None)),
            on_session_expired,
        }
    }

    /// Exchange a username and password for a session. Never attaches an
    /// existing bearer token; this call works from a logged-out state.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, Error> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.authenticate("login", &request, "Login failed").await
    }

    /// Create an account and start a session in one call. Same contract as
    /// [`Authenticator::login`] against the registration endpoint.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, Error> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.authenticate("register", &request, "Registration failed")
            .await
    }

    async fn authenticate<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<Identity, Error> {
        let auth_url = self.auth_url.as_str();
        let url = format!("{auth_url}/{path}");
        let resp = self.http.post(&url).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = failure_message(resp, fallback).await;
            warn!(
                "authentication rejected: status={} message='{}'",
                status, message
            );
            return Err(Error::AuthenticationFailed(message));
        }
        let auth: AuthResponse = resp.json().await?;
        let (credential, identity) = auth.into_parts();
        self.store.save(&credential, &identity)?;
        info!("authenticated: username='{}'", identity.username);
        Ok(identity)
    }

    /// Exchange the stored refresh token for a new credential pair.
    ///
    /// Only one exchange runs at a time: callers arriving while one is in
    /// flight await the same outcome instead of issuing their own call. The
    /// in-flight slot is cleared on every completion path, so a later refresh
    /// can always start a new exchange.
    pub async fn refresh(&self) -> Result<Identity, Error> {
        let future = {
            let mut slot = self.refresh_slot.lock().await;
            if let Some(flight) = slot.as_ref() {
                flight.telemetry.emit_joined();
                flight.future.clone()
            } else {
                let Some(refresh_token) = self.store.refresh_token() else {
                    drop(slot);
                    warn!("token refresh requested without a stored refresh token");
                    self.expire_session();
                    return Err(Error::NoRefreshToken);
                };
                let flight = self.start_refresh(refresh_token);
                let future = flight.future.clone();
                *slot = Some(flight);
                future
            }
        };
        future.await
    }

    fn start_refresh(&self, refresh_token: String) -> InFlightRefresh {
        let telemetry = RefreshTelemetry::new("token-refresh");
        telemetry.emit_start();

        let http = self.http.clone();
        let auth_url = self.auth_url.as_str();
        let url = format!("{auth_url}/refresh");
        let store = Arc::clone(&self.store);
        let slot = Arc::clone(&self.refresh_slot);
        let hook = self.on_session_expired.clone();
        let flight_telemetry = telemetry.clone();

        let future = async move {
            let result = exchange_refresh_token(&http, &url, &store, refresh_token).await;
            match &result {
                Ok(identity) => flight_telemetry.emit_success(&identity.username),
                Err(err) => flight_telemetry.emit_failure(err),
            }
            // Free the slot before running the hook so a slow or panicking
            // hook cannot block the next refresh.
            slot.lock().await.take();
            if result.is_err()
                && let Some(hook) = hook
            {
                hook();
            }
            result
        }
        .boxed()
        .shared();

        InFlightRefresh { future, telemetry }
    }

    /// Best-effort server-side invalidation followed by an unconditional
    /// local wipe. A failed or unreachable server never blocks logout.
    pub async fn logout(&self) -> Result<(), Error> {
        if let Some(token) = self.store.access_token() {
            let auth_url = self.auth_url.as_str();
            let url = format!("{auth_url}/logout");
            match self
                .http
                .post(&url)
                .header("Authorization", format!("Bearer {token}"))
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => info!("server-side logout ok"),
                Ok(resp) => warn!("server-side logout returned status={}", resp.status()),
                Err(err) => warn!("server-side logout failed: {err}"),
            }
        }
        self.store.clear()
    }

    /// Drop the stored session and notify the owner that re-authentication
    /// is required.
    pub(crate) fn expire_session(&self) {
        if let Err(err) = self.store.clear() {
            warn!("failed to clear credentials on session expiry: {err}");
        }
        if let Some(hook) = self.on_session_expired.as_ref() {
            hook();
        }
    }
}

async fn exchange_refresh_token(
    http: &Client,
    url: &str,
    store: &Arc<dyn CredentialStore>,
    refresh_token: String,
) -> Result<Identity, Error> {
    let resp = http
        .post(url)
        .json(&RefreshRequest { refresh_token })
        .send()
        .await?;
    let status = resp.status();
    if !status.is_success() {
        let message = failure_message(resp, "Token refresh failed").await;
        // The refresh token was rejected; keeping it would only replay the
        // same failure on the next call.
        if let Err(err) = store.clear() {
            warn!("failed to clear credentials after rejected refresh: {err}");
        }
        return Err(Error::RefreshFailed { status, message });
    }
    let auth: AuthResponse = resp.json().await?;
    let (credential, identity) = auth.into_parts();
    store.save(&credential, &identity)?;
    Ok(identity)
}

/// Error text for a rejected identity call: the `message` field when the
/// body is a JSON object carrying one, otherwise the raw body, with a fixed
/// fallback only when the body is empty.
async fn failure_message(resp: reqwest::Response, fallback: &str) -> String {
    let body = resp.text().await.unwrap_or_default();
    if let Some(message) = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
    {
        return message;
    }
    if body.is_empty() {
        fallback.to_string()
    } else {
        body
    }
}
