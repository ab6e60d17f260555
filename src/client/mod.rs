mod cart;
mod catalog;
mod wishlist;

pub use cart::CartApi;
pub use catalog::ProductsApi;
pub use wishlist::WishlistApi;

use std::sync::Arc;

use reqwest::Client;

use crate::auth::{Authenticator, SessionExpiredHook};
use crate::config::Config;
use crate::dispatch::RequestDispatcher;
use crate::errors::Error;
use crate::store::{CredentialStore, MemoryStore};
use crate::types::Identity;

/// Storefront API client.
///
/// Owns one credential store, one authenticator, and one dispatcher; every
/// domain call goes through the dispatcher so session handling lives in
/// exactly one place.
pub struct StorefrontClient {
    config: Config,
    store: Arc<dyn CredentialStore>,
    authenticator: Arc<Authenticator>,
    dispatcher: RequestDispatcher,
}

impl StorefrontClient {
    pub fn builder(config: Config) -> StorefrontClientBuilder {
        StorefrontClientBuilder::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Identity persisted by the last successful login, registration, or
    /// refresh, if any.
    pub fn identity(&self) -> Option<Identity> {
        self.store.identity()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.access_token().is_some()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, Error> {
        self.authenticator.login(username, password).await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, Error> {
        self.authenticator.register(username, email, password).await
    }

    /// Force a token refresh outside the dispatcher's automatic handling.
    pub async fn refresh(&self) -> Result<Identity, Error> {
        self.authenticator.refresh().await
    }

    pub async fn logout(&self) -> Result<(), Error> {
        self.authenticator.logout().await
    }

    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(&self.dispatcher)
    }

    pub fn cart(&self) -> CartApi<'_> {
        CartApi::new(&self.dispatcher)
    }

    pub fn wishlist(&self) -> WishlistApi<'_> {
        WishlistApi::new(&self.dispatcher)
    }

    /// Direct access for endpoints the typed surfaces do not cover.
    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }
}

/// Assembles a [`StorefrontClient`]. The credential store defaults to an
/// in-memory one, so sessions are process-local unless a durable store is
/// supplied.
pub struct StorefrontClientBuilder {
    config: Config,
    http: Option<Client>,
    store: Option<Arc<dyn CredentialStore>>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl StorefrontClientBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            store: None,
            on_session_expired: None,
        }
    }

    /// Use a preconfigured transport instead of the default one.
    pub fn http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Called once whenever the session terminally expires, so the embedding
    /// application can route the user back to its login surface.
    pub fn on_session_expired(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> Result<StorefrontClient, Error> {
        self.config.validate()?;
        let http = self.http.unwrap_or_default();
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn CredentialStore>);
        let authenticator = Arc::new(Authenticator::new(
            http.clone(),
            self.config.auth_url.clone(),
            Arc::clone(&store),
            self.on_session_expired,
        ));
        let dispatcher = RequestDispatcher::new(
            http,
            self.config.api_url.clone(),
            Arc::clone(&store),
            Arc::clone(&authenticator),
        );
        Ok(StorefrontClient {
            config: self.config,
            store,
            authenticator,
            dispatcher,
        })
    }
}
