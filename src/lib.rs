//! Async client for a storefront API: bearer-authenticated requests with
//! single-flight token refresh and a one-shot replay on unauthorized
//! responses.

mod auth;
mod client;
mod config;
mod dispatch;
mod errors;
mod store;
pub mod telemetry;
pub mod types;

pub use auth::{Authenticator, SessionExpiredHook};
pub use client::{CartApi, ProductsApi, StorefrontClient, StorefrontClientBuilder, WishlistApi};
pub use config::Config;
pub use dispatch::{ApiRequest, Payload, RequestDispatcher};
pub use errors::Error;
pub use store::{CredentialStore, FileStore, MemoryStore};
pub use types::Identity;
