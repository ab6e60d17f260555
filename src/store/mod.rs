//! Durable credential storage shared by the authenticator and dispatcher.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::errors::Error;
use crate::types::{Credential, Identity};

/// Storage key for the access token entry.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key for the refresh token entry.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key for the JSON-encoded identity record.
pub const IDENTITY_KEY: &str = "user";

/// Where a session's credential and identity live.
///
/// The authenticator is the only writer; the request dispatcher only reads
/// the access token. Either all three entries are present or none are.
pub trait CredentialStore: Send + Sync {
    /// Persists the credential and identity together.
    fn save(&self, credential: &Credential, identity: &Identity) -> Result<(), Error>;

    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    /// Returns the stored identity, or `None` when absent or when the
    /// persisted record is malformed. Never errors.
    fn identity(&self) -> Option<Identity>;

    /// Removes all three entries. Safe to call when already empty.
    fn clear(&self) -> Result<(), Error>;
}
