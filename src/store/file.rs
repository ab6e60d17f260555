use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use crate::errors::Error;
use crate::types::{Credential, Identity};

use super::{ACCESS_TOKEN_KEY, CredentialStore, IDENTITY_KEY, REFRESH_TOKEN_KEY};

/// Durable key-value store: one JSON file holding the three session entries,
/// written through on every mutation. The identity record is stored
/// JSON-encoded as a string value under its own key. A mutation commits to
/// the in-memory view only after the file write succeeds, so cache and disk
/// never diverge.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`, loading any persisted entries. A missing
    /// file starts empty; a malformed one is discarded with a warning so a
    /// damaged session never blocks the client from starting.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(
                        "discarding malformed credential file '{}': {}",
                        path.display(),
                        err
                    );
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(FileStore {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().expect("credential store mutex poisoned")
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), Error> {
        let contents = serde_json::to_string(entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl CredentialStore for FileStore {
    fn save(&self, credential: &Credential, identity: &Identity) -> Result<(), Error> {
        let identity_json = serde_json::to_string(identity)?;
        let mut entries = self.entries();
        let mut next = entries.clone();
        next.insert(
            ACCESS_TOKEN_KEY.to_string(),
            credential.access_token.clone(),
        );
        next.insert(
            REFRESH_TOKEN_KEY.to_string(),
            credential.refresh_token.clone(),
        );
        next.insert(IDENTITY_KEY.to_string(), identity_json);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn access_token(&self) -> Option<String> {
        self.entries().get(ACCESS_TOKEN_KEY).cloned()
    }

    fn refresh_token(&self) -> Option<String> {
        self.entries().get(REFRESH_TOKEN_KEY).cloned()
    }

    fn identity(&self) -> Option<Identity> {
        let entries = self.entries();
        let raw = entries.get(IDENTITY_KEY)?;
        match serde_json::from_str(raw) {
            Ok(identity) => Some(identity),
            Err(err) => {
                warn!("stored identity record is malformed: {}", err);
                None
            }
        }
    }

    fn clear(&self) -> Result<(), Error> {
        let mut entries = self.entries();
        let mut next = entries.clone();
        next.remove(ACCESS_TOKEN_KEY);
        next.remove(REFRESH_TOKEN_KEY);
        next.remove(IDENTITY_KEY);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}
