use std::sync::{Mutex, MutexGuard};

use crate::errors::Error;
use crate::types::{Credential, Identity};

use super::CredentialStore;

/// Process-local store; the default when nothing durable is configured.
#[derive(Default)]
pub struct MemoryStore {
    session: Mutex<Option<(Credential, Identity)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn session(&self) -> MutexGuard<'_, Option<(Credential, Identity)>> {
        self.session.lock().expect("credential store mutex poisoned")
    }
}

impl CredentialStore for MemoryStore {
    fn save(&self, credential: &Credential, identity: &Identity) -> Result<(), Error> {
        *self.session() = Some((credential.clone(), identity.clone()));
        Ok(())
    }

    fn access_token(&self) -> Option<String> {
        self.session()
            .as_ref()
            .map(|(credential, _)| credential.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.session()
            .as_ref()
            .map(|(credential, _)| credential.refresh_token.clone())
    }

    fn identity(&self) -> Option<Identity> {
        self.session().as_ref().map(|(_, identity)| identity.clone())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.session() = None;
        Ok(())
    }
}
