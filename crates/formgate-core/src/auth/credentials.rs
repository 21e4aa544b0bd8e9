use std::sync::Mutex;

use keyring::Entry;
use thiserror::Error;

const SERVICE_NAME: &str = "formgate";
const ACCOUNT_NAME: &str = "token";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Credential file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse credential file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the single credential lives. A new `store` overwrites any prior value.
pub trait CredentialStore: Send + Sync {
    /// Current credential, if one has been stored.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Store a credential verbatim, replacing the previous one.
    fn store(&self, token: &str) -> Result<(), StoreError>;

    /// Remove the stored credential. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StoreError>;

    /// Short backend name for display.
    fn backend(&self) -> &'static str;
}

/// Credential kept in the OS keychain.
pub struct KeyringStore {
    service: String,
    account: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self::with_names(SERVICE_NAME, ACCOUNT_NAME)
    }

    pub fn with_names(service: &str, account: &str) -> Self {
        Self {
            service: service.to_string(),
            account: account.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, &self.account)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, token: &str) -> Result<(), StoreError> {
        self.entry()?.set_password(token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn backend(&self) -> &'static str {
        "keyring"
    }
}

/// Credential held in memory for the life of the process.
#[derive(Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot().clone())
    }

    fn store(&self, token: &str) -> Result<(), StoreError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot() = None;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
