use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::credentials::{CredentialStore, StoreError};

/// Credential file name in cache directory
const CREDENTIAL_FILE: &str = "credential.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub token: String,
    pub stored_at: DateTime<Utc>,
}

/// Credential persisted as JSON in the cache directory.
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Read the full record, including when it was stored.
    pub fn read(&self) -> Result<Option<StoredCredential>, StoreError> {
        let path = self.credential_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn credential_path(&self) -> PathBuf {
        self.cache_dir.join(CREDENTIAL_FILE)
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.map(|c| c.token))
    }

    fn store(&self, token: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.cache_dir)?;
        let record = StoredCredential {
            token: token.to_string(),
            stored_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&record)?;
        std::fs::write(self.credential_path(), contents)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let path = self.credential_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}
