//! Credential storage.
//!
//! This module provides:
//! - `CredentialStore`: the get/set seam the submitter reads and writes
//! - `KeyringStore`: OS-level storage via keyring
//! - `FileStore`: a JSON file in the cache directory
//! - `MemoryStore`: process-local storage for tests and throwaway runs
//!
//! The credential is an opaque string. It is stored exactly as received and
//! never validated.

pub mod credentials;
pub mod file_store;

pub use credentials::{CredentialStore, KeyringStore, MemoryStore, StoreError};
pub use file_store::{FileStore, StoredCredential};
