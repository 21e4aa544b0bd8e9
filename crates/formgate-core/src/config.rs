//! Application configuration management.
//!
//! Configuration is stored at `~/.config/formgate/config.json`. Missing
//! files give the defaults; `FORMGATE_*` environment variables override
//! whatever the file says.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::{CredentialStore, FileStore, KeyringStore, MemoryStore};
use crate::http::ReqwestTransport;
use crate::notify::banner::DEFAULT_HOLD_MS;
use crate::notify::{BannerTiming, MarkupRegion, Notifier, RenderPolicy};
use crate::submit::{FormSubmitter, Messages};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "formgate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const ENV_BASE_URL: &str = "FORMGATE_BASE_URL";
const ENV_CREDENTIAL_BACKEND: &str = "FORMGATE_CREDENTIAL_BACKEND";
const ENV_REQUEST_TIMEOUT_SECS: &str = "FORMGATE_REQUEST_TIMEOUT_SECS";
const ENV_RENDER_POLICY: &str = "FORMGATE_RENDER_POLICY";
const ENV_LOG_DIR: &str = "FORMGATE_LOG_DIR";

/// Where the credential is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    Keyring,
    File,
    Memory,
}

impl Default for CredentialBackend {
    /// The Linux keyring backend is the kernel keyutils store, which does not
    /// survive a reboot, so Linux defaults to the credential file.
    fn default() -> Self {
        if cfg!(target_os = "linux") {
            CredentialBackend::File
        } else {
            CredentialBackend::Keyring
        }
    }
}

/// An environment override that could not be parsed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredOverride {
    pub key: &'static str,
    pub value: String,
}

impl std::fmt::Display for IgnoredOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ignoring invalid {}={:?}", self.key, self.value)
    }
}

impl CredentialBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyring" => Some(CredentialBackend::Keyring),
            "file" => Some(CredentialBackend::File),
            "memory" => Some(CredentialBackend::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL for relative form actions.
    pub base_url: Option<String>,
    pub credential_backend: CredentialBackend,
    /// Request timeout. Unset means no timeout beyond the connection's own.
    pub request_timeout_secs: Option<u64>,
    pub render_policy: RenderPolicy,
    /// Write logs to a daily file in this directory instead of stderr.
    pub log_dir: Option<PathBuf>,
    /// Hold time of the banner timeline (`Notifier::visibility_at` /
    /// `Notifier::expire`). The CLI prints each banner once and exits, so
    /// this only matters to long-lived library users of the notifier.
    pub banner_hold_ms: u64,
    pub messages: Messages,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            credential_backend: CredentialBackend::default(),
            request_timeout_secs: None,
            render_policy: RenderPolicy::default(),
            log_dir: None,
            banner_hold_ms: DEFAULT_HOLD_MS,
            messages: Messages::default(),
        }
    }
}

impl Config {
    /// Load the config file (or defaults), then apply environment overrides.
    /// Overrides that could not be parsed are returned so the caller can
    /// report them once logging is up.
    pub fn load() -> Result<(Self, Vec<IgnoredOverride>)> {
        let mut config = Self::load_file()?;
        let ignored = config.apply_env(|key| std::env::var(key).ok());
        Ok((config, ignored))
    }

    fn load_file() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Apply overrides from an environment lookup. Unparseable values leave
    /// the setting alone and are returned.
    pub fn apply_env<F>(&mut self, lookup: F) -> Vec<IgnoredOverride>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ignored = Vec::new();
        let mut skip = |key: &'static str, value: String| {
            ignored.push(IgnoredOverride { key, value });
        };

        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.base_url = Some(url);
        }
        if let Some(value) = lookup(ENV_CREDENTIAL_BACKEND) {
            match CredentialBackend::parse(&value) {
                Some(backend) => self.credential_backend = backend,
                None => skip(ENV_CREDENTIAL_BACKEND, value),
            }
        }
        if let Some(value) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            match value.trim().parse::<u64>() {
                Ok(secs) => self.request_timeout_secs = Some(secs),
                Err(_) => skip(ENV_REQUEST_TIMEOUT_SECS, value),
            }
        }
        if let Some(value) = lookup(ENV_RENDER_POLICY) {
            match RenderPolicy::parse(&value) {
                Some(policy) => self.render_policy = policy,
                None => skip(ENV_RENDER_POLICY, value),
            }
        }
        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|v| !v.is_empty()) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        ignored
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn base_url(&self) -> Result<Option<Url>> {
        self.base_url
            .as_deref()
            .map(|s| Url::parse(s).with_context(|| format!("Invalid base URL: {}", s)))
            .transpose()
    }

    pub fn banner_timing(&self) -> BannerTiming {
        BannerTiming::default().with_hold(Duration::from_millis(self.banner_hold_ms))
    }

    /// Open the configured credential store.
    pub fn credential_store(&self) -> Result<Arc<dyn CredentialStore>> {
        Ok(match self.credential_backend {
            CredentialBackend::Keyring => Arc::new(KeyringStore::new()),
            CredentialBackend::File => Arc::new(FileStore::new(self.cache_dir()?)),
            CredentialBackend::Memory => Arc::new(MemoryStore::new()),
        })
    }

    /// Build a submitter wired to the real HTTP client and configured store.
    pub fn build_submitter(&self, user_list_region: &str) -> Result<FormSubmitter> {
        let transport = ReqwestTransport::new(self.request_timeout_secs.map(Duration::from_secs))
            .context("Failed to build HTTP client")?;
        let mut submitter = FormSubmitter::new(Arc::new(transport), self.credential_store()?)
            .with_notifier(Notifier::new(self.banner_timing()))
            .with_user_list(MarkupRegion::new(user_list_region))
            .with_messages(self.messages.clone())
            .with_render_policy(self.render_policy);
        if let Some(base_url) = self.base_url()? {
            submitter = submitter.with_base_url(base_url);
        }
        Ok(submitter)
    }
}

// ============================================================================
// Tests
// ============================================================================
