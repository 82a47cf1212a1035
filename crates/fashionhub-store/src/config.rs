//! # Dashboard Configuration
//!
//! Configuration for the store connection, HTTP client, auth session, list
//! views and query cache.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     FASHIONHUB_STORE_URL=https://xyz.supabase.co                        │
//! │     FASHIONHUB_STORE_API_KEY=...                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/fashionhub/fashionhub.toml (Linux)                        │
//! │     ~/Library/Application Support/com.fashionhub.dashboard/ (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     timeout 30s, page size 12, cache fresh until invalidated            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! url = "https://xyz.supabase.co"
//! api_key = "anon-key"
//! # bearer_token defaults to api_key
//!
//! [http]
//! timeout_secs = 30
//!
//! [auth]
//! session_file = "/home/me/.local/share/fashionhub/session.json"
//!
//! [catalog]
//! page_size = 12
//!
//! [cache]
//! stale_after_secs = 0   # 0 = fresh until invalidated
//! ```
//!
//! ## Hot Credential Rotation
//! The REST client never copies credentials. It asks a [`CredentialSource`]
//! before every request, so rotating the key on a [`SharedConfig`] takes
//! effect on the very next call.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{StoreError, StoreResult};
use fashionhub_core::DEFAULT_PAGE_SIZE;

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "fashionhub.toml";

// =============================================================================
// Sections
// =============================================================================

/// Connection to the remote data store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Project base URL; REST lives under `/rest/v1`, auth under `/auth/v1`.
    #[serde(default = "default_store_url")]
    pub url: String,

    /// Public (anon) API key sent as the `apikey` header.
    #[serde(default)]
    pub api_key: String,

    /// Bearer token for `Authorization`. Falls back to `api_key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

fn default_store_url() -> String {
    "http://localhost:54321".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            url: default_store_url(),
            api_key: String::new(),
            bearer_token: None,
        }
    }
}

/// HTTP client behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            timeout_secs: default_timeout(),
        }
    }
}

/// Auth session persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Where the signed-in session is kept between runs.
    /// Default: `session.json` in the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

/// Product list views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            page_size: default_page_size(),
        }
    }
}

/// Query cache behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Age after which a cached read is refetched. 0 keeps entries fresh
    /// until a write invalidates them.
    #[serde(default)]
    pub stale_after_secs: u64,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub cache: CacheSettings,
}

impl DashboardConfig {
    /// Config for a store at `url` with the given API key, defaults elsewhere.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        DashboardConfig {
            store: StoreSettings {
                url: url.into(),
                api_key: api_key.into(),
                bearer_token: None,
            },
            ..Default::default()
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`fashionhub.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading dashboard config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Dashboard config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        let url = Url::parse(&self.store.url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(StoreError::InvalidConfig(format!(
                "store URL must start with http:// or https://, got: {}",
                self.store.url
            )));
        }

        if self.store.api_key.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "store.api_key is not set (FASHIONHUB_STORE_API_KEY)".into(),
            ));
        }

        if self.catalog.page_size == 0 {
            return Err(StoreError::InvalidConfig(
                "page_size must be greater than 0".into(),
            ));
        }

        if self.http.timeout_secs == 0 {
            return Err(StoreError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the process environment in
    /// production, a map in tests).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("FASHIONHUB_STORE_URL") {
            debug!(url = %url, "Overriding store URL from environment");
            self.store.url = url;
        }

        if let Some(key) = lookup("FASHIONHUB_STORE_API_KEY") {
            debug!("Overriding store API key from environment");
            self.store.api_key = key;
        }

        if let Some(token) = lookup("FASHIONHUB_STORE_BEARER_TOKEN") {
            self.store.bearer_token = Some(token);
        }

        if let Some(timeout) = lookup("FASHIONHUB_HTTP_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.http.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid FASHIONHUB_HTTP_TIMEOUT_SECS"),
            }
        }

        if let Some(path) = lookup("FASHIONHUB_SESSION_FILE") {
            self.auth.session_file = Some(PathBuf::from(path));
        }

        if let Some(size) = lookup("FASHIONHUB_PAGE_SIZE") {
            match size.parse::<u32>() {
                Ok(n) => self.catalog.page_size = n,
                Err(_) => warn!(value = %size, "Ignoring invalid FASHIONHUB_PAGE_SIZE"),
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "fashionhub", "dashboard")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Session file location (configured, or the platform default).
    pub fn session_file(&self) -> Option<PathBuf> {
        self.auth.session_file.clone().or_else(|| {
            Self::project_dirs().map(|dirs| dirs.data_dir().join("session.json"))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    /// `None` when entries stay fresh until invalidated.
    pub fn stale_after(&self) -> Option<Duration> {
        match self.cache.stale_after_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Resolves the credentials for one request.
    pub fn credentials(&self) -> StoreResult<StoreCredentials> {
        StoreCredentials::new(
            &self.store.url,
            &self.store.api_key,
            self.store.bearer_token.as_deref(),
        )
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// Everything a request needs to reach and authenticate with the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCredentials {
    pub base_url: Url,
    pub api_key: String,
    pub bearer_token: String,
}

impl StoreCredentials {
    pub fn new(url: &str, api_key: &str, bearer_token: Option<&str>) -> StoreResult<Self> {
        let base_url = Url::parse(url)?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidConfig(format!(
                "store URL cannot be used as a base: {}",
                url
            )));
        }

        Ok(StoreCredentials {
            base_url,
            api_key: api_key.to_string(),
            bearer_token: bearer_token.unwrap_or(api_key).to_string(),
        })
    }

    /// URL of a path under the store, e.g. `["rest", "v1", "products"]`.
    ///
    /// ```rust
    /// use fashionhub_store::StoreCredentials;
    ///
    /// let creds = StoreCredentials::new("https://xyz.supabase.co", "key", None).unwrap();
    /// let url = creds.endpoint(&["rest", "v1", "products"]).unwrap();
    /// assert_eq!(url.as_str(), "https://xyz.supabase.co/rest/v1/products");
    /// ```
    pub fn endpoint(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidConfig("store URL cannot be used as a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Supplies credentials at request time.
pub trait CredentialSource: Send + Sync {
    fn credentials(&self) -> StoreResult<StoreCredentials>;
}

/// Fixed credentials (tests, one-shot tools).
impl CredentialSource for StoreCredentials {
    fn credentials(&self) -> StoreResult<StoreCredentials> {
        Ok(self.clone())
    }
}

// =============================================================================
// Shared Config
// =============================================================================

/// Configuration shared between the REST client and the application.
///
/// Cloning is cheap; every clone sees the same configuration.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<DashboardConfig>>,
}

impl SharedConfig {
    pub fn new(config: DashboardConfig) -> Self {
        SharedConfig {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// A copy of the current configuration.
    pub fn snapshot(&self) -> StoreResult<DashboardConfig> {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| StoreError::InvalidConfig("config lock poisoned".into()))
    }

    /// Replaces the API key, and the bearer token when one is given.
    ///
    /// With `None` a configured bearer token is kept; without one the
    /// bearer keeps following the API key. Requests started after this
    /// call use the new values.
    pub fn rotate_credentials(&self, api_key: &str, bearer_token: Option<&str>) -> StoreResult<()> {
        if api_key.trim().is_empty() {
            return Err(StoreError::InvalidConfig("api_key must not be empty".into()));
        }

        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::InvalidConfig("config lock poisoned".into()))?;
        guard.store.api_key = api_key.to_string();
        if let Some(token) = bearer_token {
            guard.store.bearer_token = Some(token.to_string());
        }

        info!("Store credentials rotated");
        Ok(())
    }

    /// Re-reads the configuration from disk and the environment.
    ///
    /// The current configuration is kept if the new one fails to load.
    pub fn reload(&self, config_path: Option<&Path>) -> StoreResult<()> {
        let fresh = DashboardConfig::load(config_path.map(Path::to_path_buf))?;
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::InvalidConfig("config lock poisoned".into()))?;
        *guard = fresh;

        info!("Dashboard config reloaded");
        Ok(())
    }
}

impl CredentialSource for SharedConfig {
    fn credentials(&self) -> StoreResult<StoreCredentials> {
        self.inner
            .read()
            .map_err(|_| StoreError::InvalidConfig("config lock poisoned".into()))?
            .credentials()
    }
}
