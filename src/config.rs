//! Configuration management for the OpenSextant tagger using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::services::tagging::OffsetUnit;

/// Name used for config file discovery (`opensextant.toml`, `.json`, `.yaml`, ...).
pub const CONFIG_NAME: &str = "opensextant";

/// Per-request timeout for the extraction service.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// TLS certificate verification for the extraction service.
///
/// Examples:
/// - `false` - accept any certificate
/// - `true` - verify against the built-in roots
/// - `"/etc/ssl/gateway.ca-bundle"` - verify against this bundle only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerifySsl {
    Enabled(bool),
    CaBundle(String),
}

impl Default for VerifySsl {
    fn default() -> Self {
        VerifySsl::Enabled(false)
    }
}

/// Client-side certificate presented to the service.
///
/// Either one PEM file holding both key and certificate, or a
/// `["cert.pem", "key.pem"]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientCert {
    Combined(String),
    Pair(String, String),
}

impl ClientCert {
    /// All file paths, in the order they should be concatenated.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            ClientCert::Combined(p) => vec![p.as_str()],
            ClientCert::Pair(cert, key) => vec![cert.as_str(), key.as_str()],
        }
    }
}

/// Settings for the OpenSextant tagging stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggerConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// `host:port` of the extraction service.
    #[serde(default = "default_network_address")]
    pub network_address: String,
    #[serde(default = "default_service_path")]
    pub service_path: String,
    #[serde(default)]
    pub verify_ssl: VerifySsl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<ClientCert>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Tagger id whose sentences supply the tokens to annotate.
    #[serde(default = "default_source_tagger_id")]
    pub source_tagger_id: String,
    /// Unit of the offsets the service reports.
    #[serde(default)]
    pub offset_unit: OffsetUnit,
    /// Path listing the available extractors, used for availability checks.
    #[serde(default = "default_probe_path")]
    pub probe_path: String,
}

fn default_scheme() -> String {
    "http".to_string()
}
fn default_network_address() -> String {
    "localhost:8182".to_string()
}
fn default_service_path() -> String {
    "/opensextant/extract/general/json".to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_source_tagger_id() -> String {
    "nltk_tokenizer".to_string()
}
fn default_probe_path() -> String {
    "/opensextant/extract/".to_string()
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            network_address: default_network_address(),
            service_path: default_service_path(),
            verify_ssl: VerifySsl::default(),
            username: None,
            password: None,
            cert: None,
            timeout_secs: default_timeout_secs(),
            source_tagger_id: default_source_tagger_id(),
            offset_unit: OffsetUnit::default(),
            probe_path: default_probe_path(),
        }
    }
}

impl TaggerConfig {
    /// URL the document text is POSTed to.
    pub fn rest_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.network_address, self.service_path)
    }

    /// URL listing the service's extractors.
    pub fn probe_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.network_address, self.probe_path)
    }

    /// Basic-auth credentials, only when both parts are set and non-empty.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }

    pub fn with_network_address(mut self, address: &str) -> Self {
        self.network_address = address.to_string();
        self
    }

    pub fn with_source_tagger_id(mut self, tagger_id: &str) -> Self {
        self.source_tagger_id = tagger_id.to_string();
        self
    }

    /// Apply `OPENSEXTANT_*` environment variable overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(address) = lookup("OPENSEXTANT_NETWORK_ADDRESS") {
            self.network_address = address;
        }
        if let Some(username) = lookup("OPENSEXTANT_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = lookup("OPENSEXTANT_PASSWORD") {
            self.password = Some(password);
        }
        self
    }

    /// Resolve certificate paths relative to `base_dir`, expanding `~`.
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        if let VerifySsl::CaBundle(ref mut bundle) = self.verify_ssl {
            *bundle = resolve_path(bundle, base_dir);
        }
        match self.cert {
            Some(ClientCert::Combined(ref mut path)) => {
                *path = resolve_path(path, base_dir);
            }
            Some(ClientCert::Pair(ref mut cert, ref mut key)) => {
                *cert = resolve_path(cert, base_dir);
                *key = resolve_path(key, base_dir);
            }
            None => {}
        }
    }

    /// Copy safe to print: the password is masked.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.password.is_some() {
            config.password = Some("********".to_string());
        }
        config
    }
}

/// Resolve a path that may be relative to the config file.
/// - Absolute paths are returned as-is
/// - Paths starting with ~ are expanded
/// - Relative paths are joined onto `base_dir`
fn resolve_path(path_str: &str, base_dir: &Path) -> String {
    let expanded = shellexpand::tilde(path_str);
    let path = Path::new(expanded.as_ref());

    if path.is_absolute() {
        path.display().to_string()
    } else {
        base_dir.join(path).display().to_string()
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub opensextant: TaggerConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults (with env overrides) when nothing is found.
    pub async fn load() -> Self {
        match prefer::load(CONFIG_NAME).await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config {}: {}", path.display(), e);
                            Self::default_with_env()
                        }
                    }
                } else {
                    Self::default_with_env()
                }
            }
            Err(_) => Self::default_with_env(),
        }
    }

    /// Create a default config with environment variable overrides applied.
    pub fn default_with_env() -> Self {
        Self {
            opensextant: TaggerConfig::default().with_env_overrides(),
            source_path: None,
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config = Self::parse(&contents, ext)?;

        config.source_path = Some(path.to_path_buf());
        if let Some(base_dir) = config.base_dir() {
            config.opensextant.resolve_paths(&base_dir);
        }
        config.opensextant = config.opensextant.with_env_overrides();
        Ok(config)
    }

    fn parse(contents: &str, ext: &str) -> Result<Self, String> {
        match ext {
            "toml" => toml::from_str(contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e)),
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }
    }

    /// Directory of the config file, used to resolve relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }
}
