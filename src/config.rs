//! Configuration loading and management
//!
//! Handles parsing of `.svctrack.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::tracker::MAX_WINDOW_DAYS;

/// Config file name looked up in the working root
pub const CONFIG_FILE: &str = ".svctrack.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage backend configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Reporting configuration
    #[serde(default)]
    pub report: ReportConfig,
}

/// Which storage backend holds the records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    File,
    Remote,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendKind,

    /// Directory holding the JSON files, relative to the root
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    #[serde(default)]
    pub remote: RemoteConfig,
}

fn default_backend() -> BackendKind {
    BackendKind::File
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
            lock_timeout_ms: default_lock_timeout_ms(),
            remote: RemoteConfig::default(),
        }
    }
}

/// Remote JSON document settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Header carrying the API key (e.g. `X-Master-Key`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_header: Option<String>,

    /// Environment variable the key is read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key_header: None,
            api_key_env: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Look-back window for the completion report
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

fn default_window_days() -> u32 {
    30
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

impl Config {
    /// Load configuration from a `.svctrack.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `<root>/.svctrack.toml`. Defaults apply only when the file is
    /// absent; a file that exists must parse and validate, since it decides
    /// where records are written.
    pub fn load_from_root(root: &Path) -> crate::error::Result<Self> {
        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load(&config_path).map_err(|err| match err {
            crate::error::Error::InvalidConfig(_) => err,
            other => crate::error::Error::InvalidConfig(format!(
                "{}: {other}",
                config_path.display()
            )),
        })
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        self.storage.validate()?;
        if self.report.window_days == 0 || self.report.window_days > MAX_WINDOW_DAYS {
            return Err(crate::error::Error::InvalidConfig(format!(
                "report.window_days must be between 1 and {MAX_WINDOW_DAYS}"
            )));
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "storage.data_dir cannot be empty".to_string(),
            ));
        }
        if self.remote.timeout_secs == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "storage.remote.timeout_secs must be >= 1".to_string(),
            ));
        }
        if self.backend == BackendKind::Remote {
            let url = self.remote.url.as_deref().map(str::trim).unwrap_or("");
            if url.is_empty() {
                return Err(crate::error::Error::InvalidConfig(
                    "storage.remote.url is required for the remote backend".to_string(),
                ));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "storage.remote.url must be http(s): '{url}'"
                )));
            }
        }
        if self.remote.api_key_header.is_some() != self.remote.api_key_env.is_some() {
            return Err(crate::error::Error::InvalidConfig(
                "storage.remote.api_key_header and api_key_env must be set together".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.storage.backend, BackendKind::File);
        assert_eq!(cfg.storage.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.storage.lock_timeout_ms, DEFAULT_LOCK_TIMEOUT_MS);
        assert!(cfg.storage.remote.url.is_none());
        assert_eq!(cfg.storage.remote.timeout_secs, 10);
        assert_eq!(cfg.report.window_days, 30);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
[storage]
backend = "remote"
data_dir = "records"

[storage.remote]
url = "https://api.example.com/b/abc"
api_key_header = "X-Master-Key"
api_key_env = "SVCTRACK_API_KEY"
timeout_secs = 3

[report]
window_days = 7
"#,
        )
        .expect("write config");

        let cfg = Config::load(&path).expect("load");
        assert_eq!(cfg.storage.backend, BackendKind::Remote);
        assert_eq!(cfg.storage.data_dir, PathBuf::from("records"));
        assert_eq!(cfg.storage.remote.url.as_deref(), Some("https://api.example.com/b/abc"));
        assert_eq!(cfg.storage.remote.api_key_header.as_deref(), Some("X-Master-Key"));
        assert_eq!(cfg.storage.remote.timeout_secs, 3);
        assert_eq!(cfg.report.window_days, 7);
    }

    #[test]
    fn remote_backend_requires_url() {
        let mut cfg = Config::default();
        cfg.storage.backend = BackendKind::Remote;
        assert!(cfg.validate().is_err());

        cfg.storage.remote.url = Some("ftp://example.com/doc".to_string());
        assert!(cfg.validate().is_err());

        cfg.storage.remote.url = Some("https://example.com/doc".to_string());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn window_bounds_enforced() {
        let mut cfg = Config::default();
        cfg.report.window_days = 0;
        assert!(cfg.validate().is_err());

        cfg.report.window_days = MAX_WINDOW_DAYS + 1;
        assert!(cfg.validate().is_err());

        cfg.report.window_days = MAX_WINDOW_DAYS;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn load_from_root_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_root(dir.path()).expect("defaults");
        assert_eq!(cfg.report.window_days, 30);
    }

    #[test]
    fn load_from_root_rejects_invalid_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(CONFIG_FILE), "[report]\nwindow_days = 0\n").expect("write");
        let err = Config::load_from_root(dir.path()).unwrap_err();
        assert!(matches!(err, crate::error::Error::InvalidConfig(_)));

        fs::write(dir.path().join(CONFIG_FILE), "[storage\n").expect("write");
        let err = Config::load_from_root(dir.path()).unwrap_err();
        assert!(matches!(err, crate::error::Error::InvalidConfig(_)));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        Config::default().save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("backend = \"file\""));
        assert!(written.contains("window_days = 30"));

        let reloaded = Config::load(&path).expect("reload");
        assert_eq!(reloaded.storage.data_dir, PathBuf::from("data"));
    }
}
