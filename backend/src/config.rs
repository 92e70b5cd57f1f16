//! Startup configuration read from the secrets file.
//!
//! The file is TOML with flat keys, for example:
//!
//! ```toml
//! admin_code = "..."
//! guest_code = "..."
//! dataset_url = "https://services.arcgis.com/<org>/arcgis/rest/services/service_centers_02/FeatureServer/0"
//! maps_api_key = "..."
//! ```
//!
//! Its path is taken from `SERVICE_CENTERS_CONFIG`, falling back to `secrets.toml`
//! in the working directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::session_controller::state::{DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS};

pub const CONFIG_PATH_ENV: &str = "SERVICE_CENTERS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "secrets.toml";

const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const GOOGLE_AUTOCOMPLETE_URL: &str = "https://maps.googleapis.com/maps/api/place/autocomplete/json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("`{0}` must not be empty")]
    Empty(&'static str),
    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),
}

#[derive(Clone, Deserialize)]
pub struct Config {
    pub admin_code: String,
    pub guest_code: String,
    pub dataset_url: String,
    pub maps_api_key: String,

    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Open the UI in the default browser once the server is listening.
    #[serde(default)]
    pub open_browser: bool,
    /// Rows requested per page when reading the whole dataset.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
    #[serde(default = "default_autocomplete_url")]
    pub autocomplete_url: String,
    /// Replaces the built-in list of 0/1 service flags.
    #[serde(default)]
    pub binary_fields: Option<Vec<String>>,
    /// Most sessions kept in memory at once.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// Minutes after which an unused session is dropped.
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u64,
}

// Secrets stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("dataset_url", &self.dataset_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("page_size", &self.page_size)
            .field("geocode_url", &self.geocode_url)
            .field("autocomplete_url", &self.autocomplete_url)
            .field("max_sessions", &self.max_sessions)
            .field("session_idle_minutes", &self.session_idle_minutes)
            .finish_non_exhaustive()
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_page_size() -> usize {
    1000
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

fn default_session_idle_minutes() -> u64 {
    DEFAULT_IDLE_TIMEOUT.as_secs() / 60
}

fn default_geocode_url() -> String {
    GOOGLE_GEOCODE_URL.to_string()
}

fn default_autocomplete_url() -> String {
    GOOGLE_AUTOCOMPLETE_URL.to_string()
}

impl Config {
    /// Loads the file named by `SERVICE_CENTERS_CONFIG`, or `secrets.toml`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load(&path)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("admin_code", &self.admin_code),
            ("guest_code", &self.guest_code),
            ("dataset_url", &self.dataset_url),
            ("maps_api_key", &self.maps_api_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(name));
            }
        }
        let counts = [
            ("page_size", self.page_size as u64),
            ("max_sessions", self.max_sessions as u64),
            ("session_idle_minutes", self.session_idle_minutes),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
        admin_code = "asiaan"
        guest_code = "visitor"
        dataset_url = "https://example.test/FeatureServer/0"
        maps_api_key = "key-123"
    "#;

    #[test]
    fn minimal_file_gets_defaults() {
        let config = Config::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.admin_code, "asiaan");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.geocode_url, GOOGLE_GEOCODE_URL);
        assert!(config.binary_fields.is_none());
        assert!(!config.open_browser);
        assert_eq!(config.max_sessions, 256);
        assert_eq!(config.session_idle_minutes, 60);
    }

    #[test]
    fn optional_keys_override_defaults() {
        let raw = format!(
            "{MINIMAL}\nport = 9000\npage_size = 50\nbinary_fields = [\"Wifi\", \"Printing\"]\n"
        );
        let config = Config::from_toml_str(&raw).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.page_size, 50);
        assert_eq!(
            config.binary_fields,
            Some(vec!["Wifi".to_string(), "Printing".to_string()])
        );
    }

    #[test]
    fn missing_secret_is_a_parse_error() {
        let err = Config::from_toml_str("admin_code = \"a\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn blank_access_code_is_rejected() {
        let raw = MINIMAL.replace("\"visitor\"", "\"  \"");
        let err = Config::from_toml_str(&raw).unwrap_err();
        assert!(matches!(err, ConfigError::Empty("guest_code")));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let raw = format!("{MINIMAL}\npage_size = 0\n");
        assert!(matches!(
            Config::from_toml_str(&raw),
            Err(ConfigError::Zero("page_size"))
        ));
        let raw = format!("{MINIMAL}\nmax_sessions = 0\n");
        assert!(matches!(
            Config::from_toml_str(&raw),
            Err(ConfigError::Zero("max_sessions"))
        ));
    }

    #[test]
    fn loads_from_a_file_and_hides_secrets_in_debug() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.guest_code, "visitor");

        let debug = format!("{config:?}");
        assert!(!debug.contains("asiaan"));
        assert!(!debug.contains("key-123"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Config::load(Path::new("/nonexistent/secrets.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/secrets.toml"));
    }
}
