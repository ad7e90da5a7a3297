use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://localhost:3001/api"
timeout_secs = 30

[session]
# Where the login session is stored between runs
# path = "/home/me/.config/wabiz/session.json"
"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ClientConfig {
    pub api: Option<ApiSettings>,
    pub session: Option<SessionSettings>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SessionSettings {
    pub path: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:3001/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();
        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    /// Reads the config at `config_path`, writing the default file first if
    /// there is none.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()))
            .build()?;

        builder.try_deserialize()
    }

    pub fn api(&self) -> ApiSettings {
        self.api.clone().unwrap_or_default()
    }

    pub fn session_path(&self) -> PathBuf {
        self.session
            .as_ref()
            .and_then(|s| s.path.clone())
            .unwrap_or_else(get_session_path)
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("wabiz").join("client.toml")
    } else {
        PathBuf::from("client.toml")
    }
}

pub fn get_session_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("wabiz").join("session.json")
    } else {
        PathBuf::from("session.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_is_written_and_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("client.toml");

        let config = ClientConfig::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.api(), ApiSettings::default());
        assert_eq!(config.api().timeout(), Duration::from_secs(30));
        assert_eq!(config.session_path(), get_session_path());
    }

    #[test]
    fn test_values_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://api.example.com"

[session]
path = "/tmp/wabiz-session.json"
"#,
        )
        .unwrap();

        let config = ClientConfig::load_from(&path).unwrap();

        assert_eq!(config.api().base_url, "https://api.example.com");
        assert_eq!(config.api().timeout_secs, 30);
        assert_eq!(config.session_path(), PathBuf::from("/tmp/wabiz-session.json"));
    }
}
