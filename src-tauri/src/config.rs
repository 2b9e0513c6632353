use std::path::{Path, PathBuf};
use std::time::Duration;

use platform_dirs::AppDirs;
use resolver::http_client::RemoteConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_ID: &str = "cc.thepoy.lsar";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot locate app directories")]
    NoAppDirs,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialize config failed: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl From<ConfigError> for String {
    fn from(err: ConfigError) -> Self {
        err.to_string()
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub remote: RemoteSection,
    #[serde(skip)]
    pub config_path: PathBuf,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct PlayerConfig {
    pub path: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct PlatformConfig {
    #[serde(default)]
    pub bilibili: BilibiliConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct BilibiliConfig {
    pub cookie: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct RemoteSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// `0` disables the timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    RemoteConfig::default().endpoint
}

fn default_timeout_secs() -> Option<u64> {
    Some(30)
}

fn default_database() -> String {
    app_dirs()
        .map(|dirs| dirs.data_dir.join("data.db").to_string_lossy().to_string())
        .unwrap_or_else(|_| "data.db".to_string())
}

pub fn app_dirs() -> Result<AppDirs, ConfigError> {
    AppDirs::new(Some(APP_ID), false).ok_or(ConfigError::NoAppDirs)
}

impl Config {
    /// Loads `Conf.toml` from the app config dir, writing defaults if it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = app_dirs()?.config_dir.join("Conf.toml");
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if let Ok(content) = std::fs::read_to_string(config_path) {
            match toml::from_str::<Config>(&content) {
                Ok(mut config) => {
                    config.config_path = config_path.to_path_buf();
                    return Ok(config);
                }
                Err(e) => {
                    let backup = config_path.with_extension("toml.bak");
                    log::warn!(
                        "Invalid config file {}: {}, moved to {}",
                        config_path.display(),
                        e,
                        backup.display()
                    );
                    std::fs::rename(config_path, &backup)?;
                }
            }
        }
        let config = Config {
            database: default_database(),
            player: PlayerConfig::default(),
            platform: PlatformConfig::default(),
            remote: RemoteSection::default(),
            config_path: config_path.to_path_buf(),
        };
        config.save()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let content = toml::to_string(&self)?;
        if let Some(dir) = self.config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    pub fn set_bilibili_cookie(&mut self, cookie: &str) -> Result<(), ConfigError> {
        self.platform.bilibili.cookie = cookie.trim().to_string();
        self.save()
    }

    pub fn set_player(&mut self, path: &str, args: Vec<String>) -> Result<(), ConfigError> {
        self.player.path = path.to_string();
        self.player.args = args;
        self.save()
    }

    pub fn remote_config(&self) -> RemoteConfig {
        RemoteConfig {
            endpoint: self.remote.endpoint.clone(),
            timeout: self
                .remote
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("lsar-test-{}-{}", name, std::process::id()))
            .join("Conf.toml")
    }

    #[test]
    fn test_load_writes_defaults() {
        let path = temp_config_path("defaults");
        let _ = std::fs::remove_file(&path);

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert!(config.platform.bilibili.cookie.is_empty());
        assert_eq!(config.remote.endpoint, "http://127.0.0.1:7777");
        assert_eq!(config.remote_config().timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_cookie_round_trips_through_file() {
        let path = temp_config_path("cookie");
        let _ = std::fs::remove_file(&path);

        let mut config = Config::load_from(&path).unwrap();
        config.set_bilibili_cookie("  SESSDATA=abc  ").unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.platform.bilibili.cookie, "SESSDATA=abc");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let path = temp_config_path("partial");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[player]\npath = \"mpv\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.player.path, "mpv");
        assert!(config.player.args.is_empty());
        assert_eq!(config.remote.timeout_secs, Some(30));
    }

    #[test]
    fn test_invalid_file_is_kept_aside() {
        let path = temp_config_path("invalid");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let broken = "[platform.bilibili]\ncookie = \"SESSDATA=abc\"\n[player\n";
        std::fs::write(&path, broken).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.platform.bilibili.cookie.is_empty());
        let backup = path.with_extension("toml.bak");
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), broken);
        assert!(toml::from_str::<Config>(&std::fs::read_to_string(&path).unwrap()).is_ok());
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let path = temp_config_path("timeout");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[remote]\nendpoint = \"http://10.0.0.2:7777\"\ntimeout_secs = 0\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.remote_config().endpoint, "http://10.0.0.2:7777");
        assert_eq!(config.remote_config().timeout, None);
    }
}
