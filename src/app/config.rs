use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_API_BASE_URL, ENV_PREFIX, HTTP_REQUEST_TIMEOUT_SECS};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote REST API
    #[serde(default)]
    pub api: ApiSettings,

    /// Local session storage
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Remote REST API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Accept self-signed certificates (the development backend uses one)
    pub accept_invalid_certs: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
            accept_invalid_certs: false,
        }
    }
}

/// Session storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

fn env_layer() -> Env {
    Env::prefixed(ENV_PREFIX).split("__")
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".donorconnect/config.toml");

    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }
    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    // DONORCONNECT_API__BASE_URL and friends
    figment = figment.merge(env_layer());

    figment.extract().context("Failed to load configuration")
}

/// Load configuration from one explicit file, still honoring the environment
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found: {}", path.display());
    }
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(env_layer())
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "donorconnect") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("donorconnect");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Directory holding the session stores
pub fn get_data_dir(config: &Config) -> Result<PathBuf> {
    if let Some(dir) = &config.storage.data_dir {
        return Ok(dir.clone());
    }
    if let Some(proj_dirs) = ProjectDirs::from("", "", "donorconnect") {
        Ok(proj_dirs.data_dir().to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".local").join("share").join("donorconnect"))
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => get_config_dir()?.join("config.toml"),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Write a default configuration file if none exists.
///
/// Returns the path when a file was created.
pub fn init_config(path: Option<PathBuf>) -> Result<Option<PathBuf>> {
    let config_file = match path {
        Some(p) => p,
        None => get_config_dir()?.join("config.toml"),
    };
    if config_file.exists() {
        return Ok(None);
    }
    save_config(&Config::default(), Some(config_file.clone()))?;
    Ok(Some(config_file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://localhost:57679");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(!config.api.accept_invalid_certs);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.storage.data_dir, None);
    }

    #[test]
    fn test_file_layer_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [api]
                base_url = "https://api.donorconnect.dz"
                "#,
            )?;
            let config = load_config_from(Path::new("custom.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.api.base_url, "https://api.donorconnect.dz");
            assert_eq!(config.api.timeout_secs, 30);
            Ok(())
        });
    }

    #[test]
    fn test_env_layer_wins_over_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[api]\ntimeout_secs = 5\n")?;
            jail.set_env("DONORCONNECT_API__TIMEOUT_SECS", "12");
            jail.set_env("DONORCONNECT_LOGGING__LEVEL", "debug");
            let config = load_config_from(Path::new("custom.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.api.timeout_secs, 12);
            assert_eq!(config.logging.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(load_config_from(Path::new("/nonexistent/donorconnect.toml")).is_err());
    }

    #[test]
    fn test_init_then_save_round_trip() {
        // Inside a jail so concurrent env-setting tests cannot leak in
        figment::Jail::expect_with(|_jail| {
            let temp_dir = TempDir::new().map_err(|e| e.to_string())?;
            let path = temp_dir.path().join("nested/config.toml");

            assert_eq!(init_config(Some(path.clone())).unwrap(), Some(path.clone()));
            assert_eq!(init_config(Some(path.clone())).unwrap(), None);

            let mut config = load_config_from(&path).unwrap();
            config.storage.data_dir = Some(temp_dir.path().join("data"));
            save_config(&config, Some(path.clone())).unwrap();

            let reloaded = load_config_from(&path).unwrap();
            assert_eq!(reloaded, config);
            assert_eq!(get_data_dir(&reloaded).unwrap(), temp_dir.path().join("data"));
            Ok(())
        });
    }
}
