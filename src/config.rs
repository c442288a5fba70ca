use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fixed production endpoint, used when neither the config file nor the
/// environment provides one.
pub const DEFAULT_API_URL: &str = "https://hearth-api.fly.dev/api";

/// Environment variable that overrides the configured API base url.
pub const API_URL_ENV: &str = "HEARTH_API_URL";

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
  pub api: ApiConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Base url of the archive backend, e.g. "http://localhost:8000/api"
  pub base_url: String,
}

/// On-disk shape of the config file. Everything is optional; a missing
/// file is equivalent to an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
  #[serde(default)]
  api: FileApiConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileApiConfig {
  #[serde(default)]
  base_url: Option<String>,
}

impl Config {
  /// Load configuration.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./hearth.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/hearth/config.yaml
  ///
  /// A missing config file is fine; the environment override and the
  /// production default still apply.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let file = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => FileConfig::default(),
    };

    let base_url = resolve_api_url(file.api.base_url, std::env::var(API_URL_ENV).ok());

    Ok(Config {
      api: ApiConfig { base_url },
    })
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("hearth.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("hearth").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<FileConfig> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: FileConfig = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }
}

/// Precedence: environment over config file over the production default.
fn resolve_api_url(file_value: Option<String>, env_value: Option<String>) -> String {
  env_value
    .filter(|v| !v.trim().is_empty())
    .or(file_value)
    .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_env_beats_file_beats_default() {
    assert_eq!(
      resolve_api_url(
        Some("http://file:8000/api".into()),
        Some("http://env:8000/api".into())
      ),
      "http://env:8000/api"
    );
    assert_eq!(
      resolve_api_url(Some("http://file:8000/api".into()), None),
      "http://file:8000/api"
    );
    assert_eq!(resolve_api_url(None, None), DEFAULT_API_URL);
  }

  #[test]
  fn test_blank_env_value_is_ignored() {
    assert_eq!(
      resolve_api_url(Some("http://file:8000/api".into()), Some("  ".into())),
      "http://file:8000/api"
    );
  }

  #[test]
  fn test_file_config_parses_with_and_without_api_section() {
    let full: FileConfig = serde_yaml::from_str("api:\n  base_url: http://localhost:8000/api\n")
      .unwrap();
    assert_eq!(
      full.api.base_url.as_deref(),
      Some("http://localhost:8000/api")
    );

    let empty: FileConfig = serde_yaml::from_str("{}").unwrap();
    assert!(empty.api.base_url.is_none());
  }
}
