//! TOML-based configuration.
//!
//! Every struct implements `Default`, so a missing or partial `config.toml`
//! behaves like the built-in values: a 1280x800 window titled "bws" showing
//! `http://www.google.com`.
//!
//! ## Config file search order
//!
//! 1. `BWS_CONFIG` environment variable (explicit override)
//! 2. Next to the executable (`<exe_dir>/config.toml`)
//! 3. Platform config directory (`%APPDATA%\bws\config.toml` on Windows,
//!    `$XDG_CONFIG_HOME/bws/config.toml` elsewhere)
//! 4. Current working directory (`./config.toml`)
//! 5. No file found → `Config::default()`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Adresse ouverte quand ni la configuration ni la ligne de commande n'en donnent.
pub const DEFAULT_URL: &str = "http://www.google.com";

const CONFIG_FILE_NAME: &str = "config.toml";

// ─────────────────────────────────────────────────────────────────────────────
// Config structs
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub window: WindowConfig,
    pub servo: ServoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub url: String,
    pub window_title: String,
}

/// Initial window size, in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

/// Servo engine tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoConfig {
    /// Maximum layout threads. 0 = auto-detect from CPU count.
    pub layout_threads: i64,
    /// HTTP cache size in bytes.
    pub cache_size: i64,
    /// User-agent string. Empty = Servo's own.
    pub user_agent: String,
    /// Pre-cache GPU shaders at startup.
    pub precache_shaders: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            window_title: "bws".to_string(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            layout_threads: 0,
            cache_size: 50_000,
            user_agent: String::new(),
            precache_shaders: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Loads configuration from the first config file found. Never fails:
    /// returns defaults if no file is found or if it cannot be used.
    pub fn load() -> Self {
        match find_config_path(&candidate_paths()) {
            Some(path) => Self::load_from(&path),
            None => {
                info!("No config file found, using defaults");
                Config::default()
            }
        }
    }

    /// Loads one specific file, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "Configuration loaded");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                    Config::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read config, using defaults");
                Config::default()
            }
        }
    }
}

/// Standard config locations, in search order.
fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(path) = std::env::var("BWS_CONFIG") {
        candidates.push(PathBuf::from(path));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        candidates.push(dir.join(CONFIG_FILE_NAME));
    }

    if let Some(dir) = platform_config_dir() {
        candidates.push(dir.join(CONFIG_FILE_NAME));
    }

    candidates.push(PathBuf::from(CONFIG_FILE_NAME));
    candidates
}

/// First candidate that is an existing regular file.
fn find_config_path(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Returns the platform config directory without adding a dependency.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join("bws"))
    }
    #[cfg(not(windows))]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .or_else(|| std::env::var("HOME").ok().map(|h| format!("{h}/.config")))
            .map(|dir| PathBuf::from(dir).join("bws"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.general.url, "http://www.google.com");
        assert_eq!(c.general.window_title, "bws");
        assert_eq!(c.window.width, 1280);
        assert_eq!(c.window.height, 800);
        assert_eq!(c.servo.layout_threads, 0);
        assert_eq!(c.servo.cache_size, 50_000);
        assert!(c.servo.user_agent.is_empty());
        assert!(c.servo.precache_shaders);
    }

    #[test]
    fn test_empty_toml_returns_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml = r#"
[general]
url = "https://servo.org"

[window]
width = 1920
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.general.url, "https://servo.org");
        assert_eq!(config.general.window_title, "bws"); // default
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.window.height, 800); // default
        assert_eq!(config.servo.cache_size, 50_000); // default
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[servo]\nuser_agent = \"bws-test\"\nlayout_threads = 2\n").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.servo.user_agent, "bws-test");
        assert_eq!(config.servo.layout_threads, 2);
        assert_eq!(config.general.url, DEFAULT_URL);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[window\nwidth = ").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_wrong_type_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[window]\nwidth = \"large\"\n").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_find_config_path_takes_first_existing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let first = dir.path().join("first.toml");
        let second = dir.path().join("second.toml");
        fs::write(&first, "").unwrap();
        fs::write(&second, "").unwrap();

        let found = find_config_path(&[missing, first.clone(), second]);
        assert_eq!(found, Some(first));
    }

    #[test]
    fn test_find_config_path_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let as_dir = dir.path().join(CONFIG_FILE_NAME);
        fs::create_dir(&as_dir).unwrap();

        assert_eq!(find_config_path(&[as_dir]), None);
    }

    #[test]
    fn test_candidates_end_with_working_directory() {
        let candidates = candidate_paths();
        assert_eq!(candidates.last(), Some(&PathBuf::from(CONFIG_FILE_NAME)));
    }
}
