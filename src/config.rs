//! Configuration file support
//!
//! Loads settings from ~/.lexpad.toml (or %USERPROFILE%\.lexpad.toml on Windows)
//!
//! Example:
//! ```text
//! # lexpad configuration
//! compiler-url = "http://127.0.0.1:8123/compile"
//! theme = "dark"
//! line-numbers = true
//! debounce-ms = 150
//! overlap = "exclusive"
//! tab-width = 4
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compile::DEFAULT_COMPILER_URL;
use crate::debounce::DEFAULT_DEBOUNCE_MS;
use crate::syntax::OverlapMode;

const CONFIG_FILE_NAME: &str = ".lexpad.toml";

/// Which palette to render with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow the terminal; renders with the dark palette
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    /// Next mode in the cycle system -> light -> dark -> system
    pub fn next(self) -> Self {
        match self {
            ThemeMode::System => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::System,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Compile service endpoint
    pub compiler_url: String,
    pub theme: ThemeMode,
    /// Whether to show line numbers
    #[serde(rename = "line-numbers")]
    pub show_line_numbers: bool,
    /// Quiet period before re-highlighting, in milliseconds
    pub debounce_ms: u64,
    pub overlap: OverlapMode,
    /// Tab width for display
    pub tab_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compiler_url: DEFAULT_COMPILER_URL.to_string(),
            theme: ThemeMode::default(),
            show_line_numbers: false,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            overlap: OverlapMode::default(),
            tab_width: 8,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(CONFIG_FILE_NAME))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(CONFIG_FILE_NAME))
        }
    }

    /// Load configuration from the default location
    ///
    /// A missing file gives the defaults. So does a malformed one, with a
    /// logged warning.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Config::default(),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "cannot read config");
                return Config::default();
            }
        };
        match Self::parse(&contents) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "config loaded");
                config
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "malformed config, using defaults");
                Config::default()
            }
        }
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(contents)?;
        config.normalize();
        Ok(config)
    }

    /// Pull out-of-range values back into range
    fn normalize(&mut self) {
        self.debounce_ms = self.debounce_ms.clamp(20, 2000);
        self.tab_width = self.tab_width.clamp(1, 16);
        if self.compiler_url.trim().is_empty() {
            self.compiler_url = DEFAULT_COMPILER_URL.to_string();
        }
    }

    /// Write the whole configuration to `path`
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let body = toml::to_string_pretty(self).map_err(io::Error::other)?;
        let contents = format!("# lexpad configuration\n# Generated automatically\n\n{}", body);
        fs::write(path, contents)?;
        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
compiler-url = "http://build.local:9000/compile"
theme = "light"
line-numbers = true
debounce-ms = 300
overlap = "layered"
tab-width = 4
        "#;

        let config = Config::parse(contents).unwrap();
        assert_eq!(config.compiler_url, "http://build.local:9000/compile");
        assert_eq!(config.theme, ThemeMode::Light);
        assert!(config.show_line_numbers);
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.overlap, OverlapMode::Layered);
        assert_eq!(config.tab_width, 4);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = Config::parse("theme = \"dark\"").unwrap();
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.compiler_url, DEFAULT_COMPILER_URL);
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.overlap, OverlapMode::Exclusive);
        assert!(!config.show_line_numbers);
    }

    #[test]
    fn test_values_are_clamped() {
        let config = Config::parse("debounce-ms = 1\ntab-width = 99\ncompiler-url = \" \"").unwrap();
        assert_eq!(config.debounce_ms, 20);
        assert_eq!(config.tab_width, 16);
        assert_eq!(config.compiler_url, DEFAULT_COMPILER_URL);

        let config = Config::parse("debounce-ms = 100000").unwrap();
        assert_eq!(config.debounce_ms, 2000);
    }

    #[test]
    fn test_malformed_config() {
        assert!(Config::parse("theme = \"purple\"").is_err());
        assert!(Config::parse("line-numbers = ").is_err());
    }

    #[test]
    fn test_theme_cycle() {
        assert_eq!(ThemeMode::System.next(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.next(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.next(), ThemeMode::System);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexpad.toml");
        let config = Config {
            compiler_url: "http://10.0.0.2:8123/compile".to_string(),
            theme: ThemeMode::Dark,
            show_line_numbers: true,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("line-numbers = true"));
        assert!(contents.contains("theme = \"dark\""));
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from(&dir.path().join("absent.toml")), Config::default());

        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "this is not toml [").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }
}
