//! User configuration loaded from `config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::calculator::{AngleMode, format_display, format_plain};

const APP_DIR: &str = "scicalc";
const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Unit for trigonometric arguments and inverse trigonometric results.
    pub angle_mode: AngleMode,
    /// Group result digits with `,` when printing.
    pub thousands_separator: bool,
    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            angle_mode: AngleMode::Degrees,
            thousands_separator: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Default location: `$XDG_CONFIG_HOME/scicalc/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// File to load: the explicit path (which must exist) or the default
    /// location when a file is present there.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.exists()),
        }
    }

    /// Load the located file, or defaults when there is none.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match Self::locate(explicit) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Format a result according to the separator preference.
    pub fn format_value(&self, value: f64) -> String {
        if self.thousands_separator {
            format_display(value)
        } else {
            format_plain(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            angle_mode = "radians"
            thousands_separator = false
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.angle_mode, AngleMode::Radians);
        assert!(!config.thousands_separator);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::parse(r#"angle_mode = "gradians""#).is_err());
        assert!(Config::parse("unknown_key = 1").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/scicalc.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_locate_prefers_explicit_path() {
        let explicit = Path::new("/nonexistent/scicalc.toml");
        assert_eq!(Config::locate(Some(explicit)), Some(explicit.to_path_buf()));
        if let Some(found) = Config::locate(None) {
            assert!(found.exists());
        }
    }

    #[test]
    fn test_format_value() {
        let mut config = Config::default();
        assert_eq!(config.format_value(1234567.0), "1,234,567");
        config.thousands_separator = false;
        assert_eq!(config.format_value(1234567.0), "1234567");
    }
}
