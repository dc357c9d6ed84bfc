//! User configuration, read from `config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::calculator::{
    DEFAULT_EMPTY_PLACEHOLDER, DEFAULT_ERROR_TEXT, DEFAULT_PRECISION, DisplayOptions,
    NumberFormat,
};

/// How long `clear` must be held before it fires without a release.
pub const DEFAULT_LONG_PRESS_MS: u64 = 550;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Long-press delay for `clear`, in milliseconds.
    pub long_press_ms: u64,
    /// Significant digits kept for non-integer results.
    pub precision: usize,
    /// Result text shown when a commit fails.
    pub error_text: String,
    /// Expression text shown while the buffer is empty.
    pub empty_placeholder: String,
    /// Show thousand separators in the result area.
    pub group_digits: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            precision: DEFAULT_PRECISION,
            error_text: DEFAULT_ERROR_TEXT.to_string(),
            empty_placeholder: DEFAULT_EMPTY_PLACEHOLDER.to_string(),
            group_digits: false,
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/tapcalc/config.toml`, or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tapcalc").join("config.toml"))
    }

    /// Load the configuration at `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from [`Config::default_path`], falling back to defaults when no
    /// config directory exists.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => {
                tracing::warn!("no config directory found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            format: NumberFormat {
                precision: self.precision,
                group_digits: self.group_digits,
            },
            error_text: self.error_text.clone(),
            empty_placeholder: self.empty_placeholder.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.long_press(), Duration::from_millis(550));
        assert_eq!(config.display_options(), DisplayOptions::default());
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str("group_digits = true\nerror_text = \"Err\"").unwrap();
        assert!(config.group_digits);
        assert_eq!(config.error_text, "Err");
        assert_eq!(config.long_press_ms, DEFAULT_LONG_PRESS_MS);
        assert_eq!(config.precision, DEFAULT_PRECISION);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<Config>("colour = \"red\"").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("tapcalc-missing-dir/config.toml");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_load_file() {
        let dir = std::env::temp_dir().join(format!("tapcalc-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "long_press_ms = 300\nprecision = 6\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.long_press(), Duration::from_millis(300));
        assert_eq!(config.display_options().format.precision, 6);

        std::fs::write(&path, "precision = \"lots\"").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
