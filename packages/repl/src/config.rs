//! Editor configuration file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Line editing keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    Vi,
    Emacs,
}

/// Settings read from `config.json`. Every field is optional.
///
/// ```json
/// {
///   "device": "http://127.0.0.1:8080",
///   "defaults_dir": "/usr/share/outbreak/defaults",
///   "write_timeout_ms": 2000,
///   "edit_mode": "vi"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Device to connect to at startup: a bridge URL or `memory`.
    pub device: Option<String>,
    /// Directory of curated species defaults.
    pub defaults_dir: Option<PathBuf>,
    /// Longest a single device write may take before it is cancelled.
    pub write_timeout_ms: Option<u64>,
    pub edit_mode: Option<EditMode>,
}

impl EditorConfig {
    /// `<config_dir>/outbreak/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("outbreak").join("config.json"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit`, or the default path if it exists.
    ///
    /// A missing default file yields the default config; a missing explicit
    /// file is an error.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.write_timeout(), None);
    }

    #[test]
    fn load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"device": "memory", "defaults_dir": "/tmp/d", "write_timeout_ms": 250, "edit_mode": "vi"}"#,
        )
        .unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.device.as_deref(), Some("memory"));
        assert_eq!(config.defaults_dir, Some(PathBuf::from("/tmp/d")));
        assert_eq!(config.write_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.edit_mode, Some(EditMode::Vi));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            EditorConfig::discover(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn bad_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"write_timeout_ms": "soon"}"#).unwrap();

        let err = EditorConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.json"));
    }
}
