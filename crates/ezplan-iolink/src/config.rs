//! Loader configuration
//!
//! ```toml
//! extension = "lrp"
//! max_file_size = 10485760
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Template loader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Template file extension, without dot, matched case-insensitively
    pub extension: String,
    /// Maximum template file size (bytes)
    pub max_file_size: u64,
}

impl LoaderConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With template file extension
    #[inline]
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// With maximum template file size
    #[inline]
    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Parse configuration from TOML
    ///
    /// # Errors
    /// - `ConfigError::Toml` on syntax or type errors
    /// - `ConfigError::Invalid` if the extension is empty or the size limit is zero
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - Any error of [`Self::from_toml_str`]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Invalid("extension must not be empty".to_string()));
        }
        if self.max_file_size == 0 {
            return Err(ConfigError::Invalid(
                "max_file_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Extension without leading dot
    pub(crate) fn bare_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            extension: "lrp".to_string(),
            max_file_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LoaderConfig::new();
        assert_eq!(config.extension, "lrp");
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = LoaderConfig::from_toml_str("max_file_size = 4096").unwrap();
        assert_eq!(config.extension, "lrp");
        assert_eq!(config.max_file_size, 4096);
    }

    #[test]
    fn dotted_extension_accepted() {
        let config = LoaderConfig::from_toml_str(r#"extension = ".xml""#).unwrap();
        assert_eq!(config.bare_extension(), "xml");
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            LoaderConfig::from_toml_str(r#"extension = """#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            LoaderConfig::from_toml_str("max_file_size = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            LoaderConfig::from_toml_str("max_file_size = \"big\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loader.toml");
        std::fs::write(&path, "extension = \"xml\"\n").unwrap();

        let config = LoaderConfig::from_file(&path).unwrap();
        assert_eq!(config.extension, "xml");

        assert!(matches!(
            LoaderConfig::from_file(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
