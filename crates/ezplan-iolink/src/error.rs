//! Error types for template ingestion
//!
//! Provides error handling for:
//! - Single-file template parsing
//! - Per-file ingestion (read, decode, parse, insert)
//! - Loader configuration

use std::path::{Path, PathBuf};

/// Errors from the single-file template parser
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Document has no content
    #[error("template document is empty")]
    Empty,

    /// XML could not be decoded into a template record
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// Document decoded but is not a usable template
    #[error("invalid template: {0}")]
    Invalid(String),
}

/// Failure of one template file
///
/// Every variant names the offending file. Failures never affect the store
/// or sibling files.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Template directory could not be listed
    #[error("cannot list templates in {dir}: {source}")]
    Discovery {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template file could not be read
    #[error("cannot read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No Tokio runtime to spawn ingestion tasks on
    #[error("cannot load templates from {dir} outside a tokio runtime")]
    NoRuntime {
        dir: PathBuf,
        #[source]
        source: tokio::runtime::TryCurrentError,
    },

    /// Template file exceeds the configured size limit
    #[error("template {path} is too large: {size} bytes (max: {max})")]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    /// Template file could not be parsed
    #[error("template {path} is malformed")]
    Malformed {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Another file already registered the same template name
    #[error("template {name} already exists (from {path})")]
    DuplicateTemplate { name: String, path: PathBuf },

    /// Ingestion task panicked or was aborted
    #[error("ingestion of {path} did not complete: {message}")]
    TaskFailed { path: PathBuf, message: String },
}

impl IngestError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create discovery error for directory
    pub fn discovery_error(dir: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Discovery {
            dir: dir.into(),
            source,
        }
    }

    /// File or directory the error refers to
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Discovery { dir, .. } | Self::NoRuntime { dir, .. } => dir,
            Self::Io { path, .. }
            | Self::TooLarge { path, .. }
            | Self::Malformed { path, .. }
            | Self::DuplicateTemplate { path, .. }
            | Self::TaskFailed { path, .. } => path,
        }
    }

    /// Check if error is a template name collision
    #[inline]
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateTemplate { .. })
    }
}

/// Errors loading loader configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this configuration
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Config values are inconsistent
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn duplicate_display() {
        let err = IngestError::DuplicateTemplate {
            name: "IFM_PN7092".to_string(),
            path: PathBuf::from("/templates/IFM_PN7092.LRP"),
        };
        assert!(err.is_duplicate());
        assert_eq!(
            err.to_string(),
            "template IFM_PN7092 already exists (from /templates/IFM_PN7092.LRP)"
        );
    }

    #[test]
    fn malformed_keeps_cause() {
        let err = IngestError::Malformed {
            path: PathBuf::from("broken.lrp"),
            source: ParseError::Empty,
        };
        assert_eq!(err.path(), Path::new("broken.lrp"));
        assert_eq!(
            err.source().map(ToString::to_string),
            Some("template document is empty".to_string())
        );
    }
}
