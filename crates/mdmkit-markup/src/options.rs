//! Reader configuration

use serde::{Deserialize, Serialize};

/// What to do when the reader meets a child element it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownNodePolicy {
    /// Fail the read with a distinct error.
    Error,

    /// Record a warning and skip the node.
    Warn,

    /// Skip the node silently.
    Ignore,
}

impl Default for UnknownNodePolicy {
    fn default() -> Self {
        Self::Warn
    }
}

/// Reader behavior configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderOptions {
    /// Unknown-node handling.
    #[serde(default)]
    pub unknown_nodes: UnknownNodePolicy,

    /// Maximum element nesting depth before the read fails. Bounds reader
    /// recursion on hostile or corrupted input.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Whether to keep per-occurrence warnings for retrieval after the read.
    #[serde(default = "default_true")]
    pub collect_warnings: bool,
}

fn default_max_depth() -> usize {
    256
}

fn default_true() -> bool {
    true
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            unknown_nodes: UnknownNodePolicy::default(),
            max_depth: default_max_depth(),
            collect_warnings: true,
        }
    }
}

impl ReaderOptions {
    /// Strict options: unknown nodes fail the read.
    pub fn strict() -> Self {
        Self {
            unknown_nodes: UnknownNodePolicy::Error,
            ..Self::default()
        }
    }

    /// Load options from a TOML file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, OptionsError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| OptionsError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load options from a TOML string.
    pub fn from_toml(toml: &str) -> Result<Self, OptionsError> {
        toml::from_str(toml).map_err(|e| OptionsError::ParseError(e.to_string()))
    }
}

/// Options loading errors.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
