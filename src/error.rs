//! Errors surfaced by installation and option handling.
//!
//! The show/hide/toggle facade never returns these; unreachable targets are
//! silent no-ops.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin is already installed")]
    AlreadyInstalled,

    #[error("invalid component name {name:?}: {reason}")]
    InvalidComponentName { name: String, reason: String },

    #[error("failed to access options file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse options: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PluginError>;
