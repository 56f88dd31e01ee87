use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{PluginError, Result};
use crate::validation::validate_component_name;

/// Name the named-modal component registers under unless overridden.
pub const DEFAULT_COMPONENT_NAME: &str = "SidebarModal";
/// Fixed name of the dynamic modals container component.
pub const CONTAINER_COMPONENT_NAME: &str = "SidebarModalsContainer";

const OPTIONS_FILE: &str = "options.json";

/// Installation options.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    /// Overrides the registered name of the named-modal component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
}

impl PluginOptions {
    pub fn with_component_name(name: impl Into<String>) -> Self {
        Self {
            component_name: Some(name.into()),
        }
    }

    /// The name to register the named-modal component under.
    ///
    /// Missing or empty names fall back to [`DEFAULT_COMPONENT_NAME`], as does
    /// the container's own name. Any other name is used as given; naming
    /// conventions are only enforced by [`Self::validate`].
    pub fn resolved_component_name(&self) -> String {
        let Some(name) = self.component_name.as_deref().filter(|n| !n.is_empty()) else {
            return DEFAULT_COMPONENT_NAME.to_string();
        };

        if name == CONTAINER_COMPONENT_NAME {
            tracing::warn!(name, "component name collides with the container, using default");
            return DEFAULT_COMPONENT_NAME.to_string();
        }

        name.to_string()
    }

    /// Strict check used by `try_install`: rejects the container's name and
    /// names that are neither PascalCase nor kebab-case.
    pub fn validate(&self) -> Result<()> {
        let Some(name) = self.component_name.as_deref().filter(|n| !n.is_empty()) else {
            return Ok(());
        };

        if name == CONTAINER_COMPONENT_NAME {
            return Err(PluginError::InvalidComponentName {
                name: name.to_string(),
                reason: "reserved for the modals container".to_string(),
            });
        }

        validate_component_name(name).map_err(|reason| PluginError::InvalidComponentName {
            name: name.to_string(),
            reason,
        })
    }
}

pub fn options_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "sidebar-modals", "sidebar-modals")?;
    Some(proj.config_dir().join(OPTIONS_FILE))
}

/// Load options from the per-user config directory.
///
/// A missing or unreadable file yields the defaults.
pub fn load_options() -> PluginOptions {
    let Some(path) = options_path() else {
        return PluginOptions::default();
    };
    if !path.exists() {
        return PluginOptions::default();
    }

    match load_options_from(&path) {
        Ok(options) => options,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring options file");
            PluginOptions::default()
        }
    }
}

pub fn load_options_from(path: &Path) -> Result<PluginOptions> {
    let content = fs::read_to_string(path).map_err(|source| PluginError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_options(path: &Path, options: &PluginOptions) -> Result<()> {
    let io_err = |source| PluginError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    let data = serde_json::to_string_pretty(options)?;
    let mut file = fs::File::create(path).map_err(io_err)?;
    file.write_all(data.as_bytes()).map_err(io_err)?;
    Ok(())
}
