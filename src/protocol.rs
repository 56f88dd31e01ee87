//! Messages carried between the facade and mounted modals.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the only event kind published on the modal channel.
pub const TOGGLE_EVENT: &str = "toggle";

/// A request to change the visibility of a named modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleEvent {
    /// Name of the target modal
    pub name: String,
    /// `Some(true)` opens, `Some(false)` closes, `None` flips
    pub visible: Option<bool>,
    /// Caller-supplied parameters handed to the modal
    #[serde(default)]
    pub params: Option<Value>,
}

impl ToggleEvent {
    pub fn show(name: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            name: name.into(),
            visible: Some(true),
            params,
        }
    }

    pub fn hide(name: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            name: name.into(),
            visible: Some(false),
            params,
        }
    }

    pub fn flip(name: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            name: name.into(),
            visible: None,
            params,
        }
    }

    /// Visibility after applying this event to a modal currently at `current`.
    pub fn resolve(&self, current: bool) -> bool {
        self.visible.unwrap_or(!current)
    }
}
