//! Sidebar modals for egui applications.
//!
//! Install the plugin once, mount named modals and a container under the
//! application root, then open and close modals by name (or mount components
//! on the fly) through the shared [`SidebarModals`] context.

pub mod app;
pub mod config;
pub mod error;
pub mod event_channel;
pub mod plugin;
pub mod protocol;
pub mod root;
pub mod ui;
pub mod validation;


pub use config::{PluginOptions, CONTAINER_COMPONENT_NAME, DEFAULT_COMPONENT_NAME};
pub use error::PluginError;
pub use plugin::{
    install, ComponentKind, ComponentRegistry, HostFramework, ModalTarget, MountedComponent,
    Plugin, SidebarModals,
};
pub use protocol::ToggleEvent;
pub use root::AppRoot;
