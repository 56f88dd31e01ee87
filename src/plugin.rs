//! Plugin installation and the show/hide/toggle facade.
//!
//! [`Plugin`] is the install-once guard. Installing registers the two
//! built-in components with the host and hands back the shared
//! [`SidebarModals`] context, which every component and caller uses to reach
//! the toggle channel and the root's dynamic container.
//!
//! The facade never fails. Requests for modals that are not mounted, or for
//! dynamic modals before a root with a container exists, are dropped.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::config::{PluginOptions, CONTAINER_COMPONENT_NAME};
use crate::error::{PluginError, Result};
use crate::event_channel::EventChannel;
use crate::protocol::{ToggleEvent, TOGGLE_EVENT};
use crate::root::AppRoot;
use crate::ui::container::{DynamicContainer, EntryId, ModalEvents, Renderable};
use crate::ui::named_modal::NamedModal;

/// Process-wide install guard used by [`install`].
pub static PLUGIN: Plugin = Plugin::new();

/// Install into `host` through the process-wide guard.
pub fn install(host: &mut dyn HostFramework, options: PluginOptions) -> Arc<SidebarModals> {
    PLUGIN.install(host, options)
}

/// Kinds of component the plugin registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    NamedModal,
    ModalsContainer,
}

/// Extension point of the host UI framework.
pub trait HostFramework {
    fn register_component(&mut self, name: &str, kind: ComponentKind);
}

/// A component instantiated from a registered tag.
#[derive(Debug)]
pub enum MountedComponent {
    Modal(NamedModal),
    Container(DynamicContainer),
}

/// Tag-to-component table for hosts that mount components by name.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: BTreeMap<String, ComponentKind>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, tag: &str) -> Option<ComponentKind> {
        self.components.get(tag).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Instantiate the component registered as `tag`.
    ///
    /// `name` is the logical modal name and is ignored for the container.
    /// Unknown tags yield `None`.
    pub fn mount(
        &self,
        tag: &str,
        modals: &SidebarModals,
        root: &Arc<AppRoot>,
        name: &str,
    ) -> Option<MountedComponent> {
        match self.resolve(tag)? {
            ComponentKind::NamedModal => {
                Some(MountedComponent::Modal(NamedModal::mount(modals, root, name)))
            }
            ComponentKind::ModalsContainer => {
                Some(MountedComponent::Container(modals.mount_container(root)))
            }
        }
    }
}

impl HostFramework for ComponentRegistry {
    fn register_component(&mut self, name: &str, kind: ComponentKind) {
        self.components.insert(name.to_string(), kind);
    }
}

/// Install-once guard.
pub struct Plugin {
    state: OnceCell<Arc<SidebarModals>>,
}

impl Plugin {
    pub const fn new() -> Self {
        Self {
            state: OnceCell::new(),
        }
    }

    /// Install into `host`. Only the first call has any effect; later calls
    /// return the context created by the first one and ignore `options`.
    pub fn install(
        &self,
        host: &mut dyn HostFramework,
        options: PluginOptions,
    ) -> Arc<SidebarModals> {
        let modals = self.state.get_or_init(|| Self::setup(host, &options));
        Arc::clone(modals)
    }

    /// Like [`Plugin::install`] but reports re-installation and bad options.
    pub fn try_install(
        &self,
        host: &mut dyn HostFramework,
        options: PluginOptions,
    ) -> Result<Arc<SidebarModals>> {
        if self.is_installed() {
            return Err(PluginError::AlreadyInstalled);
        }
        options.validate()?;
        let mut created = false;
        let modals = self.state.get_or_init(|| {
            created = true;
            Self::setup(host, &options)
        });
        if !created {
            return Err(PluginError::AlreadyInstalled);
        }
        Ok(Arc::clone(modals))
    }

    pub fn get(&self) -> Option<Arc<SidebarModals>> {
        self.state.get().cloned()
    }

    pub fn is_installed(&self) -> bool {
        self.state.get().is_some()
    }

    fn setup(host: &mut dyn HostFramework, options: &PluginOptions) -> Arc<SidebarModals> {
        let modals = SidebarModals::new(options.resolved_component_name());
        host.register_component(modals.component_name(), ComponentKind::NamedModal);
        host.register_component(CONTAINER_COMPONENT_NAME, ComponentKind::ModalsContainer);
        tracing::info!(component = modals.component_name(), "sidebar modals installed");
        Arc::new(modals)
    }
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new()
    }
}

/// What `show` should open.
pub enum ModalTarget {
    /// A mounted named modal
    Named(String),
    /// A component to mount into the root's container
    Component(Box<dyn Renderable>),
}

impl ModalTarget {
    pub fn component(component: impl Renderable + 'static) -> Self {
        Self::Component(Box::new(component))
    }
}

impl From<&str> for ModalTarget {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for ModalTarget {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Box<dyn Renderable>> for ModalTarget {
    fn from(component: Box<dyn Renderable>) -> Self {
        Self::Component(component)
    }
}

/// Shared plugin context: the toggle channel, the captured root and the
/// registered component name.
pub struct SidebarModals {
    channel: EventChannel<ToggleEvent>,
    root: OnceCell<Arc<AppRoot>>,
    component_name: String,
}

impl SidebarModals {
    fn new(component_name: String) -> Self {
        Self {
            channel: EventChannel::new(),
            root: OnceCell::new(),
            component_name,
        }
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    pub fn channel(&self) -> &EventChannel<ToggleEvent> {
        &self.channel
    }

    /// Register the application root explicitly.
    ///
    /// Returns false if a root was already captured; the first one stays.
    pub fn attach_root(&self, root: &Arc<AppRoot>) -> bool {
        self.root.set(Arc::clone(root)).is_ok()
    }

    /// Hook run by every component mounted through the plugin: captures
    /// `root` if no root has been seen yet.
    pub fn before_mount(&self, root: &Arc<AppRoot>) {
        if self.attach_root(root) {
            tracing::debug!(root = ?root.id(), "captured application root");
        }
    }

    pub fn root(&self) -> Option<Arc<AppRoot>> {
        self.root.get().cloned()
    }

    /// Mount the dynamic modals container under `root`. A root has at most
    /// one container; mounting again returns the existing one.
    pub fn mount_container(&self, root: &Arc<AppRoot>) -> DynamicContainer {
        self.before_mount(root);
        root.ensure_container()
    }

    /// Open a modal.
    ///
    /// With a name, emits a toggle forcing that modal open with
    /// `params_or_props` as its params. With a component, mounts it into the
    /// captured root's container using `params_or_props` as props, `params`
    /// as options and `events` as handlers, and returns the new entry's id.
    pub fn show(
        &self,
        target: impl Into<ModalTarget>,
        params_or_props: Option<Value>,
        params: Option<Value>,
        events: ModalEvents,
    ) -> Option<EntryId> {
        match target.into() {
            ModalTarget::Named(name) => {
                self.emit(ToggleEvent::show(name, params_or_props));
                None
            }
            ModalTarget::Component(component) => {
                let Some(root) = self.root.get() else {
                    tracing::debug!("no application root captured, dynamic modal dropped");
                    return None;
                };
                let Some(container) = root.container() else {
                    tracing::debug!(
                        root = ?root.id(),
                        "no modals container mounted, dynamic modal dropped"
                    );
                    return None;
                };
                Some(container.add(component, params_or_props, params, events))
            }
        }
    }

    /// Shorthand for showing a dynamic component with props only.
    pub fn show_component(
        &self,
        component: impl Renderable + 'static,
        props: Option<Value>,
    ) -> Option<EntryId> {
        self.show(ModalTarget::component(component), props, None, ModalEvents::new())
    }

    pub fn hide(&self, name: &str, params: Option<Value>) {
        self.emit(ToggleEvent::hide(name, params));
    }

    pub fn toggle(&self, name: &str, params: Option<Value>) {
        self.emit(ToggleEvent::flip(name, params));
    }

    fn emit(&self, event: ToggleEvent) {
        if self.channel.emit(TOGGLE_EVENT, &event) == 0 {
            tracing::debug!(name = %event.name, "no modal listening, toggle dropped");
        }
    }
}

impl std::fmt::Debug for SidebarModals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SidebarModals")
            .field("component_name", &self.component_name)
            .field("root", &self.root.get().map(|r| r.id()))
            .finish()
    }
}
