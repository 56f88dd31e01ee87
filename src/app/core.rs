//! Core DemoApp struct definition and initialization

use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::time::Instant;

use crate::config::load_options;
use crate::event_channel::Subscription;
use crate::plugin::{ComponentRegistry, MountedComponent, Plugin, SidebarModals, PLUGIN};
use crate::protocol::{ToggleEvent, TOGGLE_EVENT};
use crate::root::AppRoot;
use crate::ui::{DynamicContainer, NamedModal};

/// Modal names declared by the demo layout.
pub const DECLARED_MODALS: &[&str] = &["settings", "about"];

pub struct DemoApp {
    pub modals: Arc<SidebarModals>,
    pub registry: ComponentRegistry,
    pub root: Arc<AppRoot>,

    // Components mounted from the layout
    pub named: Vec<NamedModal>,
    pub container: Option<DynamicContainer>,

    // Toggle events forwarded from the channel
    pub toggle_rx: Receiver<ToggleEvent>,
    pub toggle_subscription: Subscription,

    // Activity log lines and toasts with creation time (auto-expire)
    pub activity: Vec<String>,
    pub status_messages: Vec<(String, Instant)>,

    // Form inputs
    pub target_name: String,
    pub note_text: String,
}

impl DemoApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_plugin(&PLUGIN, ComponentRegistry::new())
    }

    /// Install `plugin` into `registry` and mount the demo layout by tag.
    pub fn with_plugin(plugin: &Plugin, mut registry: ComponentRegistry) -> Self {
        let modals = plugin.install(&mut registry, load_options());
        let root = AppRoot::new();
        modals.attach_root(&root);

        let (toggle_subscription, toggle_rx) = modals.channel().subscribe_channel(TOGGLE_EVENT);

        let mut named = Vec::new();
        let mut container = None;
        let tags = DECLARED_MODALS
            .iter()
            .map(|name| (modals.component_name().to_string(), *name))
            .chain(std::iter::once((
                crate::config::CONTAINER_COMPONENT_NAME.to_string(),
                "",
            )));
        for (tag, name) in tags {
            match registry.mount(&tag, &modals, &root, name) {
                Some(MountedComponent::Modal(modal)) => named.push(modal),
                Some(MountedComponent::Container(c)) => container = Some(c),
                None => tracing::warn!(tag = %tag, "layout refers to an unregistered component"),
            }
        }

        Self {
            modals,
            registry,
            root,
            named,
            container,
            toggle_rx,
            toggle_subscription,
            activity: Vec::new(),
            status_messages: Vec::new(),
            target_name: DECLARED_MODALS[0].to_string(),
            note_text: String::new(),
        }
    }

    pub fn named_modal(&self, name: &str) -> Option<&NamedModal> {
        self.named.iter().find(|m| m.name() == name)
    }

    /// Queue a toast that disappears after a few seconds.
    pub fn push_status(&mut self, message: impl Into<String>) {
        self.status_messages.push((message.into(), Instant::now()));
    }

    /// Drop toasts older than `max_age_secs`.
    pub fn purge_old_status_messages(&mut self, max_age_secs: u64) {
        self.status_messages
            .retain(|(_, created)| created.elapsed().as_secs() < max_age_secs);
    }
}
