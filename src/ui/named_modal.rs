//! Named sidebar modal - declared once and driven by toggle events.

use std::sync::Arc;

use eframe::egui;
use parking_lot::Mutex;
use serde_json::Value;

use crate::event_channel::Subscription;
use crate::plugin::SidebarModals;
use crate::protocol::{ToggleEvent, TOGGLE_EVENT};
use crate::root::AppRoot;
use crate::validation::validate_modal_name;

#[derive(Debug, Default)]
struct ModalState {
    visible: bool,
    /// Params of the toggle that last opened the modal
    params: Option<Value>,
}

impl ModalState {
    fn apply(&mut self, event: &ToggleEvent) {
        let visible = event.resolve(self.visible);
        if visible && !self.visible {
            self.params = event.params.clone();
        }
        self.visible = visible;
    }
}

/// A modal bound to a fixed name, hidden until a matching toggle arrives.
///
/// Dropping the modal unsubscribes it from the channel.
pub struct NamedModal {
    name: String,
    root: Arc<AppRoot>,
    state: Arc<Mutex<ModalState>>,
    _subscription: Subscription,
}

impl NamedModal {
    /// Mount a modal named `name` under `root`.
    pub fn mount(modals: &SidebarModals, root: &Arc<AppRoot>, name: impl Into<String>) -> Self {
        let name = name.into();
        if let Err(reason) = validate_modal_name(&name) {
            tracing::warn!(name, %reason, "mounting modal with a questionable name");
        }
        modals.before_mount(root);

        let state = Arc::new(Mutex::new(ModalState::default()));
        let subscription = {
            let state = Arc::clone(&state);
            let name = name.clone();
            modals
                .channel()
                .subscribe(TOGGLE_EVENT, move |event: &ToggleEvent| {
                    if event.name == name {
                        state.lock().apply(event);
                    }
                })
        };

        Self {
            name,
            root: Arc::clone(root),
            state,
            _subscription: subscription,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    /// Params passed by the toggle that last opened this modal.
    pub fn params(&self) -> Option<Value> {
        self.state.lock().params.clone()
    }

    /// Local close (close button, Escape, backdrop). Not sent on the channel.
    pub fn close(&self) {
        self.state.lock().visible = false;
    }

    /// Draw the modal as a right-hand sidebar window if it is visible.
    ///
    /// Escape closes the modal only while no dynamic modal is open under the
    /// same root, and is consumed so one press closes one modal. Returns
    /// whether the modal is still visible afterwards.
    pub fn render(
        &self,
        ctx: &egui::Context,
        add_contents: impl FnOnce(&mut egui::Ui, Option<&Value>),
    ) -> bool {
        // Copy out so contents may toggle this modal without deadlocking
        let params = {
            let state = self.state.lock();
            if !state.visible {
                return false;
            }
            state.params.clone()
        };

        let mut still_open = true;
        egui::Window::new(&self.name)
            .id(egui::Id::new(("sidebar_modal", &self.name)))
            .open(&mut still_open)
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| add_contents(ui, params.as_ref()));

        if still_open && self.escape_is_ours() {
            let escaped =
                ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape));
            still_open = !escaped;
        }
        if !still_open {
            self.close();
        }

        self.is_visible()
    }

    /// Dynamic modals sit above named ones and get Escape first.
    fn escape_is_ours(&self) -> bool {
        self.root.container().map_or(true, |c| c.is_empty())
    }
}

impl std::fmt::Debug for NamedModal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedModal")
            .field("name", &self.name)
            .field("visible", &self.is_visible())
            .finish()
    }
}
