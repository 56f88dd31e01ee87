//! Dynamic modals container.
//!
//! Holds modals created at call time from a [`Renderable`] instead of being
//! declared up front. Entries are owned solely by the container and are
//! removed by identity when they close.
//!
//! # Rendering
//!
//! Components never touch the container directly. They act through a
//! [`ModalScope`], which collects close requests and emitted events; the
//! container applies them once the frame is drawn. The entry list is not
//! locked while components draw or while event handlers run, so both may call
//! back into the facade. Entries being drawn still count as open: `len`,
//! `contains` and `entries` see them until the frame removes them.
//!
//! Dynamic modals sit above named ones, so a frame that draws any entry
//! consumes the Escape key press.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use eframe::egui;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event fired right after an entry is added.
pub const OPENED_EVENT: &str = "opened";
/// Event fired after an entry has been removed.
pub const CLOSED_EVENT: &str = "closed";

static ENTRY_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of a dynamic modal entry. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    fn next() -> Self {
        Self(ENTRY_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A component that can be mounted into the container.
pub trait Renderable: Send {
    /// Window title, unless the options override it.
    fn title(&self) -> String;

    /// Draw the modal body.
    fn ui(&mut self, ui: &mut egui::Ui, props: &Value, scope: &mut ModalScope);
}

/// What a component may do to its own entry while drawing.
#[derive(Debug, Default)]
pub struct ModalScope {
    close_requested: bool,
    emitted: Vec<(String, Value)>,
}

impl ModalScope {
    /// Close this modal once the frame is done.
    pub fn close(&mut self) {
        self.close_requested = true;
    }

    /// Raise an event for the handlers passed at `show` time.
    pub fn emit(&mut self, event: impl Into<String>, payload: Value) {
        self.emitted.push((event.into(), payload));
    }

    pub fn is_closing(&self) -> bool {
        self.close_requested
    }
}

pub type EventHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Event handlers attached to a dynamic modal, keyed by event name.
#[derive(Clone, Default)]
pub struct ModalEvents {
    handlers: HashMap<String, EventHandler>,
}

impl ModalEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.handlers.insert(event.into(), Arc::new(handler));
        self
    }

    /// Invoke the handler for `event`. Returns false if none is attached.
    pub fn fire(&self, event: &str, payload: &Value) -> bool {
        match self.handlers.get(event) {
            Some(handler) => {
                handler(payload);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for ModalEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("ModalEvents").field("handlers", &names).finish()
    }
}

/// Presentation options for a dynamic modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalOptions {
    pub title: Option<String>,
    pub width: Option<f32>,
    /// Backdrop click and Escape close the modal
    pub click_to_close: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            title: None,
            width: None,
            click_to_close: true,
        }
    }
}

impl ModalOptions {
    /// Read options from the `params` value given to `show`.
    ///
    /// Unknown keys are ignored; a value that is not an options object yields
    /// the defaults.
    pub fn from_params(params: Option<&Value>) -> Self {
        let Some(params) = params else {
            return Self::default();
        };
        match serde_json::from_value(params.clone()) {
            Ok(options) => options,
            Err(e) => {
                tracing::debug!(error = %e, "unusable modal options, using defaults");
                Self::default()
            }
        }
    }
}

/// One live dynamic modal.
pub struct DynamicModalEntry {
    id: EntryId,
    component: Box<dyn Renderable>,
    props: Value,
    options: ModalOptions,
    events: ModalEvents,
}

impl DynamicModalEntry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn title(&self) -> String {
        self.options
            .title
            .clone()
            .unwrap_or_else(|| self.component.title())
    }

    pub fn props(&self) -> &Value {
        &self.props
    }

    pub fn options(&self) -> &ModalOptions {
        &self.options
    }

    fn render(&mut self, ctx: &egui::Context) -> ModalScope {
        let mut scope = ModalScope::default();
        let title = self.title();
        let click_to_close = self.options.click_to_close;
        let width = self.options.width;

        let response = egui::Modal::new(egui::Id::new(("sidebar_modal_dynamic", self.id.0))).show(
            ctx,
            |ui| {
                if let Some(width) = width {
                    ui.set_width(width);
                }
                ui.horizontal(|ui| {
                    ui.heading(&title);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            scope.close();
                        }
                    });
                });
                ui.separator();
                self.component.ui(ui, &self.props, &mut scope);
            },
        );

        if click_to_close && response.should_close() {
            scope.close();
        }
        scope
    }
}

/// Summary of an entry, for hosts that list open modals.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySummary {
    pub id: EntryId,
    pub title: String,
}

#[derive(Default)]
struct ContainerState {
    entries: Vec<DynamicModalEntry>,
    /// Entries taken out for drawing, in list order
    in_flight: Vec<EntrySummary>,
    /// Removals requested for in-flight entries
    deferred_removals: Vec<EntryId>,
}

impl ContainerState {
    /// In-flight entries not already marked for removal.
    fn drawing(&self) -> impl Iterator<Item = &EntrySummary> {
        self.in_flight
            .iter()
            .filter(move |e| !self.deferred_removals.contains(&e.id))
    }

    fn is_drawing(&self, id: EntryId) -> bool {
        self.drawing().any(|e| e.id == id)
    }
}

/// Cloneable handle to a root's dynamic modal list.
#[derive(Clone, Default)]
pub struct DynamicContainer {
    state: Arc<Mutex<ContainerState>>,
}

impl DynamicContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if both handles refer to the same container.
    pub fn same_as(&self, other: &DynamicContainer) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Append a new entry, initially visible.
    ///
    /// `props` are handed to the component on every draw; `params` are read
    /// as [`ModalOptions`].
    pub fn add(
        &self,
        component: Box<dyn Renderable>,
        props: Option<Value>,
        params: Option<Value>,
        events: ModalEvents,
    ) -> EntryId {
        let id = EntryId::next();
        let entry = DynamicModalEntry {
            id,
            component,
            props: props.unwrap_or_else(|| Value::Object(Default::default())),
            options: ModalOptions::from_params(params.as_ref()),
            events: events.clone(),
        };
        self.state.lock().entries.push(entry);
        tracing::debug!(?id, "dynamic modal added");

        events.fire(OPENED_EVENT, &Value::Null);
        id
    }

    /// Remove an entry by identity, firing its `closed` handler.
    ///
    /// Returns false if no such entry is open.
    pub fn remove(&self, id: EntryId) -> bool {
        let removed = {
            let mut state = self.state.lock();
            if let Some(index) = state.entries.iter().position(|e| e.id == id) {
                Some(state.entries.remove(index))
            } else {
                if state.is_drawing(id) {
                    state.deferred_removals.push(id);
                    return true;
                }
                None
            }
        };

        match removed {
            Some(entry) => {
                tracing::debug!(?id, "dynamic modal removed");
                entry.events.fire(CLOSED_EVENT, &Value::Null);
                true
            }
            None => false,
        }
    }

    /// Draw every entry in list order, then drop the ones that closed.
    pub fn render(&self, ctx: &egui::Context) {
        let mut drawing = {
            let mut state = self.state.lock();
            let drawing = std::mem::take(&mut state.entries);
            state.in_flight = drawing
                .iter()
                .map(|e| EntrySummary {
                    id: e.id,
                    title: e.title(),
                })
                .collect();
            drawing
        };

        let mut fired: Vec<(ModalEvents, String, Value)> = Vec::new();
        let mut closing: Vec<EntryId> = Vec::new();
        for entry in drawing.iter_mut() {
            let scope = entry.render(ctx);
            for (event, payload) in scope.emitted {
                fired.push((entry.events.clone(), event, payload));
            }
            if scope.close_requested {
                closing.push(entry.id);
            }
        }
        if !drawing.is_empty() {
            ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape));
        }

        let closed = {
            let mut state = self.state.lock();
            closing.append(&mut state.deferred_removals);
            state.in_flight.clear();

            let (closed, kept): (Vec<_>, Vec<_>) =
                drawing.into_iter().partition(|e| closing.contains(&e.id));
            // Entries added while drawing go after the ones already shown
            let added = std::mem::replace(&mut state.entries, kept);
            state.entries.extend(added);
            closed
        };

        for (events, event, payload) in fired {
            events.fire(&event, &payload);
        }
        for entry in closed {
            tracing::debug!(id = ?entry.id, "dynamic modal closed");
            entry.events.fire(CLOSED_EVENT, &Value::Null);
        }
    }

    /// Open entries in list order, including the ones being drawn.
    pub fn entries(&self) -> Vec<EntrySummary> {
        let state = self.state.lock();
        let added = state.entries.iter().map(|e| EntrySummary {
            id: e.id,
            title: e.title(),
        });
        state.drawing().cloned().chain(added).collect()
    }

    pub fn contains(&self, id: EntryId) -> bool {
        let state = self.state.lock();
        state.entries.iter().any(|e| e.id == id) || state.is_drawing(id)
    }

    pub fn len(&self) -> usize {
        let state = self.state.lock();
        state.entries.len() + state.drawing().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for DynamicContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicContainer")
            .field("entries", &self.entries())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    /// Component that closes itself on the next draw when asked to.
    pub(crate) struct Probe {
        pub title: &'static str,
        pub close_on_draw: bool,
        pub emit_on_draw: Option<&'static str>,
    }

    impl Probe {
        pub(crate) fn boxed(title: &'static str) -> Box<dyn Renderable> {
            Box::new(Self {
                title,
                close_on_draw: false,
                emit_on_draw: None,
            })
        }
    }

    impl Renderable for Probe {
        fn title(&self) -> String {
            self.title.to_string()
        }

        fn ui(&mut self, ui: &mut egui::Ui, props: &Value, scope: &mut ModalScope) {
            ui.label(props.to_string());
            if let Some(event) = self.emit_on_draw {
                scope.emit(event, props.clone());
            }
            if self.close_on_draw {
                scope.close();
            }
        }
    }

    fn run_frame(container: &DynamicContainer) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| container.render(ctx));
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&Value) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (count, move |_: &Value| {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_add_appends_in_order() {
        let container = DynamicContainer::new();
        let a = container.add(Probe::boxed("a"), None, None, ModalEvents::new());
        let b = container.add(Probe::boxed("b"), None, None, ModalEvents::new());

        let titles: Vec<String> = container.entries().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_by_identity() {
        let container = DynamicContainer::new();
        let a = container.add(Probe::boxed("a"), None, None, ModalEvents::new());
        let b = container.add(Probe::boxed("b"), None, None, ModalEvents::new());
        let c = container.add(Probe::boxed("c"), None, None, ModalEvents::new());

        assert!(container.remove(b));
        assert!(!container.remove(b));
        assert!(container.contains(a));
        assert!(container.contains(c));
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn test_opened_and_closed_handlers() {
        let (opened, on_opened) = counter();
        let (closed, on_closed) = counter();
        let container = DynamicContainer::new();
        let id = container.add(
            Probe::boxed("a"),
            None,
            None,
            ModalEvents::new()
                .on(OPENED_EVENT, on_opened)
                .on(CLOSED_EVENT, on_closed),
        );
        assert_eq!(opened.load(Ordering::SeqCst), 1);
        assert_eq!(closed.load(Ordering::SeqCst), 0);

        container.remove(id);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_props_and_options() {
        let container = DynamicContainer::new();
        container.add(
            Probe::boxed("a"),
            Some(json!({ "foo": 1 })),
            Some(json!({ "title": "Custom", "width": 320.0, "clickToClose": false })),
            ModalEvents::new(),
        );
        let state = container.state.lock();
        let entry = &state.entries[0];
        assert_eq!(entry.props(), &json!({ "foo": 1 }));
        assert_eq!(entry.title(), "Custom");
        assert_eq!(entry.options().width, Some(320.0));
        assert!(!entry.options().click_to_close);
    }

    #[test]
    fn test_options_fall_back_to_defaults() {
        assert_eq!(ModalOptions::from_params(None), ModalOptions::default());
        assert_eq!(
            ModalOptions::from_params(Some(&json!("not an object"))),
            ModalOptions::default()
        );
    }

    #[test]
    fn test_render_keeps_open_entries() {
        let container = DynamicContainer::new();
        container.add(Probe::boxed("a"), None, None, ModalEvents::new());
        run_frame(&container);
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_self_close_removes_only_that_entry() {
        let (closed, on_closed) = counter();
        let container = DynamicContainer::new();
        let keep = container.add(Probe::boxed("keep"), None, None, ModalEvents::new());
        let gone = container.add(
            Box::new(Probe {
                title: "gone",
                close_on_draw: true,
                emit_on_draw: None,
            }),
            None,
            None,
            ModalEvents::new().on(CLOSED_EVENT, on_closed),
        );

        run_frame(&container);
        assert!(container.contains(keep));
        assert!(!container.contains(gone));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_emitted_events_reach_handlers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let container = DynamicContainer::new();
        let sink = Arc::clone(&seen);
        container.add(
            Box::new(Probe {
                title: "a",
                close_on_draw: false,
                emit_on_draw: Some("submit"),
            }),
            Some(json!({ "answer": 42 })),
            None,
            ModalEvents::new().on("submit", move |payload| sink.lock().push(payload.clone())),
        );

        run_frame(&container);
        assert_eq!(*seen.lock(), vec![json!({ "answer": 42 })]);
    }

    #[test]
    fn test_handler_may_add_during_render() {
        let container = DynamicContainer::new();
        let reentrant = container.clone();
        container.add(
            Box::new(Probe {
                title: "first",
                close_on_draw: true,
                emit_on_draw: None,
            }),
            None,
            None,
            ModalEvents::new().on(CLOSED_EVENT, move |_| {
                reentrant.add(Probe::boxed("second"), None, None, ModalEvents::new());
            }),
        );

        run_frame(&container);
        let titles: Vec<String> = container.entries().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["second"]);
    }

    #[test]
    fn test_remove_requested_while_drawing_is_deferred() {
        struct Closer {
            target: Arc<Mutex<Option<EntryId>>>,
            container: DynamicContainer,
        }
        impl Renderable for Closer {
            fn title(&self) -> String {
                "closer".to_string()
            }
            fn ui(&mut self, _ui: &mut egui::Ui, _props: &Value, _scope: &mut ModalScope) {
                if let Some(id) = self.target.lock().take() {
                    assert!(self.container.remove(id));
                }
            }
        }

        let container = DynamicContainer::new();
        let target = Arc::new(Mutex::new(None));
        let closer = container.add(
            Box::new(Closer {
                target: Arc::clone(&target),
                container: container.clone(),
            }),
            None,
            None,
            ModalEvents::new(),
        );
        let victim = container.add(Probe::boxed("victim"), None, None, ModalEvents::new());
        *target.lock() = Some(victim);

        run_frame(&container);
        assert!(container.contains(closer));
        assert!(!container.contains(victim));
    }

    #[test]
    fn test_entries_being_drawn_still_count() {
        struct Counter {
            container: DynamicContainer,
            seen: Arc<Mutex<Option<(usize, bool, Vec<String>)>>>,
        }
        impl Renderable for Counter {
            fn title(&self) -> String {
                "counter".to_string()
            }
            fn ui(&mut self, _ui: &mut egui::Ui, _props: &Value, _scope: &mut ModalScope) {
                let ids = self.container.entries();
                let contains_self = ids.first().is_some_and(|e| self.container.contains(e.id));
                let titles = ids.into_iter().map(|e| e.title).collect();
                *self.seen.lock() = Some((self.container.len(), contains_self, titles));
            }
        }

        let container = DynamicContainer::new();
        let seen = Arc::new(Mutex::new(None));
        container.add(
            Box::new(Counter {
                container: container.clone(),
                seen: Arc::clone(&seen),
            }),
            None,
            None,
            ModalEvents::new(),
        );
        container.add(Probe::boxed("other"), None, None, ModalEvents::new());

        run_frame(&container);
        let (len, contains_self, titles) = seen.lock().take().expect("component drawn");
        assert_eq!(len, 2);
        assert!(contains_self);
        assert_eq!(titles, vec!["counter", "other"]);
        assert!(!container.is_empty());
    }

    #[test]
    fn test_deferred_removal_is_not_counted() {
        struct Remover {
            container: DynamicContainer,
            target: Arc<Mutex<Option<EntryId>>>,
            len_after: Arc<Mutex<Option<usize>>>,
        }
        impl Renderable for Remover {
            fn title(&self) -> String {
                "remover".to_string()
            }
            fn ui(&mut self, _ui: &mut egui::Ui, _props: &Value, _scope: &mut ModalScope) {
                if let Some(id) = self.target.lock().take() {
                    self.container.remove(id);
                    assert!(!self.container.contains(id));
                    *self.len_after.lock() = Some(self.container.len());
                }
            }
        }

        let container = DynamicContainer::new();
        let target = Arc::new(Mutex::new(None));
        let len_after = Arc::new(Mutex::new(None));
        container.add(
            Box::new(Remover {
                container: container.clone(),
                target: Arc::clone(&target),
                len_after: Arc::clone(&len_after),
            }),
            None,
            None,
            ModalEvents::new(),
        );
        let victim = container.add(Probe::boxed("victim"), None, None, ModalEvents::new());
        *target.lock() = Some(victim);

        run_frame(&container);
        assert_eq!(*len_after.lock(), Some(1));
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_render_consumes_escape_when_drawing() {
        let container = DynamicContainer::new();
        container.add(
            Probe::boxed("a"),
            None,
            Some(json!({ "clickToClose": false })),
            ModalEvents::new(),
        );

        let ctx = egui::Context::default();
        let mut escape_left = true;
        let _ = ctx.run(escape_input(), |ctx| {
            container.render(ctx);
            escape_left = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        });
        assert!(!escape_left);
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_empty_render_leaves_escape() {
        let container = DynamicContainer::new();
        let ctx = egui::Context::default();
        let mut escape_left = false;
        let _ = ctx.run(escape_input(), |ctx| {
            container.render(ctx);
            escape_left = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        });
        assert!(escape_left);
    }

    /// One frame of input with a single Escape press.
    pub(crate) fn escape_input() -> egui::RawInput {
        egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::Escape,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        }
    }
}
