//! egui components registered by the plugin.
//!
//! - `named_modal`: sidebar modal bound to a name, driven by toggle events
//! - `container`: per-root list of dynamically mounted modals

pub mod container;
pub mod named_modal;

pub use container::{
    DynamicContainer, DynamicModalEntry, EntryId, EntrySummary, EventHandler, ModalEvents,
    ModalOptions, ModalScope, Renderable, CLOSED_EVENT, OPENED_EVENT,
};
pub use named_modal::NamedModal;
