//! Sample components mounted as dynamic modals.

use eframe::egui;
use serde_json::{json, Value};

use crate::ui::{ModalScope, Renderable};

pub const CONFIRM_EVENT: &str = "confirm";
pub const CANCEL_EVENT: &str = "cancel";

/// Yes/no prompt. Emits `confirm` or `cancel` and closes itself.
pub struct ConfirmDialog {
    question: String,
}

impl ConfirmDialog {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

impl Renderable for ConfirmDialog {
    fn title(&self) -> String {
        "Confirm".to_string()
    }

    fn ui(&mut self, ui: &mut egui::Ui, props: &Value, scope: &mut ModalScope) {
        ui.label(&self.question);
        if let Some(detail) = props.get("detail").and_then(Value::as_str) {
            ui.weak(detail);
        }
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui.button("Yes").clicked() {
                scope.emit(CONFIRM_EVENT, props.clone());
                scope.close();
            }
            if ui.button("No").clicked() {
                scope.emit(CANCEL_EVENT, Value::Null);
                scope.close();
            }
        });
    }
}

/// Read-only note whose text comes from the `text` prop.
#[derive(Default)]
pub struct NoteViewer {
    views: u64,
}

impl NoteViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text shown for the given props.
    pub fn text(props: &Value) -> &str {
        props.get("text").and_then(Value::as_str).unwrap_or("(empty note)")
    }
}

impl Renderable for NoteViewer {
    fn title(&self) -> String {
        "Note".to_string()
    }

    fn ui(&mut self, ui: &mut egui::Ui, props: &Value, scope: &mut ModalScope) {
        self.views += 1;
        ui.label(Self::text(props));
        ui.add_space(8.0);
        if ui.button("Done").clicked() {
            scope.emit("read", json!({ "frames": self.views }));
            scope.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_text_from_props() {
        assert_eq!(NoteViewer::text(&json!({ "text": "hi" })), "hi");
        assert_eq!(NoteViewer::text(&json!({})), "(empty note)");
        assert_eq!(NoteViewer::text(&json!({ "text": 3 })), "(empty note)");
    }

    #[test]
    fn test_titles() {
        assert_eq!(ConfirmDialog::new("Sure?").title(), "Confirm");
        assert_eq!(NoteViewer::new().title(), "Note");
    }
}
