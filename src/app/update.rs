//! Main update loop and global shortcuts

use eframe::egui;
use serde_json::json;
use std::time::Duration;

use super::components::{ConfirmDialog, NoteViewer, CANCEL_EVENT, CONFIRM_EVENT};
use super::core::DECLARED_MODALS;
use super::DemoApp;
use crate::plugin::ModalTarget;
use crate::ui::ModalEvents;

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_events();

        // Global keyboard shortcuts
        ctx.input(|i| {
            // F1: Toggle the about sidebar
            if i.key_pressed(egui::Key::F1) {
                self.modals.toggle("about", None);
            }
            // Ctrl+,: Open settings
            if i.modifiers.ctrl && i.key_pressed(egui::Key::Comma) {
                self.modals.show("settings", None, None, ModalEvents::new());
            }
        });

        ctx.request_repaint_after(Duration::from_millis(250));
        self.purge_old_status_messages(4);

        self.render_controls(ctx);
        self.render_activity(ctx);
        self.render_modals(ctx);
        render_status_toasts(ctx, &self.status_messages);
    }
}

impl DemoApp {
    fn render_controls(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Modal:");
                egui::ComboBox::from_id_salt("target_name")
                    .selected_text(&self.target_name)
                    .show_ui(ui, |ui| {
                        for name in DECLARED_MODALS {
                            ui.selectable_value(&mut self.target_name, name.to_string(), *name);
                        }
                    });

                if ui.button("Show").clicked() {
                    self.modals.show(
                        self.target_name.as_str(),
                        Some(json!({ "source": "toolbar" })),
                        None,
                        ModalEvents::new(),
                    );
                }
                if ui.button("Hide").clicked() {
                    self.modals.hide(&self.target_name, None);
                }
                if ui.button("Toggle").clicked() {
                    self.modals.toggle(&self.target_name, None);
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Ask for confirmation").clicked() {
                    self.open_confirm();
                }
                ui.text_edit_singleline(&mut self.note_text);
                if ui.button("Open note").clicked() {
                    let props = json!({ "text": self.note_text });
                    if self.modals.show_component(NoteViewer::new(), Some(props)).is_none() {
                        self.push_status("No modals container mounted");
                    }
                }
            });
        });
    }

    fn open_confirm(&mut self) {
        let modals = self.modals.clone();
        let events = ModalEvents::new()
            .on(CONFIRM_EVENT, move |_| {
                // Confirming opens the settings sidebar
                let params = Some(json!({ "confirmed": true }));
                modals.show("settings", params, None, ModalEvents::new());
            })
            .on(CANCEL_EVENT, |_| tracing::info!("confirmation cancelled"));

        self.modals.show(
            ModalTarget::component(ConfirmDialog::new("Open the settings sidebar?")),
            Some(json!({ "detail": "This only toggles a named modal." })),
            Some(json!({ "width": 280.0 })),
            events,
        );
    }

    fn render_activity(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Activity");
            if let Some(container) = &self.container {
                ui.label(format!("Dynamic modals open: {}", container.len()));
            }
            ui.separator();
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in &self.activity {
                        ui.monospace(line);
                    }
                });
        });
    }

    fn render_modals(&mut self, ctx: &egui::Context) {
        let component_name = self.modals.component_name().to_string();
        for modal in &self.named {
            modal.render(ctx, |ui, params| {
                ui.label(format!("{} \"{}\"", component_name, modal.name()));
                if let Some(params) = params {
                    ui.monospace(params.to_string());
                }
                if ui.button("Close").clicked() {
                    modal.close();
                }
            });
        }

        if let Some(container) = &self.container {
            container.render(ctx);
        }
    }
}

/// Render floating status toasts (top-right corner).
fn render_status_toasts(ctx: &egui::Context, status_messages: &[(String, std::time::Instant)]) {
    if status_messages.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("status_toast_area"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgba_unmultiplied(30, 30, 30, 230))
                .corner_radius(6.0)
                .inner_margin(egui::Margin::symmetric(12, 8))
                .show(ui, |ui| {
                    for (msg, _) in status_messages {
                        ui.label(egui::RichText::new(msg).color(egui::Color32::LIGHT_GREEN));
                    }
                });
        });
}
