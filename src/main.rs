//! Sidebar modals demo - an egui host for the plugin
//!
//! Architecture:
//! - The plugin is installed once into a component registry
//! - The layout mounts named modals and the dynamic container by tag
//! - Toggle events are forwarded over a crossbeam channel into the activity log

use eframe::egui;
use sidebar_modals::app::DemoApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sidebar Modals Demo",
        options,
        Box::new(|cc| Ok(Box::new(DemoApp::new(cc)))),
    )
}
