//! Toggle event processing for the activity log

use chrono::Local;

use super::DemoApp;
use crate::protocol::ToggleEvent;

/// Keep the activity log from growing without bound.
const MAX_ACTIVITY_LINES: usize = 200;

impl DemoApp {
    pub fn process_events(&mut self) {
        while let Ok(event) = self.toggle_rx.try_recv() {
            let line = format!("[{}] {}", Local::now().format("%H:%M:%S"), describe(&event));
            self.activity.push(line);
        }

        if self.activity.len() > MAX_ACTIVITY_LINES {
            let excess = self.activity.len() - MAX_ACTIVITY_LINES;
            self.activity.drain(..excess);
        }
    }
}

fn describe(event: &ToggleEvent) -> String {
    let action = match event.visible {
        Some(true) => "show",
        Some(false) => "hide",
        None => "toggle",
    };
    match &event.params {
        Some(params) => format!("{} {} {}", action, event.name, params),
        None => format!("{} {}", action, event.name),
    }
}
