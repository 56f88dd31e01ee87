//! Demo host application for the sidebar modals plugin
//!
//! This module organizes the demo into focused submodules:
//! - `core`: DemoApp struct and initialization
//! - `events`: Draining toggle events into the activity log
//! - `update`: Main update loop and global shortcuts
//! - `components`: Sample components mounted as dynamic modals

pub mod components;
pub mod core;
pub mod events;
pub mod update;

// Re-export DemoApp for public API
pub use core::DemoApp;
