//! Name validation for registered components and named modals.

use once_cell::sync::Lazy;
use regex::Regex;

/// PascalCase (`SidebarModal`) or kebab-case with at least one dash
/// (`sidebar-modal`), the two forms host templates can refer to.
static COMPONENT_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Z][A-Za-z0-9]*|[a-z][a-z0-9]*(?:-[a-z0-9]+)+)$")
        .expect("component name pattern is valid")
});

/// Validates a name used to register a component with the host.
pub fn validate_component_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Component name cannot be empty".to_string());
    }

    if name.len() > 64 {
        return Err("Component name too long (max 64 characters)".to_string());
    }

    if !COMPONENT_NAME_RE.is_match(name) {
        return Err("Component name must be PascalCase or kebab-case".to_string());
    }

    Ok(())
}

/// Validates the logical name a named modal is bound to.
pub fn validate_modal_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Modal name cannot be empty".to_string());
    }

    if name.contains(|c: char| c.is_control()) {
        return Err("Modal name contains control characters".to_string());
    }

    Ok(())
}
