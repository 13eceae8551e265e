//! Suppression of DocuSign bookkeeping tabs.
//!
//! Templates embed invisible tabs with degenerate geometry or internal
//! labels. Unless the caller asks for them, they are dropped before any
//! field is built.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::Tab;

fn envelope_label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+_\d+$").expect("valid regex"))
}

/// Whether a tab looks like a system tab.
///
/// Degenerate geometry (at most 1x1 placed exactly at the origin) or a
/// system-like label both qualify. Missing numbers count as zero.
pub fn is_system_tab(tab: &Tab) -> bool {
    has_degenerate_geometry(tab)
        || tab
            .label()
            .or_else(|| tab.group_name())
            .is_some_and(is_system_label)
}

fn has_degenerate_geometry(tab: &Tab) -> bool {
    // Radio groups are placed by their buttons, not the group record.
    if !tab.radios.is_empty() {
        return false;
    }
    let (Some(x), Some(y)) = (tab.x_position().or_zero(), tab.y_position().or_zero()) else {
        return false;
    };
    let width = tab.width().or_zero().unwrap_or(0.0);
    let height = tab.height().or_zero().unwrap_or(0.0);
    width <= 1.0 && height <= 1.0 && x == 0.0 && y == 0.0
}

/// Labels such as `12345_678`, or containing `system` / `hidden`.
pub fn is_system_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    envelope_label_pattern().is_match(label.trim())
        || lower.contains("system")
        || lower.contains("hidden")
}
