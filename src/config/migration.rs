//! Upgrades config files written by older e-zshot clients.
//!
//! The Go configuration helper stored the output format under `image_type`,
//! the launcher script used `screenshot_tool`, and the text plugin was toggled
//! with a boolean. These are rewritten in place before deserialization.

use serde_json::{Map, Value};

use super::TEXT_PROCESSING_CAPABILITY;

/// A single legacy key that was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationAction {
    /// `image_type` moved to `file_type`.
    RenamedImageType,
    /// `screenshot_tool` moved to `capture_tool`.
    RenamedScreenshotTool,
    /// `text_plugin_enabled` folded into the `plugins` list.
    FoldedTextPlugin { enabled: bool },
}

/// Rewrites legacy keys in a raw config object.
///
/// Returns the actions taken; an empty list means the document was already
/// current. Non-object documents are left untouched.
pub fn migrate_legacy_keys(raw: &mut Value) -> Vec<MigrationAction> {
    let Some(object) = raw.as_object_mut() else {
        return Vec::new();
    };

    let mut actions = Vec::new();

    if let Some(image_type) = object.remove("image_type") {
        if !object.contains_key("file_type") {
            object.insert("file_type".into(), image_type);
        }
        actions.push(MigrationAction::RenamedImageType);
    }

    if let Some(tool) = object.remove("screenshot_tool") {
        if !object.contains_key("capture_tool") {
            object.insert("capture_tool".into(), tool);
        }
        actions.push(MigrationAction::RenamedScreenshotTool);
    }

    if let Some(flag) = object.remove("text_plugin_enabled") {
        let enabled = flag.as_bool().unwrap_or(false);
        if enabled {
            push_plugin(object, TEXT_PROCESSING_CAPABILITY);
        }
        actions.push(MigrationAction::FoldedTextPlugin { enabled });
    }

    actions
}

fn push_plugin(object: &mut Map<String, Value>, name: &str) {
    let entry = object
        .entry("plugins")
        .or_insert_with(|| Value::Array(Vec::new()));

    if !entry.is_array() {
        log::warn!("Replacing non-list 'plugins' value while migrating config");
        *entry = Value::Array(Vec::new());
    }

    if let Value::Array(list) = entry {
        if !list.iter().any(|v| v.as_str() == Some(name)) {
            list.push(Value::String(name.to_string()));
        }
    }
}
