//! Widget configuration.
//!
//! Mirrors the options object accepted by the JavaScript binding. Every field
//! is optional; missing fields fall back to the defaults in [`crate::consts`].
//! Selectors may be given nested (`{"selector": {"preview": ..}}`) or flat
//! (`{"previewSurfaceSelector": ..}`); the flat spelling wins when both appear.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::{
    DEFAULT_PREVIEW_SELECTOR, DEFAULT_SOURCE_ATTRIBUTE, DEFAULT_WINDOW_SELECTOR, ERROR_HIDE_DELAY_MS,
    ERROR_NOTIFICATION, LOADING_NOTIFICATION,
};
use crate::error::ZoomError;

/// Flat option names and the nested `selector` field each one maps to.
const FLAT_SELECTORS: [(&str, &str); 2] = [("previewSurfaceSelector", "preview"), ("zoomWindowSelector", "window")];

/// Selectors of the two output surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Preview-box surface overlaid on the preview image.
    pub preview: String,
    /// Zoom-window surface showing the magnified image.
    pub window: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self { preview: DEFAULT_PREVIEW_SELECTOR.to_owned(), window: DEFAULT_WINDOW_SELECTOR.to_owned() }
    }
}

/// Texts shown in the zoom window instead of the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notifications {
    pub loading: String,
    pub error: String,
}

impl Default for Notifications {
    fn default() -> Self {
        Self { loading: LOADING_NOTIFICATION.to_owned(), error: ERROR_NOTIFICATION.to_owned() }
    }
}

/// Options for one bound widget. Immutable once the session is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomConfig {
    pub selector: Selectors,
    pub notifications: Notifications,
    /// How long the error notification stays visible.
    pub error_hide_delay_ms: u32,
    /// Target attribute read when no explicit source reference is given.
    pub source_attribute: String,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            selector: Selectors::default(),
            notifications: Notifications::default(),
            error_hide_delay_ms: ERROR_HIDE_DELAY_MS,
            source_attribute: DEFAULT_SOURCE_ATTRIBUTE.to_owned(),
        }
    }
}

impl ZoomConfig {
    /// Parse a JSON options object. `null` and blank input yield the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ZoomError::InvalidConfig`] when the JSON is malformed or a
    /// field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, ZoomError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut value: Value = serde_json::from_str(json)?;
        match &mut value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => lift_flat_selectors(map),
            _ => {}
        }
        Ok(serde_json::from_value(value)?)
    }
}

fn lift_flat_selectors(map: &mut Map<String, Value>) {
    for (flat, nested) in FLAT_SELECTORS {
        let Some(selector) = map.remove(flat) else {
            continue;
        };
        let entry = map
            .entry("selector")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(selectors) = entry {
            selectors.insert(nested.to_owned(), selector);
        }
    }
}
