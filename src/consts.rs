//! Shared defaults for the magnifier crate.

// ── Output surfaces ─────────────────────────────────────────────

/// Default selector of the preview-box surface overlaid on the preview image.
pub const DEFAULT_PREVIEW_SELECTOR: &str = "#preview-zoom";

/// Default selector of the zoom-window surface.
pub const DEFAULT_WINDOW_SELECTOR: &str = "#window-zoom";

/// Attribute on the bound target holding the high-resolution image URL.
pub const DEFAULT_SOURCE_ATTRIBUTE: &str = "data-image";

// ── Notifications ───────────────────────────────────────────────

/// Shown in the zoom window while the high-resolution image loads.
pub const LOADING_NOTIFICATION: &str = "Loading high resolution image...";

/// Shown in the zoom window when the high-resolution image fails to load.
pub const ERROR_NOTIFICATION: &str = "There has been a problem with loading the image!";

/// Delay before the error notification is hidden, in milliseconds.
pub const ERROR_HIDE_DELAY_MS: u32 = 2000;

// ── Cursor ──────────────────────────────────────────────────────

/// CSS cursor value for [`crate::presenter::CursorMode::Default`].
pub const CURSOR_DEFAULT: &str = "auto";

/// CSS cursor value for [`crate::presenter::CursorMode::Busy`].
pub const CURSOR_BUSY: &str = "progress";
