//! Presentation effects and the trait that applies them to the output surfaces.
//!
//! The session never touches the page. It returns [`Action`]s and the host
//! hands them to a [`Presenter`], which owns no logic beyond applying each
//! requested visual state.

#[cfg(test)]
#[path = "presenter_test.rs"]
mod presenter_test;

use crate::consts::{CURSOR_BUSY, CURSOR_DEFAULT};
use crate::geometry::{PreviewBox, ViewportOffset};
use crate::session::LoadTicket;

/// Cursor affordance applied to the bound target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// Regular interactive cursor.
    Default,
    /// The high-resolution image is loading.
    Busy,
}

impl CursorMode {
    /// CSS `cursor` value for this mode.
    #[must_use]
    pub fn css_value(self) -> &'static str {
        match self {
            Self::Default => CURSOR_DEFAULT,
            Self::Busy => CURSOR_BUSY,
        }
    }
}

/// Actions returned from session handlers for the host to process, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Mount the loaded image in the zoom window and show it.
    ShowZoomWindow,
    /// Position and show the preview box.
    ShowPreviewBox(PreviewBox),
    /// Shift the mounted image by the negated offset.
    PanZoomImage(ViewportOffset),
    /// Hide both output surfaces.
    HideAll,
    /// Hide both output surfaces after `delay_ms`.
    DeferredHideAll { delay_ms: u32 },
    /// Show the zoom window with a text message instead of the image.
    ShowNotification(String),
    /// Change the cursor over the bound target.
    SetCursor(CursorMode),
    /// Fetch the high-resolution image. Performed by the host, not the presenter.
    LoadRequested { reference: String, ticket: LoadTicket },
}

/// Applies presentation actions to the preview box and zoom window.
pub trait Presenter {
    fn show_zoom_window(&mut self);

    fn show_preview_box(&mut self, geometry: PreviewBox);

    fn pan_zoom_image(&mut self, offset: ViewportOffset);

    fn hide_all(&mut self);

    fn deferred_hide_all(&mut self, delay_ms: u32);

    fn show_notification(&mut self, text: &str);

    fn set_cursor(&mut self, mode: CursorMode);

    /// Apply a batch of actions in order. [`Action::LoadRequested`] is skipped.
    fn apply(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::ShowZoomWindow => self.show_zoom_window(),
                Action::ShowPreviewBox(geometry) => self.show_preview_box(*geometry),
                Action::PanZoomImage(offset) => self.pan_zoom_image(*offset),
                Action::HideAll => self.hide_all(),
                Action::DeferredHideAll { delay_ms } => self.deferred_hide_all(*delay_ms),
                Action::ShowNotification(text) => self.show_notification(text),
                Action::SetCursor(mode) => self.set_cursor(*mode),
                Action::LoadRequested { .. } => {}
            }
        }
    }
}
