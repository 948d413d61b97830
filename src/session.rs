//! Lifecycle of one bound magnifier: resource loading, hover tracking, reset.
//!
//! `ZoomSession` is the testable core of the widget. It holds no browser
//! handles; hosts feed it pointer events plus a [`PreviewLayout`] snapshot and
//! apply the [`Action`]s it returns. Image fetching is requested through
//! [`Action::LoadRequested`] and completed by calling
//! [`ZoomSession::on_load_succeeded`] or [`ZoomSession::on_load_failed`] with
//! the ticket from that request.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::config::ZoomConfig;
use crate::error::ZoomError;
use crate::geometry::{Point, PreviewLayout, ScaleRatio, Size, compute_preview_box, compute_scale_ratio, compute_viewport_offset};
use crate::presenter::{Action, CursorMode};

/// Identifies one load request. Completions carrying a stale ticket are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Where the high-resolution image is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    NotRequested,
    Loading,
    Loaded,
    Failed,
}

impl ResourceState {
    /// Name used by the JavaScript binding.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotRequested => "notRequested",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        }
    }
}

/// Pick the high-resolution reference: explicit argument first, then the
/// target's attribute value. Empty strings count as absent.
///
/// # Errors
///
/// Returns [`ZoomError::MissingSourceReference`] when neither is usable.
pub fn resolve_source_reference(
    explicit: Option<String>,
    attribute_value: Option<String>,
    attribute_name: &str,
) -> Result<String, ZoomError> {
    explicit
        .filter(|reference| !reference.is_empty())
        .or_else(|| attribute_value.filter(|reference| !reference.is_empty()))
        .ok_or_else(|| ZoomError::MissingSourceReference { attribute: attribute_name.to_owned() })
}

/// Internal resource state. The ratio only exists while loaded.
#[derive(Debug, Clone, Copy)]
enum Resource {
    NotRequested,
    Loading { ticket: LoadTicket },
    Loaded { image: Size, ratio: ScaleRatio },
    Failed,
}

/// State of one magnifier bound to a target element.
#[derive(Debug, Clone)]
pub struct ZoomSession {
    source_reference: String,
    config: ZoomConfig,
    resource: Resource,
    hovering: bool,
    next_ticket: u64,
}

impl ZoomSession {
    #[must_use]
    pub fn new(source_reference: impl Into<String>, config: ZoomConfig) -> Self {
        Self {
            source_reference: source_reference.into(),
            config,
            resource: Resource::NotRequested,
            hovering: false,
            next_ticket: 0,
        }
    }

    // --- Pointer input ---

    /// Pointer entered the target: show the zoom window, or start loading.
    ///
    /// A failed load is retried here. While a load is in flight no second
    /// request is issued.
    pub fn on_hover_start(&mut self) -> Vec<Action> {
        self.hovering = true;
        let mut actions = vec![Action::SetCursor(CursorMode::Default)];

        if matches!(self.resource, Resource::Loaded { .. }) {
            actions.push(Action::ShowZoomWindow);
            return actions;
        }

        actions.push(Action::SetCursor(CursorMode::Busy));
        actions.push(Action::ShowNotification(self.config.notifications.loading.clone()));

        if matches!(self.resource, Resource::NotRequested | Resource::Failed) {
            let ticket = LoadTicket(self.next_ticket);
            self.next_ticket += 1;
            self.resource = Resource::Loading { ticket };
            log::debug!("requesting {} (ticket {})", self.source_reference, ticket.0);
            actions.push(Action::LoadRequested { reference: self.source_reference.clone(), ticket });
        }
        actions
    }

    /// Pointer moved over the target. Only acts once the image is loaded.
    pub fn on_hover_move(&mut self, pointer: Point, layout: &PreviewLayout) -> Vec<Action> {
        let Resource::Loaded { ratio, .. } = self.resource else {
            return Vec::new();
        };
        if !layout.contains(pointer) {
            return vec![Action::HideAll];
        }
        self.hovering = true;

        let offset = compute_viewport_offset(pointer, layout.origin, ratio, layout.window_size);
        let preview_box = compute_preview_box(pointer, layout.window_size, ratio, layout.offset_parent_origin);
        vec![Action::PanZoomImage(offset), Action::ShowPreviewBox(preview_box), Action::ShowZoomWindow]
    }

    /// Pointer left the target. Outputs stay visible while it is still over the preview image.
    pub fn on_hover_end(&mut self, pointer: Point, layout: &PreviewLayout) -> Vec<Action> {
        if layout.contains(pointer) {
            return Vec::new();
        }
        self.hovering = false;
        vec![Action::HideAll]
    }

    // --- Load completion ---

    /// The image for `ticket` finished loading with natural size `image`.
    ///
    /// `preview` is the displayed size of the preview image at this moment.
    /// A preview or image without a usable size is handled like a failed load.
    pub fn on_load_succeeded(&mut self, ticket: LoadTicket, image: Size, preview: Size) -> Vec<Action> {
        if !self.is_in_flight(ticket) {
            log::debug!("ignoring stale load completion (ticket {})", ticket.0);
            return Vec::new();
        }
        let ratio = match compute_scale_ratio(image, preview) {
            Ok(ratio) => ratio,
            Err(err) => {
                log::warn!("{}", ZoomError::from(err));
                return self.fail();
            }
        };

        log::debug!("loaded {} at {}x{} (ratio {}x{})", self.source_reference, image.width, image.height, ratio.width, ratio.height);
        self.resource = Resource::Loaded { image, ratio };
        if self.hovering {
            self.on_hover_start()
        } else {
            vec![Action::SetCursor(CursorMode::Default)]
        }
    }

    /// The image for `ticket` could not be loaded.
    pub fn on_load_failed(&mut self, ticket: LoadTicket) -> Vec<Action> {
        if !self.is_in_flight(ticket) {
            log::debug!("ignoring stale load failure (ticket {})", ticket.0);
            return Vec::new();
        }
        log::warn!("{}", ZoomError::ResourceLoadFailure { reference: self.source_reference.clone() });
        self.fail()
    }

    // --- Lifecycle ---

    /// Forget the loaded image and hide the outputs. Safe to call repeatedly.
    ///
    /// A load still in flight is abandoned; its completion will be ignored.
    pub fn reset(&mut self) -> Vec<Action> {
        self.resource = Resource::NotRequested;
        self.hovering = false;
        vec![Action::SetCursor(CursorMode::Default), Action::HideAll]
    }

    fn fail(&mut self) -> Vec<Action> {
        self.resource = Resource::Failed;
        vec![
            Action::SetCursor(CursorMode::Default),
            Action::ShowNotification(self.config.notifications.error.clone()),
            Action::DeferredHideAll { delay_ms: self.config.error_hide_delay_ms },
        ]
    }

    fn is_in_flight(&self, ticket: LoadTicket) -> bool {
        matches!(self.resource, Resource::Loading { ticket: current } if current == ticket)
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> ResourceState {
        match self.resource {
            Resource::NotRequested => ResourceState::NotRequested,
            Resource::Loading { .. } => ResourceState::Loading,
            Resource::Loaded { .. } => ResourceState::Loaded,
            Resource::Failed => ResourceState::Failed,
        }
    }

    /// Ratio of source to preview size. `Some` exactly when loaded.
    #[must_use]
    pub fn scale_ratio(&self) -> Option<ScaleRatio> {
        match self.resource {
            Resource::Loaded { ratio, .. } => Some(ratio),
            _ => None,
        }
    }

    /// Natural size of the loaded high-resolution image.
    #[must_use]
    pub fn loaded_size(&self) -> Option<Size> {
        match self.resource {
            Resource::Loaded { image, .. } => Some(image),
            _ => None,
        }
    }

    /// Ticket of the load currently in flight, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<LoadTicket> {
        match self.resource {
            Resource::Loading { ticket } => Some(ticket),
            _ => None,
        }
    }

    #[must_use]
    pub fn source_reference(&self) -> &str {
        &self.source_reference
    }

    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    #[must_use]
    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }
}
