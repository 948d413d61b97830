//! DOM side of the presentation driver and the geometry queries the session needs.
//!
//! Surfaces are looked up by selector on every call so the widget keeps
//! working when the page re-renders them. A missing surface is logged and
//! skipped rather than treated as an error.

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, Node, Window};

use crate::config::Selectors;
use crate::geometry::{Point, PreviewBox, PreviewLayout, Size, ViewportOffset};
use crate::presenter::{CursorMode, Presenter};

/// Applies presentation actions to the two output surfaces of one binding.
pub struct DomPresenter {
    document: Document,
    target: HtmlElement,
    selectors: Selectors,
    /// The decoded high-resolution image, once loaded.
    image: Option<HtmlImageElement>,
    /// At most one scheduled hide; replacing or dropping it cancels the timer.
    pending_hide: Option<Timeout>,
}

impl DomPresenter {
    #[must_use]
    pub fn new(document: Document, target: HtmlElement, selectors: Selectors) -> Self {
        Self { document, target, selectors, image: None, pending_hide: None }
    }

    /// Use `image` as the zoom-window content from now on.
    pub fn set_image(&mut self, image: Option<HtmlImageElement>) {
        self.image = image;
    }

    /// Inner (padding-box) size of the zoom-window surface, zero when it is missing.
    #[must_use]
    pub fn window_size(&self) -> Size {
        surface(&self.document, &self.selectors.window).map_or(Size::new(0.0, 0.0), |window| {
            Size::new(f64::from(window.client_width()), f64::from(window.client_height()))
        })
    }

    fn cancel_pending_hide(&mut self) {
        // Dropping the timeout clears it.
        self.pending_hide = None;
    }
}

impl Presenter for DomPresenter {
    fn show_zoom_window(&mut self) {
        self.cancel_pending_hide();
        let Some(window) = surface(&self.document, &self.selectors.window) else {
            return;
        };
        if let Some(image) = &self.image {
            let window_node: &Node = &window;
            let mounted = image
                .parent_element()
                .is_some_and(|parent| parent.is_same_node(Some(window_node)));
            if !mounted {
                window.set_text_content(None);
                set_style(image, "position", "absolute");
                if let Err(err) = window.append_child(image) {
                    log::warn!("failed to mount zoom image: {err:?}");
                }
            }
        }
        set_style(&window, "display", "block");
    }

    fn show_preview_box(&mut self, geometry: PreviewBox) {
        let Some(preview) = surface(&self.document, &self.selectors.preview) else {
            return;
        };
        set_style(&preview, "width", &px(geometry.width));
        set_style(&preview, "height", &px(geometry.height));
        set_style(&preview, "left", &px(geometry.left));
        set_style(&preview, "top", &px(geometry.top));
        set_style(&preview, "display", "block");
    }

    fn pan_zoom_image(&mut self, offset: ViewportOffset) {
        if let Some(image) = &self.image {
            set_style(image, "left", &px(-offset.left));
            set_style(image, "top", &px(-offset.top));
        }
    }

    fn hide_all(&mut self) {
        self.cancel_pending_hide();
        hide_surfaces(&self.document, &self.selectors);
    }

    fn deferred_hide_all(&mut self, delay_ms: u32) {
        let document = self.document.clone();
        let selectors = self.selectors.clone();
        self.pending_hide = Some(Timeout::new(delay_ms, move || hide_surfaces(&document, &selectors)));
    }

    fn show_notification(&mut self, text: &str) {
        self.cancel_pending_hide();
        let Some(window) = surface(&self.document, &self.selectors.window) else {
            return;
        };
        window.set_text_content(Some(text));
        set_style(&window, "display", "block");
    }

    fn set_cursor(&mut self, mode: CursorMode) {
        set_style(&self.target, "cursor", mode.css_value());
    }
}

fn hide_surfaces(document: &Document, selectors: &Selectors) {
    for selector in [&selectors.window, &selectors.preview] {
        if let Some(el) = surface(document, selector) {
            set_style(&el, "display", "none");
        }
    }
}

fn surface(document: &Document, selector: &str) -> Option<HtmlElement> {
    match document.query_selector(selector) {
        Ok(Some(el)) => as_html(el),
        Ok(None) => {
            log::debug!("no element matches {selector}");
            None
        }
        Err(err) => {
            log::warn!("invalid selector {selector}: {err:?}");
            None
        }
    }
}

/// Downcast a generic element, logging when it is not an HTML element.
pub fn as_html(el: Element) -> Option<HtmlElement> {
    match el.dyn_into::<HtmlElement>() {
        Ok(html) => Some(html),
        Err(el) => {
            log::warn!("<{}> is not an HTML element", el.tag_name());
            None
        }
    }
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = el.style().set_property(property, value) {
        log::warn!("failed to set {property}: {err:?}");
    }
}

fn px(value: f64) -> String {
    format!("{value}px")
}

// --- Geometry queries ---

/// Page-relative offset of `el`'s border box, like jQuery's `.offset()`.
fn page_offset(window: &Window, el: &Element) -> Point {
    let rect = el.get_bounding_client_rect();
    let scroll_x = window.scroll_x().unwrap_or(0.0);
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    Point::new(rect.left() + scroll_x, rect.top() + scroll_y)
}

/// Displayed size of `el`.
#[must_use]
pub fn displayed_size(el: &Element) -> Size {
    let rect = el.get_bounding_client_rect();
    Size::new(rect.width(), rect.height())
}

/// Snapshot the preview image and zoom-window geometry for one pointer event.
#[must_use]
pub fn preview_layout(window: &Window, preview: &HtmlElement, presenter: &DomPresenter) -> PreviewLayout {
    let offset_parent_origin = preview
        .offset_parent()
        .map_or(Point::new(0.0, 0.0), |parent| page_offset(window, &parent));
    PreviewLayout {
        origin: page_offset(window, preview),
        size: displayed_size(preview),
        offset_parent_origin,
        window_size: presenter.window_size(),
    }
}
