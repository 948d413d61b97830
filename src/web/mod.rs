//! Browser binding for the magnifier.
//!
//! `ZoomBinding` attaches pointer listeners to a target element, feeds the
//! events into a [`ZoomSession`], applies the returned actions through a
//! [`DomPresenter`], and performs the image loads the session requests.
//! [`EasyZoom`] exposes the same surface to JavaScript.

mod dom;
mod listeners;

pub use dom::DomPresenter;
pub use listeners::Listener;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, HtmlImageElement, MouseEvent, Window};

use crate::config::ZoomConfig;
use crate::error::ZoomError;
use crate::geometry::{Point, Size};
use crate::presenter::{Action, Presenter};
use crate::session::{LoadTicket, ResourceState, ZoomSession, resolve_source_reference};

/// Install the panic hook and route `log` records to the browser console.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("magnifier logging unavailable: {err}").into());
    }
}

/// An image request in flight, with the callbacks that report back to the session.
struct ImageLoad {
    ticket: LoadTicket,
    image: HtmlImageElement,
    _on_load: Closure<dyn FnMut()>,
    _on_error: Closure<dyn FnMut()>,
}

impl Drop for ImageLoad {
    fn drop(&mut self) {
        // The browser may still fire these after the closures are gone.
        self.image.set_onload(None);
        self.image.set_onerror(None);
    }
}

/// Everything the listener and load callbacks share.
struct Inner {
    session: ZoomSession,
    presenter: DomPresenter,
    window: Window,
    preview: HtmlElement,
    load: Option<ImageLoad>,
}

impl Inner {
    fn dispatch(&mut self, actions: Vec<Action>, weak: &Weak<RefCell<Inner>>) {
        self.presenter.apply(&actions);
        for action in &actions {
            if let Action::LoadRequested { reference, ticket } = action {
                self.start_load(reference, *ticket, weak);
            }
        }
    }

    fn start_load(&mut self, reference: &str, ticket: LoadTicket, weak: &Weak<RefCell<Inner>>) {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(err) => {
                log::warn!("failed to create image element: {err:?}");
                let actions = self.session.on_load_failed(ticket);
                self.presenter.apply(&actions);
                return;
            }
        };
        let on_load = load_callback(weak, move |inner| inner.finish_load(ticket));
        let on_error = load_callback(weak, move |inner| inner.session.on_load_failed(ticket));
        image.set_onload(Some(on_load.as_ref().unchecked_ref()));
        image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        image.set_src(reference);
        self.load = Some(ImageLoad { ticket, image, _on_load: on_load, _on_error: on_error });
    }

    fn finish_load(&mut self, ticket: LoadTicket) -> Vec<Action> {
        let image = match &self.load {
            Some(load) if load.ticket == ticket => load.image.clone(),
            _ => return Vec::new(),
        };
        let natural = Size::new(f64::from(image.natural_width()), f64::from(image.natural_height()));
        let preview = dom::displayed_size(&self.preview);
        let actions = self.session.on_load_succeeded(ticket, natural, preview);
        if self.session.state() == ResourceState::Loaded {
            self.presenter.set_image(Some(image));
        }
        actions
    }

    fn hover_move(&mut self, event: &MouseEvent) -> Vec<Action> {
        let layout = dom::preview_layout(&self.window, &self.preview, &self.presenter);
        self.session.on_hover_move(page_point(event), &layout)
    }

    fn hover_end(&mut self, event: &MouseEvent) -> Vec<Action> {
        let layout = dom::preview_layout(&self.window, &self.preview, &self.presenter);
        self.session.on_hover_end(page_point(event), &layout)
    }

    fn reset(&mut self) -> Vec<Action> {
        self.load = None;
        self.presenter.set_image(None);
        self.session.reset()
    }
}

/// Run `handler` against the shared state and apply whatever it returns.
fn with_inner<F>(inner: &Rc<RefCell<Inner>>, handler: F)
where
    F: FnOnce(&mut Inner) -> Vec<Action>,
{
    let weak = Rc::downgrade(inner);
    let Ok(mut guard) = inner.try_borrow_mut() else {
        log::warn!("zoom session busy, dropping re-entrant event");
        return;
    };
    let actions = handler(&mut guard);
    guard.dispatch(actions, &weak);
}

fn load_callback<F>(weak: &Weak<RefCell<Inner>>, handler: F) -> Closure<dyn FnMut()>
where
    F: Fn(&mut Inner) -> Vec<Action> + 'static,
{
    let weak = weak.clone();
    Closure::wrap(Box::new(move || {
        if let Some(inner) = weak.upgrade() {
            with_inner(&inner, &handler);
        }
    }) as Box<dyn FnMut()>)
}

fn page_point(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.page_x()), f64::from(event.page_y()))
}

fn dom_error(context: &str, err: &JsValue) -> ZoomError {
    ZoomError::Dom(format!("{context}: {err:?}"))
}

/// A magnifier bound to one target element.
///
/// Dropping the binding detaches its listeners. An image load already in
/// flight keeps running, but its result is discarded.
pub struct ZoomBinding {
    target: HtmlElement,
    config: ZoomConfig,
    inner: Rc<RefCell<Inner>>,
    listeners: Vec<Listener>,
}

impl ZoomBinding {
    /// Bind a magnifier to `target`, whose first `<img>` is the preview.
    ///
    /// The high-resolution reference is `source_reference` when given, else
    /// the target's source attribute (`data-image` by default).
    ///
    /// # Errors
    ///
    /// Fails when no reference can be resolved, the target has no `<img>`,
    /// or the browser refuses the listeners.
    pub fn bind(target: HtmlElement, source_reference: Option<String>, config: ZoomConfig) -> Result<Self, ZoomError> {
        let window = web_sys::window().ok_or_else(|| ZoomError::Dom("no global window".to_owned()))?;
        let document = window
            .document()
            .ok_or_else(|| ZoomError::Dom("window has no document".to_owned()))?;
        let preview = target
            .query_selector("img")
            .map_err(|err| dom_error("preview lookup failed", &err))?
            .and_then(dom::as_html)
            .ok_or(ZoomError::MissingPreviewImage)?;
        let reference = resolve_source_reference(
            source_reference,
            target.get_attribute(&config.source_attribute),
            &config.source_attribute,
        )?;

        let presenter = DomPresenter::new(document, target.clone(), config.selector.clone());
        let inner = Inner {
            session: ZoomSession::new(reference, config.clone()),
            presenter,
            window,
            preview,
            load: None,
        };
        let mut binding = Self { target, config, inner: Rc::new(RefCell::new(inner)), listeners: Vec::new() };
        binding.attach()?;
        log::info!("magnifier bound to {}", binding.source_reference());
        Ok(binding)
    }

    /// Reset, then start over with a new (or re-resolved) source reference.
    ///
    /// # Errors
    ///
    /// Fails when no reference can be resolved or listeners cannot be attached.
    pub fn init(&mut self, source_reference: Option<String>) -> Result<(), ZoomError> {
        let reference = resolve_source_reference(
            source_reference,
            self.target.get_attribute(&self.config.source_attribute),
            &self.config.source_attribute,
        )?;
        self.reset();
        self.inner.borrow_mut().session = ZoomSession::new(reference, self.config.clone());
        self.attach()
    }

    /// Hide the outputs, forget the loaded image, and detach the listeners.
    pub fn reset(&mut self) {
        self.listeners.clear();
        with_inner(&self.inner, Inner::reset);
    }

    /// Reset and release the binding for good.
    pub fn teardown(mut self) {
        self.reset();
        log::info!("magnifier for {} torn down", self.source_reference());
    }

    #[must_use]
    pub fn state(&self) -> ResourceState {
        self.inner.borrow().session.state()
    }

    #[must_use]
    pub fn source_reference(&self) -> String {
        self.inner.borrow().session.source_reference().to_owned()
    }

    fn attach(&mut self) -> Result<(), ZoomError> {
        let over = Rc::clone(&self.inner);
        let moved = Rc::clone(&self.inner);
        let out = Rc::clone(&self.inner);
        self.listeners = vec![
            Listener::attach(&self.target, "mouseover", move |_event| {
                with_inner(&over, |inner| inner.session.on_hover_start());
            })?,
            Listener::attach(&self.target, "mousemove", move |event| {
                with_inner(&moved, |inner| inner.hover_move(&event));
            })?,
            Listener::attach(&self.target, "mouseout", move |event| {
                with_inner(&out, |inner| inner.hover_end(&event));
            })?,
        ];
        Ok(())
    }
}

fn parse_config(value: &JsValue) -> Result<ZoomConfig, ZoomError> {
    if value.is_undefined() || value.is_null() {
        return Ok(ZoomConfig::default());
    }
    let json = js_sys::JSON::stringify(value).map_err(|err| dom_error("config is not serializable", &err))?;
    ZoomConfig::from_json(&String::from(json))
}

/// JavaScript handle: `new EasyZoom(element, source?, options?)`.
#[wasm_bindgen]
pub struct EasyZoom {
    binding: Option<ZoomBinding>,
}

#[wasm_bindgen]
impl EasyZoom {
    /// Bind to `target`. `options` accepts the fields of [`ZoomConfig`].
    ///
    /// # Errors
    ///
    /// Throws when the options are invalid or binding fails.
    #[wasm_bindgen(constructor)]
    pub fn new(target: HtmlElement, source: Option<String>, options: JsValue) -> Result<EasyZoom, JsError> {
        let config = parse_config(&options)?;
        let binding = ZoomBinding::bind(target, source, config)?;
        Ok(EasyZoom { binding: Some(binding) })
    }

    /// Re-initialize with a new source reference.
    ///
    /// # Errors
    ///
    /// Throws after `teardown` or when binding fails.
    pub fn init(&mut self, source: Option<String>) -> Result<(), JsError> {
        let binding = self.binding.as_mut().ok_or(ZoomError::TornDown)?;
        binding.init(source)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        if let Some(binding) = self.binding.as_mut() {
            binding.reset();
        }
    }

    pub fn teardown(&mut self) {
        if let Some(binding) = self.binding.take() {
            binding.teardown();
        }
    }

    /// Resource state as a string: `notRequested`, `loading`, `loaded`, `failed`.
    #[must_use]
    pub fn state(&self) -> String {
        self.binding
            .as_ref()
            .map_or(ResourceState::NotRequested, ZoomBinding::state)
            .as_str()
            .to_owned()
    }
}
