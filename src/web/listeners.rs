//! Disposable DOM event subscriptions.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlElement, MouseEvent};

use crate::error::ZoomError;

/// One attached listener. Dropping it removes the listener from its target.
pub struct Listener {
    target: HtmlElement,
    event: &'static str,
    callback: Closure<dyn FnMut(MouseEvent)>,
}

impl Listener {
    /// Attach `handler` for `event` on `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ZoomError::Dom`] if the browser rejects the listener.
    pub fn attach<F>(target: &HtmlElement, event: &'static str, handler: F) -> Result<Self, ZoomError>
    where
        F: FnMut(MouseEvent) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|err| ZoomError::Dom(format!("failed to attach {event} listener: {err:?}")))?;
        Ok(Self { target: target.clone(), event, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("failed to detach {} listener: {err:?}", self.event);
        }
    }
}
