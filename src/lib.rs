//! Hover magnifier for preview images.
//!
//! A low-resolution preview is bound to a high-resolution counterpart that is
//! loaded lazily on first hover. While the pointer is over the preview, a zoom
//! window shows the matching region of the large image and a preview box marks
//! that region on the small one. The crate compiles to WebAssembly for the
//! browser; the state machine and geometry also build natively so they can be
//! tested without one.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Load/hover lifecycle of one bound widget ([`session::ZoomSession`]) |
//! | [`geometry`] | Pure preview ↔ source coordinate mapping |
//! | [`presenter`] | [`presenter::Action`]s and the [`presenter::Presenter`] that applies them |
//! | [`config`] | Widget options and their JSON form |
//! | [`error`] | Error types |
//! | [`consts`] | Default selectors, notification texts, delays |
//! | `web` | DOM binding and JavaScript export (feature `web`) |

pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod presenter;
pub mod session;
#[cfg(feature = "web")]
pub mod web;
