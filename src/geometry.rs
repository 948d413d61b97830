//! Coordinate mapping between the preview image and the high-resolution source.
//!
//! Every function here is pure: identical inputs produce identical outputs and
//! nothing is cached between calls. Coordinates are CSS pixels in page space
//! unless stated otherwise.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

/// A point in page space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Multiplicative factor converting preview-space lengths to source-image lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRatio {
    pub width: f64,
    pub height: f64,
}

/// How far the high-resolution image must be shifted inside the zoom window.
///
/// The presenter applies this as a negative translation (`left = -offset.left`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportOffset {
    pub left: f64,
    pub top: f64,
}

/// Placement of the preview box, relative to the preview image's positioned ancestor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewBox {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
}

/// Snapshot of host geometry taken when a pointer event arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewLayout {
    /// Page offset of the preview image's top-left corner.
    pub origin: Point,
    /// Displayed size of the preview image.
    pub size: Size,
    /// Page offset of the preview image's nearest positioned ancestor.
    pub offset_parent_origin: Point,
    /// Size of the zoom-window surface.
    pub window_size: Size,
}

impl PreviewLayout {
    /// Whether `pointer` lies on or inside the preview image.
    #[must_use]
    pub fn contains(&self, pointer: Point) -> bool {
        is_within_bounds(pointer, self.origin, self.size)
    }
}

/// Error returned by [`compute_scale_ratio`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// The preview is not displayed with a positive, finite size.
    #[error("preview has no usable displayed size ({width}x{height})")]
    ZeroPreviewDimension { width: f64, height: f64 },
    /// The decoded source image has no usable natural size (e.g. an SVG without intrinsic size).
    #[error("source image has no usable natural size ({width}x{height})")]
    ZeroSourceDimension { width: f64, height: f64 },
}

fn usable(len: f64) -> bool {
    len.is_finite() && len > 0.0
}

/// Ratio of source dimensions to displayed preview dimensions, per axis.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroPreviewDimension`] when either preview
/// dimension is zero, negative, or not finite, and
/// [`GeometryError::ZeroSourceDimension`] when a source dimension is.
pub fn compute_scale_ratio(source: Size, preview: Size) -> Result<ScaleRatio, GeometryError> {
    if !usable(preview.width) || !usable(preview.height) {
        return Err(GeometryError::ZeroPreviewDimension { width: preview.width, height: preview.height });
    }
    if !usable(source.width) || !usable(source.height) {
        return Err(GeometryError::ZeroSourceDimension { width: source.width, height: source.height });
    }
    Ok(ScaleRatio {
        width: source.width / preview.width,
        height: source.height / preview.height,
    })
}

/// Offset that centers the magnified region under `pointer` inside a viewport of `viewport` size.
#[must_use]
pub fn compute_viewport_offset(
    pointer: Point,
    preview_origin: Point,
    ratio: ScaleRatio,
    viewport: Size,
) -> ViewportOffset {
    ViewportOffset {
        left: (pointer.x - preview_origin.x) * ratio.width - viewport.width / 2.0,
        top: (pointer.y - preview_origin.y) * ratio.height - viewport.height / 2.0,
    }
}

/// The preview-space rectangle currently shown in the zoom window, centered under `pointer`.
#[must_use]
pub fn compute_preview_box(
    pointer: Point,
    window: Size,
    ratio: ScaleRatio,
    offset_parent_origin: Point,
) -> PreviewBox {
    let width = window.width / ratio.width;
    let height = window.height / ratio.height;
    PreviewBox {
        width,
        height,
        left: pointer.x - width / 2.0 - offset_parent_origin.x,
        top: pointer.y - height / 2.0 - offset_parent_origin.y,
    }
}

/// True iff `pointer` lies within `[origin, origin + size]` on both axes, edges included.
#[must_use]
pub fn is_within_bounds(pointer: Point, origin: Point, size: Size) -> bool {
    pointer.x >= origin.x
        && pointer.x <= origin.x + size.width
        && pointer.y >= origin.y
        && pointer.y <= origin.y + size.height
}
