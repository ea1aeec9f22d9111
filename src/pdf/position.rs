//! Geometry for page decorations. Everything here is in PDF points with the
//! origin at the bottom-left of the page.

use crate::model::Column;

/// Scale `(src_w, src_h)` down to fit inside `(max_w, max_h)`.
///
/// Images already inside the box come back unchanged; nothing is upscaled.
/// Scaling tries the width first and falls back to the height when the
/// width-scaled image is still too tall. Any non-positive input yields `(0, 0)`.
pub fn fit_dimensions(src_w: f32, src_h: f32, max_w: f32, max_h: f32) -> (f32, f32) {
    if !(src_w > 0.0 && src_h > 0.0 && max_w > 0.0 && max_h > 0.0) {
        return (0.0, 0.0);
    }
    if src_w <= max_w && src_h <= max_h {
        return (src_w, src_h);
    }
    let ratio = aspect_ratio(src_w, src_h);
    let by_width = (max_w, max_w / ratio);
    if by_width.1 <= max_h {
        return by_width;
    }
    (max_h * ratio, max_h)
}

/// Width over height; a zero height gives 1.0.
pub fn aspect_ratio(w: f32, h: f32) -> f32 {
    if h == 0.0 { 1.0 } else { w / h }
}

/// Square decoration box anchored to the bottom-right page corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerBox {
    pub size: f32,
    pub margin: f32,
}

impl Default for CornerBox {
    fn default() -> Self {
        Self {
            size: 72.0,
            margin: 36.0,
        }
    }
}

/// Bottom-left corner of the default corner box.
pub fn corner_anchor(page_width: f32, reserved_footer_height: f32, is_first_page: bool) -> (f32, f32) {
    corner_anchor_with(
        page_width,
        reserved_footer_height,
        is_first_page,
        &CornerBox::default(),
    )
}

/// Bottom-left corner of `corner`. The footer only exists on the first page,
/// so only there is the box lifted above it. The first-page `y` is strictly
/// greater only for a positive `reserved_footer_height`; zero or less gives
/// every page the same anchor.
pub fn corner_anchor_with(
    page_width: f32,
    reserved_footer_height: f32,
    is_first_page: bool,
    corner: &CornerBox,
) -> (f32, f32) {
    let x = page_width - corner.margin - corner.size;
    let mut y = corner.margin;
    if is_first_page {
        y += reserved_footer_height.max(0.0);
    }
    (x, y)
}

/// Bottom-left corner for a photo of `size` in the strip of `reserved_height`
/// directly below `column`. Centered horizontally, flush with the top of the
/// strip.
pub fn photo_anchor(column: &Column, reserved_height: f32, size: (f32, f32)) -> (f32, f32) {
    let (w, h) = size;
    let x = column.x + (column.width - w).max(0.0) / 2.0;
    let y = column.bottom() - h.min(reserved_height.max(0.0));
    (x, y)
}
