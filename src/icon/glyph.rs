//! Glyph preparation: white recoloring, placement and drop shadow.

use image::imageops;
use image::{Rgba, RgbaImage};

use super::canvas::{BAR_HEIGHT, SIZE};
use crate::geometry::{RectPx, SizePx};

/// Canvas shadow blur radius applied around the glyph.
pub const SHADOW_BLUR: f32 = 20.0;

/// The area above the label bar.
pub fn gradient_area() -> RectPx {
    RectPx::new(0, 0, SIZE, SIZE - BAR_HEIGHT)
}

/// Padding kept around the glyph, 10% of the gradient area's height.
pub fn padding() -> u32 {
    gradient_area().height / 10
}

/// The box the rasterized glyph has to fit in.
pub fn available_size() -> SizePx {
    let area = gradient_area();
    let pad = padding();
    SizePx::new(area.width - pad * 2, area.height - pad * 2)
}

/// Final glyph size: shrunk to the available height if it is taller.
pub fn fitted_size(rasterized: SizePx) -> SizePx {
    let width = rasterized.width.max(1);
    let height = rasterized.height.max(1);
    let max_height = available_size().height;
    if height > max_height {
        let scale = max_height as f64 / height as f64;
        SizePx::new(((width as f64 * scale).floor() as u32).max(1), max_height)
    } else {
        SizePx::new(width, height)
    }
}

/// Where a glyph of `size` lands: centered in the gradient area.
pub fn placement(size: SizePx) -> RectPx {
    gradient_area().center(size)
}

// ============================================================================
// SVG recoloring
// ============================================================================

/// Forces every fill and stroke in the document to white.
///
/// Existing `fill`/`stroke` attributes are rewritten, and the root `<svg>`
/// element gets white defaults so inherited paint turns white too.
pub fn whiten_svg(svg_data: &str) -> String {
    let mut result = replace_attr(svg_data, "fill", "white");
    result = replace_attr(&result, "stroke", "white");
    add_root_defaults(&result)
}

/// Replaces every `attr="..."` value with `value`.
fn replace_attr(svg: &str, attr: &str, value: &str) -> String {
    let mut result = String::with_capacity(svg.len());
    let pattern = format!("{}=\"", attr);
    let mut remaining = svg;

    while let Some(start) = remaining.find(&pattern) {
        let boundary = remaining[..start]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);

        result.push_str(&remaining[..start + pattern.len()]);
        remaining = &remaining[start + pattern.len()..];

        if !boundary {
            continue;
        }
        if let Some(end) = remaining.find('"') {
            result.push_str(value);
            remaining = &remaining[end..];
        }
    }

    result.push_str(remaining);
    result
}

/// Adds `fill="white" stroke="white"` to the root element where absent.
fn add_root_defaults(svg: &str) -> String {
    let Some(start) = find_root(svg) else {
        return svg.to_owned();
    };
    let tag_end = svg[start..].find('>').map_or(svg.len(), |i| start + i);
    let tag = &svg[start..tag_end];

    let mut extra = String::new();
    for attr in ["fill", "stroke"] {
        if !tag.contains(&format!(" {}=\"", attr)) && !tag.contains(&format!("\n{}=\"", attr)) {
            extra.push_str(&format!(" {}=\"white\"", attr));
        }
    }

    let insert_at = start + "<svg".len();
    let mut out = String::with_capacity(svg.len() + extra.len());
    out.push_str(&svg[..insert_at]);
    out.push_str(&extra);
    out.push_str(&svg[insert_at..]);
    out
}

/// Byte offset of the first `<svg` tag, case-insensitively.
fn find_root(svg: &str) -> Option<usize> {
    svg.as_bytes()
        .windows(4)
        .position(|w| w.eq_ignore_ascii_case(b"<svg"))
}

// ============================================================================
// Glyph layer
// ============================================================================

/// Builds a full-size transparent layer with `glyph` at `at` over its own
/// blurred black silhouette.
pub fn glyph_layer(glyph: &RgbaImage, at: RectPx) -> RgbaImage {
    let mut silhouette = RgbaImage::new(SIZE, SIZE);
    for (x, y, px) in glyph.enumerate_pixels() {
        let (dx, dy) = (at.x + x, at.y + y);
        if dx < SIZE && dy < SIZE {
            silhouette.put_pixel(dx, dy, Rgba([0, 0, 0, px[3]]));
        }
    }

    // Canvas blur radii correspond to a gaussian sigma of half the radius.
    let mut layer = imageops::blur(&silhouette, SHADOW_BLUR / 2.0);
    imageops::overlay(&mut layer, glyph, i64::from(at.x), i64::from(at.y));
    layer
}
