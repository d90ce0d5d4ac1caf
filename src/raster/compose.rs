//! Pixel operations behind the raster helper's commands.

use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::error::Error;
use crate::geometry::{RectPx, SizePx};

// ============================================================================
// Fit
// ============================================================================

/// How an image is mapped onto a requested width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Scale to cover the box, then crop the overflow around the center.
    Cover,
    /// Scale to fit inside the box, then pad with transparency to the exact box.
    Contain,
    /// Stretch to the exact box, ignoring aspect ratio.
    Fill,
    /// Scale to fit inside the box.
    Inside,
    /// Scale to cover the box, without cropping.
    Outside,
}

impl Fit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fit::Cover => "cover",
            Fit::Contain => "contain",
            Fit::Fill => "fill",
            Fit::Inside => "inside",
            Fit::Outside => "outside",
        }
    }
}

impl FromStr for Fit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cover" => Ok(Fit::Cover),
            "contain" => Ok(Fit::Contain),
            "fill" => Ok(Fit::Fill),
            "inside" => Ok(Fit::Inside),
            "outside" => Ok(Fit::Outside),
            other => Err(Error::InvalidArgument {
                what: "fit mode",
                value: other.to_owned(),
            }),
        }
    }
}

// ============================================================================
// Resize
// ============================================================================

/// Resizes `img` onto a `target` box according to `fit`.
pub fn resize(img: &RgbaImage, target: SizePx, fit: Fit) -> RgbaImage {
    let source = SizePx::new(img.width(), img.height());
    let filter = FilterType::Lanczos3;

    match fit {
        Fit::Fill => imageops::resize(img, target.width, target.height, filter),
        Fit::Inside => {
            let size = source.scaled(source.fit_within(target));
            imageops::resize(img, size.width, size.height, filter)
        }
        Fit::Outside => {
            let size = source.scaled(source.cover(target));
            imageops::resize(img, size.width, size.height, filter)
        }
        Fit::Contain => {
            let size = source.scaled(source.fit_within(target));
            let scaled = imageops::resize(img, size.width, size.height, filter);
            let mut canvas = RgbaImage::new(target.width, target.height);
            let slot = RectPx::new(0, 0, target.width, target.height).center(size);
            imageops::replace(&mut canvas, &scaled, slot.x as i64, slot.y as i64);
            canvas
        }
        Fit::Cover => {
            let size = source.scaled(source.cover(target));
            let scaled = imageops::resize(img, size.width, size.height, filter);
            let crop = RectPx::new(0, 0, size.width, size.height).center(target);
            imageops::crop_imm(&scaled, crop.x, crop.y, target.width, target.height).to_image()
        }
    }
}

// ============================================================================
// Tint
// ============================================================================

/// Turns every pixel pure white, keeping its alpha.
pub fn tint_white(img: &mut RgbaImage) {
    for pixel in img.pixels_mut() {
        let a = pixel[3];
        *pixel = Rgba([255, 255, 255, a]);
    }
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites `overlay` centered over `base` with "over" blending.
///
/// Images of equal size line up at the origin.
pub fn composite_centered(base: &mut RgbaImage, overlay: &RgbaImage) {
    let x = (i64::from(base.width()) - i64::from(overlay.width())) / 2;
    let y = (i64::from(base.height()) - i64::from(overlay.height())) / 2;
    imageops::overlay(base, overlay, x, y);
}
