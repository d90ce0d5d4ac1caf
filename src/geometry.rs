//! Pixel geometry used by the raster operations and glyph placement.

/// A rectangle defined in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the image
    pub x: u32,
    /// Y offset from the top edge of the image
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Centers a `size` box inside `self`, rounding offsets down.
    pub fn center(&self, size: SizePx) -> RectPx {
        RectPx {
            x: self.x + self.width.saturating_sub(size.width) / 2,
            y: self.y + self.height.saturating_sub(size.height) / 2,
            width: size.width,
            height: size.height,
        }
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scales both sides by `factor`, rounding to the nearest pixel and never
    /// collapsing a side to zero.
    pub fn scaled(&self, factor: f64) -> SizePx {
        SizePx {
            width: ((self.width as f64 * factor).round() as u32).max(1),
            height: ((self.height as f64 * factor).round() as u32).max(1),
        }
    }

    /// Largest scale factor keeping `self` within `bounds`.
    pub fn fit_within(&self, bounds: SizePx) -> f64 {
        let sx = bounds.width as f64 / self.width.max(1) as f64;
        let sy = bounds.height as f64 / self.height.max(1) as f64;
        sx.min(sy)
    }

    /// Smallest scale factor making `self` cover `bounds`.
    pub fn cover(&self, bounds: SizePx) -> f64 {
        let sx = bounds.width as f64 / self.width.max(1) as f64;
        let sy = bounds.height as f64 / self.height.max(1) as f64;
        sx.max(sy)
    }
}
