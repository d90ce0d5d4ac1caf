//! SVG rasterization using resvg/usvg.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree, fontdb};

use crate::error::{Error, Result};
use crate::geometry::SizePx;

/// Rasterization density for SVG input, in dots per inch.
pub const SVG_DENSITY: f32 = 300.0;

/// The density SVG user units are defined at.
const BASE_DENSITY: f32 = 72.0;

/// Installed families tried, in order, for the generic `sans-serif` family.
const SANS_SERIF_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
    "Helvetica",
    "Noto Sans",
];

/// Parses SVG markup, with system fonts available for `<text>` elements.
pub fn parse_svg(svg_data: &str, with_fonts: bool) -> Result<Tree> {
    let mut opts = Options::default();
    if with_fonts {
        let db = opts.fontdb_mut();
        db.load_system_fonts();
        match sans_serif_family(db) {
            Some(family) => {
                tracing::debug!(%family, "using sans-serif family");
                db.set_sans_serif_family(family);
            }
            None => tracing::debug!("no system fonts found"),
        }
    }
    Ok(Tree::from_str(svg_data, &opts)?)
}

/// Picks an installed family for `sans-serif`.
///
/// fontdb maps the generic families onto fixed names ("Arial" for
/// sans-serif) that many Linux hosts do not have, and text set in a missing
/// family is dropped. Known sans families are preferred, otherwise the first
/// installed face is used.
pub fn sans_serif_family(db: &fontdb::Database) -> Option<String> {
    let installed = |name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };
    SANS_SERIF_FAMILIES
        .iter()
        .find(|name| installed(name))
        .map(|name| (*name).to_owned())
        .or_else(|| {
            db.faces()
                .find_map(|face| face.families.first().map(|(family, _)| family.clone()))
        })
}

/// Rasterizes SVG markup at [`SVG_DENSITY`], shrunk to fit within `bounds`.
///
/// The image is never enlarged beyond its size at that density.
pub fn rasterize_svg(svg_data: &str, bounds: SizePx) -> Result<RgbaImage> {
    let tree = parse_svg(svg_data, false)?;

    let svg_size = tree.size();
    let density_scale = SVG_DENSITY / BASE_DENSITY;
    let natural = SizePx::new(
        (svg_size.width() * density_scale).round().max(1.0) as u32,
        (svg_size.height() * density_scale).round().max(1.0) as u32,
    );
    let fit = natural.fit_within(bounds).min(1.0);
    let target = natural.scaled(fit);

    let scale_x = target.width as f32 / svg_size.width();
    let scale_y = target.height as f32 / svg_size.height();

    let mut pixmap = Pixmap::new(target.width, target.height).ok_or(Error::Canvas {
        width: target.width,
        height: target.height,
    })?;
    resvg::render(&tree, Transform::from_scale(scale_x, scale_y), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Draws an already parsed tree onto `pixmap` at its own coordinates.
pub fn render_onto(tree: &Tree, pixmap: &mut Pixmap) {
    resvg::render(tree, Transform::identity(), &mut pixmap.as_mut());
}

/// Copies a pixmap out of tiny-skia's premultiplied storage.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}
