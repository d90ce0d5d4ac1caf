//! Background drawing: gradient, label bar, bar shadow and label text.

use image::RgbaImage;
use resvg::tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, Path, PathBuilder, Pixmap, Point,
    Shader, SpreadMode, Transform,
};

use super::IconSpec;
use crate::error::{Error, Result};
use crate::raster::svg::{parse_svg, pixmap_to_rgba_image, render_onto};

/// Edge length of the square icon.
pub const SIZE: u32 = 512;

/// Height of the white label bar at the bottom.
pub const BAR_HEIGHT: u32 = 107;

/// Height of the shadow strip above the label bar.
pub const SHADOW_HEIGHT: u32 = 10;

/// Label text color.
const TEXT_COLOR: &str = "#333333";

/// Corner radius shared by the background and the label bar.
pub fn corner_radius() -> f32 {
    (SIZE as f32 / 32.0).round()
}

/// Draws everything except the glyph.
pub fn draw_base(spec: &IconSpec) -> Result<RgbaImage> {
    let mut pixmap = Pixmap::new(SIZE, SIZE).ok_or(Error::Canvas {
        width: SIZE,
        height: SIZE,
    })?;

    draw_background(&mut pixmap, spec)?;
    draw_label_bar(&mut pixmap)?;
    draw_bar_shadow(&mut pixmap)?;
    draw_label(&mut pixmap, spec.label())?;

    Ok(pixmap_to_rgba_image(&pixmap))
}

fn fill(pixmap: &mut Pixmap, path: &Path, shader: Shader<'_>) {
    let paint = Paint {
        shader,
        anti_alias: true,
        ..Default::default()
    };
    pixmap.fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
}

fn finish(pb: PathBuilder, shape: &'static str) -> Result<Path> {
    pb.finish().ok_or(Error::Outline(shape))
}

/// Rounded square filled with the diagonal gradient.
fn draw_background(pixmap: &mut Pixmap, spec: &IconSpec) -> Result<()> {
    let s = SIZE as f32;
    let r = corner_radius();

    let mut pb = PathBuilder::new();
    pb.move_to(r, 0.0);
    pb.line_to(s - r, 0.0);
    pb.quad_to(s, 0.0, s, r);
    pb.line_to(s, s - r);
    pb.quad_to(s, s, s - r, s);
    pb.line_to(r, s);
    pb.quad_to(0.0, s, 0.0, s - r);
    pb.line_to(0.0, r);
    pb.quad_to(0.0, 0.0, r, 0.0);
    pb.close();
    let path = finish(pb, "background")?;

    let gradient = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(s, s),
        vec![
            GradientStop::new(0.0, spec.start.to_color()),
            GradientStop::new(1.0, spec.end.to_color()),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    )
    .unwrap_or(Shader::SolidColor(spec.start.to_color()));

    fill(pixmap, &path, gradient);
    Ok(())
}

/// White bar with square top corners and rounded bottom corners.
fn draw_label_bar(pixmap: &mut Pixmap) -> Result<()> {
    let s = SIZE as f32;
    let r = corner_radius();
    let top = s - BAR_HEIGHT as f32;

    let mut pb = PathBuilder::new();
    pb.move_to(0.0, top);
    pb.line_to(s, top);
    pb.line_to(s, s - r);
    pb.quad_to(s, s, s - r, s);
    pb.line_to(r, s);
    pb.quad_to(0.0, s, 0.0, s - r);
    pb.line_to(0.0, top);
    pb.close();
    let path = finish(pb, "label bar")?;

    fill(pixmap, &path, Shader::SolidColor(Color::WHITE));
    Ok(())
}

/// Fade from transparent to half-opaque black, ending at the bar's top edge.
fn draw_bar_shadow(pixmap: &mut Pixmap) -> Result<()> {
    let s = SIZE as f32;
    let bottom = s - BAR_HEIGHT as f32;
    let top = bottom - SHADOW_HEIGHT as f32;

    let mut pb = PathBuilder::new();
    pb.move_to(0.0, top);
    pb.line_to(s, top);
    pb.line_to(s, bottom);
    pb.line_to(0.0, bottom);
    pb.close();
    let path = finish(pb, "bar shadow")?;

    let gradient = LinearGradient::new(
        Point::from_xy(0.0, top),
        Point::from_xy(0.0, bottom),
        vec![
            GradientStop::new(0.0, Color::from_rgba8(0, 0, 0, 0)),
            GradientStop::new(1.0, Color::from_rgba8(0, 0, 0, 128)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    )
    .unwrap_or(Shader::SolidColor(Color::from_rgba8(0, 0, 0, 64)));

    fill(pixmap, &path, gradient);
    Ok(())
}

/// Inserts a space between every character.
pub fn letter_spaced(text: &str) -> String {
    let mut spaced = String::with_capacity(text.len() * 2);
    for (i, c) in text.chars().enumerate() {
        if i > 0 {
            spaced.push(' ');
        }
        spaced.push(c);
    }
    spaced
}

/// Font size of the label, half the bar height.
pub fn font_size() -> u32 {
    BAR_HEIGHT / 2
}

/// SVG document holding only the label, laid out on the full canvas.
pub fn label_svg(text: &str) -> String {
    let x = SIZE as f32 / 2.0;
    let y = SIZE as f32 - BAR_HEIGHT as f32 / 2.0;
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}"><text x="{x}" y="{y}" text-anchor="middle" dominant-baseline="central" font-family="sans-serif" font-weight="bold" font-size="{font}" fill="{color}" xml:space="preserve">{text}</text></svg>"#,
        size = SIZE,
        font = font_size(),
        color = TEXT_COLOR,
        text = xml_escape(&letter_spaced(text)),
    )
}

/// Draws the centered label. Missing fonts leave the bar empty.
fn draw_label(pixmap: &mut Pixmap, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let tree = parse_svg(&label_svg(text), true)?;
    if !tree.root().has_children() {
        tracing::warn!("no usable font found, label {:?} not drawn", text);
        return Ok(());
    }
    render_onto(&tree, pixmap);
    Ok(())
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
