//! Icon pipeline: gradient background, label bar and optional white glyph.
//!
//! The background is drawn in-process. Every raster step that touches files
//! (SVG rasterization, resizing, compositing, the final PNG write) goes
//! through the [`RasterHelper`], one process per step, awaited in order.
//!
//! # Example
//!
//! ```no_run
//! use extension_scaffold::{IconOptions, IconPipeline, IconSpec, RasterHelper};
//!
//! # async fn run() -> extension_scaffold::Result<()> {
//! let spec = IconSpec::from_options(
//!     IconOptions::new("#FF0000", "#0000FF")
//!         .glyph("assets/glyph.svg")
//!         .output("out/icon.png"),
//! )?;
//! let written = IconPipeline::new(RasterHelper::locate()?).generate(&spec).await?;
//! println!("{}", written.display());
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod color;
pub mod glyph;

pub use color::HexColor;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::geometry::SizePx;
use crate::raster::{self, Fit, RasterHelper, RasterJob};
use crate::scratch::ScratchDir;

/// Output file name when none is given.
pub const DEFAULT_OUTPUT: &str = "icon.png";

/// Label text when none is given.
pub const DEFAULT_LABEL: &str = "DEFAULTS";

// ============================================================================
// IconOptions / IconSpec
// ============================================================================

/// Unvalidated icon parameters, as given by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconOptions {
    pub start: String,
    pub end: String,
    pub glyph: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub text: Option<String>,
}

impl IconOptions {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            ..Default::default()
        }
    }

    pub fn glyph(mut self, path: impl Into<PathBuf>) -> Self {
        self.glyph = Some(path.into());
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Validated parameters for one icon render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSpec {
    pub start: HexColor,
    pub end: HexColor,
    pub glyph: Option<PathBuf>,
    pub output: PathBuf,
    pub text: Option<String>,
}

impl IconSpec {
    /// Validates colors and the glyph path.
    pub fn from_options(options: IconOptions) -> Result<Self> {
        let start = options.start.parse()?;
        let end = options.end.parse()?;

        if let Some(glyph) = &options.glyph {
            if !glyph.exists() {
                return Err(Error::GlyphNotFound(glyph.clone()));
            }
            let is_svg = glyph
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
            if !is_svg {
                return Err(Error::NotAnSvg(glyph.clone()));
            }
        }

        Ok(Self {
            start,
            end,
            glyph: options.glyph,
            output: options.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            text: options.text.filter(|t| !t.is_empty()),
        })
    }

    pub fn label(&self) -> &str {
        self.text.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    /// Directory the output (and the scratch directory) lives in.
    pub fn output_dir(&self) -> &Path {
        match self.output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

// ============================================================================
// IconPipeline
// ============================================================================

pub struct IconPipeline {
    raster: RasterHelper,
}

impl IconPipeline {
    pub fn new(raster: RasterHelper) -> Self {
        Self { raster }
    }

    /// Renders the icon and returns the absolute output path.
    ///
    /// A glyph that fails to process is logged and left out; the icon is
    /// still written without it.
    #[tracing::instrument(level = "debug", skip_all, fields(output = %spec.output.display()))]
    pub async fn generate(&self, spec: &IconSpec) -> Result<PathBuf> {
        let base = canvas::draw_base(spec)?;

        let output_dir = spec.output_dir();
        fs::create_dir_all(output_dir).map_err(Error::io(format!(
            "error creating output directory {}",
            output_dir.display()
        )))?;
        let scratch = ScratchDir::create(output_dir)?;

        let mut done = false;
        if let Some(glyph) = &spec.glyph {
            match self.with_glyph(&base, glyph, &spec.output, &scratch).await {
                Ok(()) => done = true,
                Err(err) => tracing::error!("Error processing SVG: {}", err),
            }
        }
        if !done {
            self.without_glyph(&base, &spec.output, &scratch).await?;
        }

        scratch.close();

        let written = fs::canonicalize(&spec.output).map_err(Error::io(format!(
            "failed to resolve {}",
            spec.output.display()
        )))?;
        tracing::info!("Icon generated successfully at {}", written.display());
        Ok(written)
    }

    async fn without_glyph(
        &self,
        base: &image::RgbaImage,
        output: &Path,
        scratch: &ScratchDir,
    ) -> Result<()> {
        let temp_output = scratch.path("output.png");
        raster::save_png(base, &temp_output)?;
        self.raster.run(&RasterJob::save(&temp_output, output)).await
    }

    async fn with_glyph(
        &self,
        base: &image::RgbaImage,
        glyph_path: &Path,
        output: &Path,
        scratch: &ScratchDir,
    ) -> Result<()> {
        let svg_data = fs::read_to_string(glyph_path).map_err(Error::io(format!(
            "failed to read {}",
            glyph_path.display()
        )))?;

        let white_svg = scratch.path("white.svg");
        fs::write(&white_svg, glyph::whiten_svg(&svg_data))
            .map_err(Error::io(format!("failed to write {}", white_svg.display())))?;

        let white_png = scratch.path("white.png");
        self.raster
            .run(&RasterJob::process_svg(
                &white_svg,
                &white_png,
                glyph::available_size(),
            ))
            .await?;

        let (width, height) = image::image_dimensions(&white_png)?;
        let size = glyph::fitted_size(SizePx::new(width, height));
        let at = glyph::placement(size);

        let sized_png = scratch.path("white_glyph.png");
        self.raster
            .run(&RasterJob::resize(&white_png, &sized_png, size, Fit::Contain))
            .await?;

        let layer = glyph::glyph_layer(&raster::load(&sized_png)?, at);

        let main_png = scratch.path("main.png");
        let glyph_png = scratch.path("glyph.png");
        raster::save_png(base, &main_png)?;
        raster::save_png(&layer, &glyph_png)?;

        self.raster
            .run(&RasterJob::composite(&main_png, &glyph_png, output))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_svg(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "<svg/>").unwrap();
        path
    }

    #[test]
    fn defaults() {
        let spec = IconSpec::from_options(IconOptions::new("#FF0000", "#00F")).unwrap();
        assert_eq!(spec.output, PathBuf::from("icon.png"));
        assert_eq!(spec.output_dir(), Path::new("."));
        assert_eq!(spec.label(), "DEFAULTS");
        assert!(spec.glyph.is_none());
    }

    #[test]
    fn empty_text_falls_back_to_default() {
        let spec = IconSpec::from_options(IconOptions::new("#FF0000", "#00F").text("")).unwrap();
        assert_eq!(spec.label(), "DEFAULTS");
        let spec = IconSpec::from_options(IconOptions::new("#FF0000", "#00F").text("EXT")).unwrap();
        assert_eq!(spec.label(), "EXT");
    }

    #[test]
    fn invalid_colors_rejected() {
        let err = IconSpec::from_options(IconOptions::new("red", "#00F")).unwrap_err();
        assert!(matches!(err, Error::InvalidColor(ref c) if c == "red"));
        let err = IconSpec::from_options(IconOptions::new("#00F", "#12345")).unwrap_err();
        assert!(matches!(err, Error::InvalidColor(_)));
    }

    #[test]
    fn glyph_must_exist_and_be_svg() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.svg");
        let err = IconSpec::from_options(IconOptions::new("#000", "#FFF").glyph(&missing)).unwrap_err();
        assert!(matches!(err, Error::GlyphNotFound(_)));

        let png = dir.path().join("glyph.png");
        fs::write(&png, b"png").unwrap();
        let err = IconSpec::from_options(IconOptions::new("#000", "#FFF").glyph(&png)).unwrap_err();
        assert!(matches!(err, Error::NotAnSvg(_)));

        let upper = write_svg(dir.path(), "GLYPH.SVG");
        let spec = IconSpec::from_options(IconOptions::new("#000", "#FFF").glyph(&upper)).unwrap();
        assert_eq!(spec.glyph.as_deref(), Some(upper.as_path()));
    }

    #[test]
    fn output_dir_of_nested_output() {
        let spec = IconSpec::from_options(
            IconOptions::new("#000", "#FFF").output("out/nested/icon.png"),
        )
        .unwrap();
        assert_eq!(spec.output_dir(), Path::new("out/nested"));
    }
}
