//! Raster helper: one raster operation per process.
//!
//! A [`RasterJob`] is an operation name plus positional string arguments,
//! exactly what the `raster` binary receives on its command line. The icon
//! pipeline builds jobs and hands them to a [`RasterHelper`], which runs each
//! one in a fresh child process and reports success by exit code. The
//! helper binary parses the job into a [`RasterOp`] and executes it.
//!
//! | operation    | arguments                              |
//! |--------------|----------------------------------------|
//! | `composite`  | base, overlay, output                  |
//! | `resize`     | input, output, width, height, fit      |
//! | `tint`       | input, output                          |
//! | `save`       | input, output                          |
//! | `processSvg` | input, output, width, height           |

pub mod client;
pub mod compose;
pub mod svg;

pub use client::RasterHelper;
pub use compose::Fit;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::{Error, Result};
use crate::geometry::SizePx;

// ============================================================================
// RasterJob
// ============================================================================

/// An untyped raster request as it travels across the process boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterJob {
    pub operation: String,
    pub args: Vec<String>,
}

impl RasterJob {
    pub fn new(operation: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            operation: operation.into(),
            args,
        }
    }

    pub fn composite(base: &Path, overlay: &Path, output: &Path) -> Self {
        Self::new("composite", vec![arg(base), arg(overlay), arg(output)])
    }

    pub fn resize(input: &Path, output: &Path, size: SizePx, fit: Fit) -> Self {
        Self::new(
            "resize",
            vec![
                arg(input),
                arg(output),
                size.width.to_string(),
                size.height.to_string(),
                fit.as_str().to_owned(),
            ],
        )
    }

    pub fn tint(input: &Path, output: &Path) -> Self {
        Self::new("tint", vec![arg(input), arg(output)])
    }

    pub fn save(input: &Path, output: &Path) -> Self {
        Self::new("save", vec![arg(input), arg(output)])
    }

    pub fn process_svg(input: &Path, output: &Path, bounds: SizePx) -> Self {
        Self::new(
            "processSvg",
            vec![
                arg(input),
                arg(output),
                bounds.width.to_string(),
                bounds.height.to_string(),
            ],
        )
    }

    /// Validates the arity and argument types for the named operation.
    pub fn parse(&self) -> Result<RasterOp> {
        let a = &self.args;
        let op = match self.operation.as_str() {
            "composite" => {
                self.expect("composite", 3, "baseImagePath, overlayImagePath, outputPath")?;
                RasterOp::Composite {
                    base: a[0].clone().into(),
                    overlay: a[1].clone().into(),
                    output: a[2].clone().into(),
                }
            }
            "resize" => {
                self.expect("resize", 5, "inputPath, outputPath, width, height, fit")?;
                RasterOp::Resize {
                    input: a[0].clone().into(),
                    output: a[1].clone().into(),
                    size: parse_size(&a[2], &a[3])?,
                    fit: a[4].parse()?,
                }
            }
            "tint" => {
                self.expect("tint", 2, "inputPath, outputPath")?;
                RasterOp::Tint {
                    input: a[0].clone().into(),
                    output: a[1].clone().into(),
                }
            }
            "save" => {
                self.expect("save", 2, "inputPath, outputPath")?;
                RasterOp::Save {
                    input: a[0].clone().into(),
                    output: a[1].clone().into(),
                }
            }
            "processSvg" => {
                self.expect("processSvg", 4, "svgPath, outputPath, width, height")?;
                RasterOp::ProcessSvg {
                    input: a[0].clone().into(),
                    output: a[1].clone().into(),
                    bounds: parse_size(&a[2], &a[3])?,
                }
            }
            other => return Err(Error::UnknownOperation(other.to_owned())),
        };
        Ok(op)
    }

    fn expect(&self, operation: &'static str, expected: usize, names: &'static str) -> Result<()> {
        if self.args.len() == expected {
            return Ok(());
        }
        Err(Error::Arity {
            operation,
            expected,
            names,
        })
    }
}

impl fmt::Display for RasterJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operation)?;
        for a in &self.args {
            write!(f, " {}", a)?;
        }
        Ok(())
    }
}

fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn parse_size(width: &str, height: &str) -> Result<SizePx> {
    let parse = |what: &'static str, value: &str| -> Result<u32> {
        match value.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(Error::InvalidArgument {
                what,
                value: value.to_owned(),
            }),
        }
    };
    Ok(SizePx::new(parse("width", width)?, parse("height", height)?))
}

// ============================================================================
// RasterOp
// ============================================================================

/// A validated raster operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterOp {
    Composite {
        base: PathBuf,
        overlay: PathBuf,
        output: PathBuf,
    },
    Resize {
        input: PathBuf,
        output: PathBuf,
        size: SizePx,
        fit: Fit,
    },
    Tint {
        input: PathBuf,
        output: PathBuf,
    },
    Save {
        input: PathBuf,
        output: PathBuf,
    },
    ProcessSvg {
        input: PathBuf,
        output: PathBuf,
        bounds: SizePx,
    },
}

impl RasterOp {
    /// Human readable name used in completion messages.
    pub fn label(&self) -> &'static str {
        match self {
            RasterOp::Composite { .. } => "Composite",
            RasterOp::Resize { .. } => "Resize",
            RasterOp::Tint { .. } => "Tint",
            RasterOp::Save { .. } => "Save",
            RasterOp::ProcessSvg { .. } => "Process SVG",
        }
    }

    pub fn output(&self) -> &Path {
        match self {
            RasterOp::Composite { output, .. }
            | RasterOp::Resize { output, .. }
            | RasterOp::Tint { output, .. }
            | RasterOp::Save { output, .. }
            | RasterOp::ProcessSvg { output, .. } => output,
        }
    }

    /// Executes the operation, writing a PNG to its output path.
    pub fn run(&self) -> Result<()> {
        let image = match self {
            RasterOp::Composite { base, overlay, .. } => {
                let mut base = load(base)?;
                let overlay = load(overlay)?;
                compose::composite_centered(&mut base, &overlay);
                base
            }
            RasterOp::Resize {
                input, size, fit, ..
            } => compose::resize(&load(input)?, *size, *fit),
            RasterOp::Tint { input, .. } => {
                let mut img = load(input)?;
                compose::tint_white(&mut img);
                img
            }
            RasterOp::Save { input, .. } => load(input)?,
            RasterOp::ProcessSvg { input, bounds, .. } => {
                let svg_data = fs::read_to_string(input)
                    .map_err(Error::io(format!("failed to read {}", input.display())))?;
                let mut img = svg::rasterize_svg(&svg_data, *bounds)?;
                compose::tint_white(&mut img);
                img
            }
        };
        save_png(&image, self.output())
    }
}

/// Loads any supported image format, with an alpha channel.
pub fn load(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)?.to_rgba8())
}

pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
