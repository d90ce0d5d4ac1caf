//! Error type shared by the materializer, the icon pipeline and the raster helper.

use std::path::PathBuf;

use crate::process::ExitStatus;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config.json not found in {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("error reading or parsing data file {}: {reason}", path.display())]
    ConfigParse { path: PathBuf, reason: String },

    #[error("error rendering {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("colors must be valid hex values (e.g., #FF5500 or #F50), got {0:?}")]
    InvalidColor(String),

    #[error("SVG file not found: {}", .0.display())]
    GlyphNotFound(PathBuf),

    #[error("file is not an SVG: {}", .0.display())]
    NotAnSvg(PathBuf),

    #[error("failed to parse SVG: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("failed to allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("failed to build the {0} outline")]
    Outline(&'static str),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("{operation} operation requires {expected} arguments: {names}")]
    Arity {
        operation: &'static str,
        expected: usize,
        names: &'static str,
    },

    #[error("invalid {what}: {value:?}")]
    InvalidArgument { what: &'static str, value: String },

    #[error("raster operation {operation} failed: {}: {stderr}", status.message())]
    RasterFailed {
        operation: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wraps an I/O error together with the operation that produced it.
    pub fn io(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| Self::Io { context, source }
    }
}
