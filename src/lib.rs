//! extension-scaffold: build-time tooling for a VS Code extension.
//!
//! Two pipelines, each behind its own binary:
//!
//! - the **materializer** (`generate`) mirrors a template directory into an
//!   output directory, rendering `.ejs` files with values from `config.json`
//!   and copying everything else unchanged;
//! - the **icon pipeline** (`icon`) draws a rounded gradient icon with a
//!   labelled bar and an optional white glyph. Raster steps run in the
//!   `raster` helper, one process per step.
//!
//! # Example
//!
//! ```no_run
//! use extension_scaffold::{Configuration, Materializer};
//! use std::path::Path;
//!
//! let config = Configuration::load(Path::new("my-extension"))?;
//! let report = Materializer::new(&config, "template", "output").run()?;
//! println!("{} rendered, {} copied", report.rendered, report.copied);
//! # Ok::<(), extension_scaffold::Error>(())
//! ```

mod error;
mod geometry;
mod scratch;

pub mod cli;
pub mod config;
pub mod icon;
pub mod logging;
pub mod materialize;
pub mod process;
pub mod raster;
pub mod template;

pub use config::Configuration;
pub use error::{Error, Result};
pub use geometry::{RectPx, SizePx};
pub use icon::{HexColor, IconOptions, IconPipeline, IconSpec};
pub use materialize::{IconJob, MaterializeReport, Materializer};
pub use raster::{Fit, RasterHelper, RasterJob, RasterOp};
pub use scratch::ScratchDir;
