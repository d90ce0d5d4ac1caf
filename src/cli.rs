//! Command line adapters shared by the binaries.

use std::path::PathBuf;

use clap::Parser;

use crate::icon::IconOptions;

/// Parses the command line, exiting with status 1 on usage errors.
///
/// `--help` and `--version` still exit successfully.
pub fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(parsed) => parsed,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    }
}

/// Positional arguments of the `icon` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "icon",
    about = "Generate a gradient extension icon",
    override_usage = "icon <#startColor> <#endColor> [svgPath] [outputPath] [text]"
)]
pub struct IconArgs {
    /// Gradient start color, top left (#RGB or #RRGGBB)
    #[arg(value_name = "#startColor", allow_hyphen_values = true)]
    pub start: String,

    /// Gradient end color, bottom right (#RGB or #RRGGBB)
    #[arg(value_name = "#endColor", allow_hyphen_values = true)]
    pub end: String,

    /// SVG glyph drawn in white on the gradient
    #[arg(value_name = "svgPath")]
    pub svg_path: Option<String>,

    /// Where to write the PNG [default: icon.png]
    #[arg(value_name = "outputPath")]
    pub output_path: Option<String>,

    /// Label text in the white bar [default: DEFAULTS]
    #[arg(value_name = "text")]
    pub text: Option<String>,
}

impl IconArgs {
    /// Maps the positional arguments onto [`IconOptions`].
    ///
    /// A third argument starting with `#` is taken as the output path rather
    /// than a glyph, and anything after it is ignored.
    pub fn into_options(self) -> IconOptions {
        let mut options = IconOptions::new(self.start, self.end);
        match self.svg_path {
            Some(third) if third.starts_with('#') => {
                options.output = Some(PathBuf::from(third));
                return options;
            }
            Some(svg) if !svg.is_empty() => options.glyph = Some(PathBuf::from(svg)),
            _ => {}
        }
        options.output = self.output_path.map(PathBuf::from);
        options.text = self.text;
        options
    }
}

/// Arguments of the `generate` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "generate",
    about = "Render a template directory into an extension scaffold"
)]
pub struct GenerateArgs {
    /// Directory containing config.json (and optionally glyph.svg)
    #[arg(value_name = "config_dir")]
    pub config_dir: PathBuf,

    /// Template directory to mirror
    #[arg(value_name = "input_dir", default_value = "./template")]
    pub input_dir: PathBuf,

    /// Directory the scaffold is written to
    #[arg(value_name = "output_dir", default_value = "./output")]
    pub output_dir: PathBuf,
}

/// Arguments of the `raster` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "raster",
    about = "Run a single raster operation",
    after_help = "Operations: composite, resize, tint, save, processSvg"
)]
pub struct RasterArgs {
    /// Operation name
    pub operation: String,

    /// Operation arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(args: &[&str]) -> IconOptions {
        IconArgs::try_parse_from(std::iter::once("icon").chain(args.iter().copied()))
            .unwrap()
            .into_options()
    }

    #[test]
    fn icon_positional_arguments() {
        let options = icon(&["#F00", "#00F", "glyph.svg", "out/icon.png", "EXT"]);
        assert_eq!(options.start, "#F00");
        assert_eq!(options.end, "#00F");
        assert_eq!(options.glyph, Some(PathBuf::from("glyph.svg")));
        assert_eq!(options.output, Some(PathBuf::from("out/icon.png")));
        assert_eq!(options.text.as_deref(), Some("EXT"));
    }

    #[test]
    fn icon_colors_only() {
        let options = icon(&["#F00", "#00F"]);
        assert_eq!(options, IconOptions::new("#F00", "#00F"));
    }

    #[test]
    fn hash_third_argument_is_an_output_path() {
        let options = icon(&["#F00", "#00F", "#out.png", "ignored.png", "IGNORED"]);
        assert_eq!(options.glyph, None);
        assert_eq!(options.output, Some(PathBuf::from("#out.png")));
        assert_eq!(options.text, None);
    }

    #[test]
    fn icon_needs_two_colors() {
        assert!(IconArgs::try_parse_from(["icon", "#F00"]).is_err());
    }

    #[test]
    fn generate_defaults() {
        let args = GenerateArgs::try_parse_from(["generate", "cfg"]).unwrap();
        assert_eq!(args.config_dir, PathBuf::from("cfg"));
        assert_eq!(args.input_dir, PathBuf::from("./template"));
        assert_eq!(args.output_dir, PathBuf::from("./output"));
        assert!(GenerateArgs::try_parse_from(["generate"]).is_err());
    }

    #[test]
    fn raster_collects_operation_arguments() {
        let args = RasterArgs::try_parse_from(["raster", "resize", "a.png", "b.png", "10", "10", "fill"])
            .unwrap();
        assert_eq!(args.operation, "resize");
        assert_eq!(args.args.len(), 5);
    }
}
