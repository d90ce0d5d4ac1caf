use eyre::WrapErr;
use extension_scaffold::cli::{self, IconArgs};
use extension_scaffold::{IconPipeline, IconSpec, RasterHelper, logging};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    logging::init();
    color_eyre::install()?;

    let args: IconArgs = cli::parse_or_exit();

    let spec = match IconSpec::from_options(args.into_options()) {
        Ok(spec) => spec,
        Err(err) => {
            tracing::error!("Error: {}", err);
            tracing::error!("Usage: icon <#startColor> <#endColor> [svgPath] [outputPath] [text]");
            std::process::exit(1);
        }
    };

    let raster = RasterHelper::locate().wrap_err("icon: failed to locate raster helper")?;
    IconPipeline::new(raster)
        .generate(&spec)
        .await
        .wrap_err("Error generating icon")?;

    Ok(())
}
