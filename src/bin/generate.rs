use eyre::WrapErr;
use extension_scaffold::cli::{self, GenerateArgs};
use extension_scaffold::{Configuration, Materializer, logging, materialize};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    logging::init();
    color_eyre::install()?;

    let args: GenerateArgs = cli::parse_or_exit();

    let config = Configuration::load(&args.config_dir)
        .wrap_err("generate: failed to load configuration")?;

    let report = Materializer::new(&config, &args.input_dir, &args.output_dir)
        .run()
        .wrap_err("generate: failed to materialize template")?;
    tracing::info!(
        "{} rendered, {} copied, {} directories",
        report.rendered,
        report.copied,
        report.directories
    );
    if !report.is_clean() {
        tracing::warn!("{} file(s) could not be generated", report.failed.len());
    }

    // Icon generation never changes the outcome of the run.
    let job = materialize::locate_icon_binary()
        .and_then(|icon_bin| materialize::spawn_icon_job(&icon_bin, &config, &args.output_dir));
    match job {
        Ok(Some(job)) => {
            if let Err(err) = job.wait().await {
                tracing::error!("Icon generation failed: {}", err);
            }
        }
        Ok(None) => {}
        Err(err) => tracing::error!("Icon generation failed: {}", err),
    }

    Ok(())
}
