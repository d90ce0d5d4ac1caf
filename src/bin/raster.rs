use extension_scaffold::cli::{self, RasterArgs};
use extension_scaffold::{RasterJob, logging};

fn main() {
    logging::init();

    let args: RasterArgs = cli::parse_or_exit();
    let job = RasterJob::new(args.operation, args.args);

    let result = job.parse().and_then(|op| {
        op.run()?;
        Ok(op)
    });
    match result {
        Ok(op) => tracing::info!("{} complete: {}", op.label(), op.output().display()),
        Err(err) => {
            tracing::error!("Error in raster operation: {}", err);
            std::process::exit(1);
        }
    }
}
