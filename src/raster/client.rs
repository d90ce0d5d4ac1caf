//! Runs raster jobs in the out-of-process helper.

use std::path::PathBuf;

use super::RasterJob;
use crate::error::{Error, Result};
use crate::process::{self, ChildProcess};

/// Binary name of the raster helper.
pub const RASTER_BIN: &str = "raster";

/// Environment variable overriding the helper's location.
pub const RASTER_BIN_ENV: &str = "SCAFFOLD_RASTER_BIN";

/// Handle to the raster helper binary.
///
/// Every [`run`](Self::run) starts a new process; nothing is shared between
/// jobs.
#[derive(Debug, Clone)]
pub struct RasterHelper {
    program: PathBuf,
}

impl RasterHelper {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The helper installed next to the running executable.
    pub fn locate() -> Result<Self> {
        Ok(Self::new(process::sibling_binary(RASTER_BIN, std::env::var_os(RASTER_BIN_ENV))?))
    }

    /// Runs one job to completion.
    ///
    /// The helper's stdout is relayed to the log; its stderr is returned in
    /// the error when it exits unsuccessfully.
    #[tracing::instrument(level = "debug", skip(self), fields(operation = %job.operation))]
    pub async fn run(&self, job: &RasterJob) -> Result<()> {
        tracing::debug!("raster {}", job);
        let child = ChildProcess::spawn(
            &self.program,
            std::iter::once(job.operation.as_str()).chain(job.args.iter().map(String::as_str)),
            |line| tracing::info!("{}", line),
            |_| {},
        )?;
        let output = child.wait().await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::RasterFailed {
                operation: job.operation.clone(),
                status: output.status,
                stderr: output.stderr.join("\n"),
            })
        }
    }
}
