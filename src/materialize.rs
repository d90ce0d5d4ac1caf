//! Materializer: mirrors a template tree into an output directory.
//!
//! Files ending in [`TEMPLATE_SUFFIX`] are rendered with the configuration
//! as context and written without the suffix. Every other file is copied
//! byte for byte. Directories are mirrored before anything inside them is
//! written. Nothing is ever read back from the output tree.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::process::{self, ChildProcess, ExitStatus};
use crate::template::{self, TEMPLATE_SUFFIX};

/// Binary name of the icon pipeline.
pub const ICON_BIN: &str = "icon";

/// Environment variable overriding the icon binary's location.
pub const ICON_BIN_ENV: &str = "SCAFFOLD_ICON_BIN";

/// Name of the icon written at the output root.
pub const ICON_OUTPUT: &str = "icon.png";

// ============================================================================
// Entries
// ============================================================================

/// What the walk does with a directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    /// Rendered to the mirrored path minus the template suffix.
    Template { output_name: String },
    /// Copied to the mirrored path unchanged.
    Verbatim,
}

impl EntryKind {
    pub fn classify(is_dir: bool, file_name: &str) -> Self {
        if is_dir {
            return EntryKind::Directory;
        }
        match template::strip_template_suffix(file_name) {
            Some(stem) => EntryKind::Template {
                output_name: stem.to_owned(),
            },
            None => EntryKind::Verbatim,
        }
    }
}

/// Summary of one materialization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub directories: usize,
    pub rendered: usize,
    pub copied: usize,
    /// Relative paths of files that could not be produced.
    pub failed: Vec<PathBuf>,
}

impl MaterializeReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

// ============================================================================
// Materializer
// ============================================================================

pub struct Materializer<'a> {
    config: &'a Configuration,
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl<'a> Materializer<'a> {
    pub fn new(
        config: &'a Configuration,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Walks the input tree.
    ///
    /// Only failing to create the output root is fatal. A file that cannot
    /// be rendered or copied is logged and listed in the report, and the
    /// walk moves on.
    pub fn run(&self) -> Result<MaterializeReport> {
        fs::create_dir_all(&self.output_dir).map_err(Error::io(format!(
            "failed to create output directory {}",
            self.output_dir.display()
        )))?;

        let mut report = MaterializeReport::default();
        if self.input_dir.exists() {
            self.walk(&mut report);
        } else {
            tracing::info!("Creating directory: {}", self.input_dir.display());
            if let Err(err) = fs::create_dir_all(&self.input_dir) {
                tracing::error!("Error creating {}: {}", self.input_dir.display(), err);
            }
        }
        tracing::debug!(?report, "materialization finished");
        Ok(report)
    }

    /// Pre-order walk in file name order, so every directory is mirrored
    /// before its contents. Symlinks are followed; a link back into one of
    /// its ancestors is reported as a failure and not descended into.
    fn walk(&self, report: &mut MaterializeReport) {
        let mut entries = WalkDir::new(&self.input_dir)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let relative = err.path().map(|path| self.relative(path)).unwrap_or_default();
                    tracing::error!("Error reading {}: {}", relative.display(), err);
                    report.failed.push(relative);
                    continue;
                }
            };

            let relative = self.relative(entry.path());
            let file_type = entry.file_type();
            let file_name = entry.file_name().to_string_lossy();

            let result = match EntryKind::classify(file_type.is_dir(), &file_name) {
                EntryKind::Directory => {
                    let target = self.output_dir.join(&relative);
                    match fs::create_dir_all(&target) {
                        Ok(()) => {
                            report.directories += 1;
                            Ok(())
                        }
                        Err(err) => {
                            entries.skip_current_dir();
                            Err(Error::io(format!("failed to create {}", target.display()))(err))
                        }
                    }
                }
                EntryKind::Template { output_name } => {
                    let target = self.output_dir.join(relative.with_file_name(output_name));
                    self.render(entry.path(), &relative, &target).map(|()| {
                        tracing::info!("Rendered {} → {}", relative.display(), target.display());
                        report.rendered += 1;
                    })
                }
                EntryKind::Verbatim if file_type.is_file() => {
                    let target = self.output_dir.join(&relative);
                    copy(entry.path(), &target).map(|()| {
                        tracing::info!("Copied {} → {}", relative.display(), target.display());
                        report.copied += 1;
                    })
                }
                EntryKind::Verbatim => {
                    tracing::debug!("skipping special file {}", relative.display());
                    Ok(())
                }
            };

            if let Err(err) = result {
                match &err {
                    Error::Render { source, .. } => tracing::error!(
                        "Error rendering {}: {}",
                        relative.display(),
                        template::describe(source)
                    ),
                    other => tracing::error!("Error processing {}: {}", relative.display(), other),
                }
                report.failed.push(relative);
            }
        }
    }

    fn render(&self, input: &Path, relative: &Path, target: &Path) -> Result<()> {
        let source = fs::read_to_string(input)
            .map_err(Error::io(format!("failed to read {}", input.display())))?;
        let name = relative.to_string_lossy();
        let rendered = template::render_template(&name, &source, self.config.values())?;
        ensure_parent(target)?;
        fs::write(target, rendered).map_err(Error::io(format!("failed to write {}", target.display())))
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.input_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

fn ensure_parent(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .map_err(Error::io(format!("failed to create {}", parent.display())))?;
    }
    Ok(())
}

fn copy(input: &Path, target: &Path) -> Result<()> {
    ensure_parent(target)?;
    fs::copy(input, target)
        .map(|_| ())
        .map_err(Error::io(format!("failed to copy {}", input.display())))
}

// ============================================================================
// Icon trigger
// ============================================================================

/// A detached icon generation run.
///
/// Dropping the handle leaves the child running; [`wait`](Self::wait)
/// collects its status. Either way the materialized files are unaffected.
#[derive(Debug)]
pub struct IconJob {
    output: PathBuf,
    child: ChildProcess,
}

impl IconJob {
    /// The icon path the child was asked to write.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Waits for the child and logs the outcome.
    pub async fn wait(self) -> Result<ExitStatus> {
        let output = self.child.wait().await?;
        if output.status.success() {
            tracing::info!("Icon generated successfully: {}", self.output.display());
        } else {
            tracing::error!("Icon generation failed: {}", output.status.message());
        }
        Ok(output.status)
    }
}

/// Arguments handed to the icon binary, if the configuration asks for an icon.
///
/// Needs `icon.background` with two colors and a `glyph.svg` next to
/// `config.json`.
pub fn icon_arguments(config: &Configuration, output_dir: &Path) -> Option<Vec<String>> {
    let Some((start, end)) = config.icon_background() else {
        tracing::info!(
            "Skipping icon generation: icon background colors not found in config.json"
        );
        return None;
    };
    let glyph = config.glyph_path();
    if !glyph.exists() {
        tracing::info!(
            "Skipping icon generation: glyph.svg not found in {}",
            config.dir().display()
        );
        return None;
    }
    Some(vec![
        start,
        end,
        glyph.to_string_lossy().into_owned(),
        output_dir.join(ICON_OUTPUT).to_string_lossy().into_owned(),
    ])
}

/// Starts the icon binary in the background when the configuration asks
/// for an icon. Its output is relayed to the log as it arrives.
pub fn spawn_icon_job(
    icon_bin: &Path,
    config: &Configuration,
    output_dir: &Path,
) -> Result<Option<IconJob>> {
    let Some(args) = icon_arguments(config, output_dir) else {
        return Ok(None);
    };

    tracing::info!("Generating icon...");
    let child = ChildProcess::spawn(
        icon_bin,
        &args,
        |line| tracing::info!("icon: {}", line),
        |line| tracing::error!("icon error: {}", line),
    )?;
    Ok(Some(IconJob {
        output: output_dir.join(ICON_OUTPUT),
        child,
    }))
}

/// The icon binary installed next to the running executable.
pub fn locate_icon_binary() -> Result<PathBuf> {
    process::sibling_binary(ICON_BIN, std::env::var_os(ICON_BIN_ENV))
}
