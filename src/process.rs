//! Child process plumbing shared by the icon trigger and the raster client.
//!
//! Children are spawned with piped output streams. Each stream is drained by
//! its own task so a chatty child never blocks on a full pipe. There is no
//! timeout: a child that never exits stalls whoever awaits it.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum ExitStatus {
    Successful,
    Failed(Option<i32>),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        self == &ExitStatus::Successful
    }

    pub fn message(&self) -> String {
        match self {
            ExitStatus::Successful => "process exited successfully".to_owned(),
            ExitStatus::Failed(Some(code)) => format!("process exited with code {}", code),
            ExitStatus::Failed(None) => "process exited with unknown error status".to_owned(),
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            ExitStatus::Successful
        } else {
            ExitStatus::Failed(status.code())
        }
    }
}

/// A spawned child whose output streams are being drained in the background.
#[derive(Debug)]
pub struct ChildProcess {
    program: PathBuf,
    child: Child,
    stdout: JoinHandle<Vec<String>>,
    stderr: JoinHandle<Vec<String>>,
}

/// What a child left behind once it exited.
#[derive(Debug, Clone)]
pub struct ChildOutput {
    pub status: ExitStatus,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl ChildProcess {
    /// Spawns `program` with `args`. Every output line is handed to the
    /// matching callback as it arrives, and also collected for [`wait`](Self::wait).
    pub fn spawn<I, S>(
        program: &Path,
        args: I,
        on_stdout: fn(&str),
        on_stderr: fn(&str),
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                program: program.to_owned(),
                source,
            })?;

        let stdout = drain_lines(child.stdout.take(), on_stdout);
        let stderr = drain_lines(child.stderr.take(), on_stderr);

        Ok(Self {
            program: program.to_owned(),
            child,
            stdout,
            stderr,
        })
    }

    #[tracing::instrument(level = "debug", skip_all, fields(program = %self.program.display(), pid = self.child.id()))]
    pub async fn wait(mut self) -> Result<ChildOutput> {
        let status = self
            .child
            .wait()
            .await
            .map_err(Error::io(format!("failed to wait for {}", self.program.display())))?;
        tracing::debug!(?status, "child exited");

        Ok(ChildOutput {
            status: status.into(),
            stdout: self.stdout.await.unwrap_or_default(),
            stderr: self.stderr.await.unwrap_or_default(),
        })
    }
}

fn drain_lines<R>(stream: Option<R>, on_line: fn(&str)) -> JoinHandle<Vec<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut collected = Vec::new();
        let Some(stream) = stream else {
            return collected;
        };
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        // Invalid UTF-8 is replaced, not fatal.
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            on_line(line);
            collected.push(line.to_owned());
        }
        collected
    })
}

/// Locates a sibling binary of the running executable.
///
/// `explicit` wins when given, usually read from an environment variable by
/// the caller.
pub fn sibling_binary(name: &str, explicit: Option<OsString>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(path));
    }
    let exe = std::env::current_exe().map_err(Error::io("failed to locate current executable"))?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(format!("{}{}", name, std::env::consts::EXE_SUFFIX)))
}
