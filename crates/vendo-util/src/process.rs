//! Running external command-line clients.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::errors::VendoError;

/// A command line to run, assembled fluently.
///
/// Version-control backends use [`CommandBuilder::run`], which turns a
/// non-zero exit into a [`VendoError::Vcs`] that carries the client's stderr.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
}

impl CommandBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Run in `dir` instead of the current directory.
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// The command line as a shell would show it.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run to completion and capture both output streams.
    pub fn exec(&self) -> Result<Output, VendoError> {
        self.command().output().map_err(|e| VendoError::Vcs {
            message: format!("cannot run {}: {e}", self.program),
        })
    }

    /// Run and return trimmed stdout, failing on a non-zero exit.
    pub fn run(&self) -> Result<String, VendoError> {
        let out = self.exec()?;
        if out.status.success() {
            return Ok(trimmed(&out.stdout));
        }
        let status = out
            .status
            .code()
            .map_or_else(|| "a signal".to_string(), |c| format!("status {c}"));
        Err(VendoError::Vcs {
            message: format!(
                "`{}` exited with {status}: {}",
                self.display(),
                trimmed(&out.stderr)
            ),
        })
    }

    /// Whether the command runs and exits successfully. Output is discarded.
    pub fn succeeds(&self) -> bool {
        self.command()
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }
}

fn trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}
