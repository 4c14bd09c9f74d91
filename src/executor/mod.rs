//! Timed execution of the external transfer tool
//!
//! This module contains the process-launch side of the harness:
//! - `Invocation`, a program plus its arguments and per-child environment
//! - `CommandRunner`, the seam the experiment driver runs commands through
//! - `ProcessRunner`, which spawns real child processes and times them

use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;

/// A single external command: program, arguments and extra environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Variables set on the child only; the harness environment is untouched
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// `<program> run <manifest>`
    pub fn batch<P: Into<PathBuf>>(program: P, manifest: &Path) -> Self {
        Self::new(program)
            .arg("run")
            .arg(manifest.to_string_lossy())
    }

    /// `<program> rm <uri>/*`
    pub fn remove<P: Into<PathBuf>>(program: P, uri: &str) -> Self {
        Self::new(program)
            .arg("rm")
            .arg(format!("{}/*", uri.trim_end_matches('/')))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.envs {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs an invocation to completion and reports how long the child lived
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Elapsed wall-clock time of a successful run. Launch failures and
    /// unsuccessful exits are `AppError::Execution`.
    async fn run(&self, invocation: &Invocation) -> Result<Duration>;
}

/// Spawns real child processes, streaming their stdout and stderr to ours
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// Discard child output instead of streaming it
    quiet: bool,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner whose children write to /dev/null
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    fn stdout(&self) -> Stdio {
        if self.quiet {
            Stdio::null()
        } else {
            Stdio::inherit()
        }
    }

    /// The child's stderr joins our stdout, next to its regular output
    fn stderr(&self) -> Stdio {
        if self.quiet {
            Stdio::null()
        } else {
            Stdio::from(std::io::stdout())
        }
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<Duration> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .envs(invocation.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(self.stdout())
            .stderr(self.stderr());

        let started = Instant::now();
        let mut child = command.spawn().map_err(|e| {
            AppError::execution(format!(
                "failed to launch '{}': {}",
                invocation.program.display(),
                e
            ))
        })?;
        let status = child.wait().await.map_err(|e| {
            AppError::execution(format!(
                "failed to wait for '{}': {}",
                invocation.program.display(),
                e
            ))
        })?;
        let elapsed = started.elapsed();

        if status.success() {
            Ok(elapsed)
        } else {
            Err(AppError::execution(format!(
                "'{}' failed with {}",
                invocation,
                describe_status(status)
            )))
        }
    }
}
