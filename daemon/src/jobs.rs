use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use common::{JobListing, JobRecord};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::config::JobsConfig;

/// Where scheduled jobs come from. Fetched fresh on every call.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<JobRecord>>;
}

/// Runs an external command that prints a `{"jobs": [...]}` document.
pub struct CommandJobSource {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandJobSource {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &JobsConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone(), config.timeout())
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl JobSource for CommandJobSource {
    async fn list_jobs(&self) -> Result<Vec<JobRecord>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // Dropping the child on timeout kills it.
        cmd.kill_on_drop(true);

        let child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn `{}`", self.command_line()))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| anyhow!("`{}` timed out after {:?}", self.command_line(), self.timeout))?
            .with_context(|| format!("Failed to wait for `{}`", self.command_line()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("`{}` exited with {}: {}", self.command_line(), output.status, stderr.trim());
        }

        let listing: JobListing = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Unexpected output from `{}`", self.command_line()))?;
        log::debug!("`{}` listed {} jobs", self.command_line(), listing.jobs.len());
        Ok(listing.jobs)
    }
}
