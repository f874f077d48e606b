#![allow(async_fn_in_trait)]

use std::fs::File;
use std::path;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::debug;

use crate::remote_spec::RemoteSpec;

// -----------------------------------------------------------------------------
// GitOps trait

/// Operations for interacting with Git
#[cfg_attr(test, automock)]
pub trait GitOps {
    /// True when neither the working tree nor the index has uncommitted changes.
    async fn is_working_tree_clean(&self) -> Result<bool>;
    async fn list_local_branches(&self) -> Result<Vec<String>>;
    async fn checkout(&self, branch: &str) -> Result<()>;

    /// Push `local_branch` to `spec`, writing combined stdout/stderr to `log`.
    /// Returns the exit status of the push; an `Err` means it never ran.
    async fn push(
        &self,
        spec: &RemoteSpec,
        local_branch: &str,
        force: bool,
        log: File,
    ) -> Result<i32>;

    async fn list_remotes(&self) -> Result<Vec<String>>;
}

// -----------------------------------------------------------------------------
// RealGit

/// Real implementation that calls the git CLI
pub struct RealGit {
    path: path::PathBuf,
}

impl RealGit {
    pub fn new(path: path::PathBuf) -> Self {
        Self { path }
    }

    fn command(&self, args: &[&str]) -> Command {
        debug!("calling command: git {}", args.join(" "));
        let mut command = Command::new("git");
        command.current_dir(&self.path).args(args);
        command
    }

    async fn output(&self, args: &[&str]) -> Result<String> {
        let output = self
            .command(args)
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            bail!(
                "git command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(String::from_utf8(output.stdout)?)
    }

    async fn succeeds(&self, args: &[&str]) -> Result<bool> {
        let status = self
            .command(args)
            .status()
            .await
            .context("Failed to execute git command")?;
        Ok(status.success())
    }
}

impl GitOps for RealGit {
    async fn is_working_tree_clean(&self) -> Result<bool> {
        // Exit code 1 from --quiet means there are differences
        Ok(self.succeeds(&["diff", "--quiet"]).await?
            && self.succeeds(&["diff", "--cached", "--quiet"]).await?)
    }

    async fn list_local_branches(&self) -> Result<Vec<String>> {
        let output = self.output(&["branch", "--list"]).await?;
        Ok(parse_branch_list(&output))
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        self.output(&["checkout", "--quiet", branch]).await?;
        Ok(())
    }

    async fn push(
        &self,
        spec: &RemoteSpec,
        local_branch: &str,
        force: bool,
        log: File,
    ) -> Result<i32> {
        let refspec = spec.refspec(local_branch);
        let mut args = vec!["push", spec.remote_name.as_str(), refspec.as_str()];
        if force {
            args.push("--force");
        }

        let stderr = log.try_clone().context("Failed to clone log file handle")?;
        let status = self
            .command(&args)
            .stdout(log)
            .stderr(stderr)
            .status()
            .await
            .context("Failed to execute git push")?;

        // Killed by a signal
        Ok(status.code().unwrap_or(-1))
    }

    async fn list_remotes(&self) -> Result<Vec<String>> {
        let output = self.output(&["remote"]).await?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Parse `git branch --list` output. Each line starts with a two-column
/// marker (`* `, `+ ` or two spaces) that is not part of the name.
pub fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.get(2..).unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
