use anyhow::Result;
use anyhow::bail;
use colored::Colorize;
use tracing::warn;

use crate::App;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;
use crate::push::PushAttempt;
use crate::push::PushOptions;
use crate::push::PushStatus;
use crate::store::Target;
use crate::store::TargetStore;

fn format_attempt(attempt: &PushAttempt) -> String {
    let destination = format!("{}:{}", attempt.remote_name, attempt.remote_branch);
    let log_path = attempt.log_path.display();
    match &attempt.status {
        PushStatus::Exited(0) => format!("{} {} -> {}", "ok".green(), destination, log_path),
        PushStatus::Exited(code) => format!(
            "{} {} (exit status {}) -> {}",
            "FAILED".red(),
            destination,
            code,
            log_path
        ),
        PushStatus::LaunchFailed(reason) => format!(
            "{} {} ({}) -> {}",
            "FAILED".red(),
            destination,
            reason,
            log_path
        ),
        PushStatus::Pending => format!("{} {}", "PENDING".yellow(), destination),
    }
}

impl<G: GitOps, P: Prompter> App<G, P> {
    /// Push a target and report each attempt. Fails if the push aborted or
    /// any remote failed.
    pub async fn cmd_push(
        &self,
        store: &TargetStore,
        branch: &str,
        opts: PushOptions,
        json: bool,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let branch = Target::normalize_branch(branch);
        let mut result = self.push(store, &branch, opts).await;

        if json {
            writeln!(stdout, "{}", serde_json::to_string_pretty(&result)?)?;
        } else {
            for attempt in &result.attempts {
                writeln!(stdout, "{}", format_attempt(attempt))?;
            }
        }

        if let Some(abort) = result.abort.take() {
            return Err(abort.into());
        }

        let failed = result.failed_attempts().count();
        for failure in result.failed_attempts().filter_map(PushAttempt::failure) {
            warn!("{failure}");
        }
        if failed > 0 {
            bail!(
                "Push of {} failed for {} of {} remote(s)",
                result.branch_name,
                failed,
                result.attempts.len()
            );
        }

        if !json {
            writeln!(
                stdout,
                "Pushed {} to {} remote(s)",
                result.branch_name,
                result.attempts.len()
            )?;
        }
        Ok(())
    }
}
