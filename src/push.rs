use std::path;

use chrono::DateTime;
use chrono::Utc;
use futures_util::future::join_all;
use serde::Serialize;
use serde::Serializer;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::App;
use crate::error::DeployError;
use crate::logs;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;
use crate::remote_spec::RemoteSpec;
use crate::store::Target;
use crate::store::TargetStore;

// -----------------------------------------------------------------------------
// Types

#[derive(Debug, Clone, Copy, Default)]
pub struct PushOptions {
    /// Pass `--force` to every push.
    pub force: bool,
    /// Launch all pushes at once instead of one after another.
    pub concurrent: bool,
}

/// Outcome of a single push attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum PushStatus {
    Pending,
    /// The push ran and exited with this status.
    Exited(i32),
    /// The push never ran: the log could not be created or git could not be spawned.
    LaunchFailed(String),
}

/// One push of the target's branch to one remote.
#[derive(Debug, Clone, Serialize)]
pub struct PushAttempt {
    /// Position of the remote in the target's list.
    pub ordinal: usize,
    pub remote_name: String,
    pub remote_branch: String,
    pub force: bool,
    pub log_path: path::PathBuf,
    pub status: PushStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Aggregate of every attempt made by one push invocation.
#[derive(Debug, Serialize)]
pub struct PushResult {
    pub branch_name: String,
    pub attempts: Vec<PushAttempt>,
    pub overall_success: bool,
    /// Why the push stopped before any attempt was launched.
    #[serde(serialize_with = "serialize_abort")]
    pub abort: Option<DeployError>,
}

/// Everything a unit of work needs, owned so no worker shares loop state.
#[derive(Debug, Clone)]
struct PushJob {
    ordinal: usize,
    spec: RemoteSpec,
    log_path: path::PathBuf,
}

// -----------------------------------------------------------------------------
// PushAttempt impl

impl PushAttempt {
    fn start(job: &PushJob, force: bool) -> Self {
        Self {
            ordinal: job.ordinal,
            remote_name: job.spec.remote_name.clone(),
            remote_branch: job.spec.remote_branch.clone(),
            force,
            log_path: job.log_path.clone(),
            status: PushStatus::Pending,
            started_at: Some(Utc::now()),
            finished_at: None,
        }
    }

    fn finish(&mut self, status: PushStatus) {
        debug_assert_eq!(self.status, PushStatus::Pending, "attempt finished twice");
        self.status = status;
        self.finished_at = Some(Utc::now());
    }

    pub fn exit_status(&self) -> Option<i32> {
        match self.status {
            PushStatus::Exited(code) => Some(code),
            _ => None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_status() == Some(0)
    }

    /// The failure this attempt contributes to the aggregate, if any.
    pub fn failure(&self) -> Option<DeployError> {
        match &self.status {
            PushStatus::Exited(0) => None,
            PushStatus::Exited(code) => Some(DeployError::RemotePushFailed {
                remote: self.remote_name.clone(),
                exit_status: *code,
            }),
            PushStatus::LaunchFailed(reason) => Some(DeployError::Git(anyhow::anyhow!(
                "Push to {} could not be started: {}",
                self.remote_name,
                reason
            ))),
            PushStatus::Pending => Some(DeployError::Git(anyhow::anyhow!(
                "Push to {} never finished",
                self.remote_name
            ))),
        }
    }
}

// -----------------------------------------------------------------------------
// PushResult impl

impl PushResult {
    fn aborted(branch_name: &str, abort: DeployError) -> Self {
        Self {
            branch_name: branch_name.to_string(),
            attempts: vec![],
            overall_success: false,
            abort: Some(abort),
        }
    }

    fn aggregate(branch_name: &str, attempts: Vec<PushAttempt>) -> Self {
        let overall_success = attempts.iter().all(PushAttempt::succeeded);
        Self {
            branch_name: branch_name.to_string(),
            attempts,
            overall_success,
            abort: None,
        }
    }

    pub fn failed_attempts(&self) -> impl Iterator<Item = &PushAttempt> {
        self.attempts.iter().filter(|a| !a.succeeded())
    }
}

fn serialize_abort<S: Serializer>(abort: &Option<DeployError>, s: S) -> Result<S::Ok, S::Error> {
    match abort {
        Some(e) => s.serialize_some(&e.to_string()),
        None => s.serialize_none(),
    }
}

// -----------------------------------------------------------------------------
// Orchestrator

impl<G: GitOps, P: Prompter> App<G, P> {
    /// Push a target's branch to every one of its remotes.
    ///
    /// Fails fast, with zero attempts, when the target is unknown, the
    /// preconditions do not hold or the checkout fails. Otherwise every
    /// remote is attempted exactly once regardless of other remotes'
    /// failures, and the result is successful iff every push exited 0.
    #[instrument(
        skip_all,
        fields(branch = %branch, force = opts.force, concurrent = opts.concurrent)
    )]
    pub async fn push(
        &self,
        store: &TargetStore,
        branch: &str,
        opts: PushOptions,
    ) -> PushResult {
        let target = match self.prepare_push(store, branch).await {
            Ok(target) => target,
            Err(e) => {
                warn!("push aborted: {e}");
                return PushResult::aborted(branch, e);
            }
        };

        let local_branch = target.branch_name.as_str();
        let jobs = self.plan_jobs(target);

        let attempts = if opts.concurrent {
            join_all(
                jobs.into_iter()
                    .map(|job| self.run_attempt(job, local_branch, opts.force)),
            )
            .await
        } else {
            let mut attempts = Vec::with_capacity(jobs.len());
            for job in jobs {
                attempts.push(self.run_attempt(job, local_branch, opts.force).await);
            }
            attempts
        };

        let result = PushResult::aggregate(local_branch, attempts);
        info!(
            "pushed {} to {} remote(s), {} failed",
            local_branch,
            result.attempts.len(),
            result.failed_attempts().count()
        );
        result
    }

    async fn prepare_push<'a>(
        &self,
        store: &'a TargetStore,
        branch: &str,
    ) -> Result<&'a Target, DeployError> {
        let target = store.get(branch).ok_or_else(|| DeployError::UnknownTarget {
            branch: branch.to_string(),
        })?;

        self.check_preconditions(branch).await?;

        info!("checking out {branch} branch");
        self.git
            .checkout(branch)
            .await
            .map_err(|e| DeployError::CheckoutFailed {
                branch: branch.to_string(),
                reason: format!("{e:#}"),
            })?;

        Ok(target)
    }

    fn plan_jobs(&self, target: &Target) -> Vec<PushJob> {
        let log_dir = self.config.log_dir(&target.branch_name);
        let log_paths = logs::assign_log_paths(&log_dir, &target.remotes);

        target
            .remotes
            .iter()
            .zip(log_paths)
            .enumerate()
            .map(|(ordinal, (spec, log_path))| PushJob {
                ordinal,
                spec: spec.clone(),
                log_path,
            })
            .collect()
    }

    async fn run_attempt(&self, job: PushJob, local_branch: &str, force: bool) -> PushAttempt {
        let mut attempt = PushAttempt::start(&job, force);
        info!(
            "process {}: pushing {} local branch to {}, logging output to {}",
            job.ordinal,
            local_branch,
            job.spec,
            job.log_path.display()
        );

        let status = match logs::open_log(&job.log_path).await {
            Ok(log) => match self.git.push(&job.spec, local_branch, force, log).await {
                Ok(code) => PushStatus::Exited(code),
                Err(e) => PushStatus::LaunchFailed(format!("{e:#}")),
            },
            Err(e) => PushStatus::LaunchFailed(format!("{e:#}")),
        };
        attempt.finish(status);

        match &attempt.status {
            PushStatus::Exited(code) => {
                info!("process {} finished with exit code {}", job.ordinal, code)
            }
            PushStatus::LaunchFailed(reason) => {
                warn!("process {} could not start: {}", job.ordinal, reason)
            }
            PushStatus::Pending => {}
        }
        attempt
    }
}
