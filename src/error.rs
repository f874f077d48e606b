use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("No such deploy target: {branch}")]
    UnknownTarget { branch: String },

    #[error("Working tree has modifications")]
    DirtyWorkingTree,

    #[error("No such local branch: {branch}")]
    BranchNotFound { branch: String },

    #[error("Failed to checkout branch {branch}: {reason}")]
    CheckoutFailed { branch: String, reason: String },

    #[error("Malformed remote spec {token:?}: {reason}")]
    MalformedSpec { token: String, reason: String },

    #[error("Git remote does not exist: {remote}")]
    MissingRemote { remote: String },

    #[error("Push to {remote} failed with exit status {exit_status}")]
    RemotePushFailed { remote: String, exit_status: i32 },

    #[error("Target {branch} requires at least one remote")]
    EmptyRemoteList { branch: String },

    #[error(transparent)]
    Git(#[from] anyhow::Error),
}
