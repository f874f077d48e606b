use std::fmt::Display;

use serde::Serialize;

use crate::error::DeployError;

/// A push destination: a git remote and the branch on that remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteSpec {
    pub remote_name: String,
    pub remote_branch: String,
}

impl RemoteSpec {
    pub fn new(remote_name: impl Into<String>, remote_branch: impl Into<String>) -> Self {
        Self {
            remote_name: remote_name.into(),
            remote_branch: remote_branch.into(),
        }
    }

    /// Parse a `remote[:remote_branch]` token.
    ///
    /// Splits on the first `:`. Without a `:` the remote branch defaults to
    /// `local_branch`. Remote existence is not checked here.
    pub fn parse(token: &str, local_branch: &str) -> Result<Self, DeployError> {
        let malformed = |reason: &str| DeployError::MalformedSpec {
            token: token.to_string(),
            reason: reason.to_string(),
        };

        if token.chars().any(char::is_whitespace) {
            return Err(malformed("whitespace is not allowed"));
        }

        let (remote_name, remote_branch) = match token.split_once(':') {
            Some((name, branch)) => (name, branch),
            None => (token, local_branch),
        };

        if remote_name.is_empty() {
            return Err(malformed("remote name is empty"));
        }
        if remote_branch.is_empty() {
            return Err(malformed("remote branch is empty"));
        }

        Ok(Self::new(remote_name, remote_branch))
    }

    /// Refspec pushed for this destination, e.g. `main:prod`.
    pub fn refspec(&self, local_branch: &str) -> String {
        format!("{}:{}", local_branch, self.remote_branch)
    }
}

impl Display for RemoteSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.remote_name, self.remote_branch)
    }
}
