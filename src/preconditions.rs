use crate::App;
use crate::error::DeployError;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;

impl<G: GitOps, P: Prompter> App<G, P> {
    /// Verify the working tree is clean and `branch` exists locally.
    ///
    /// Read-only: nothing is checked out or written.
    pub async fn check_preconditions(&self, branch: &str) -> Result<(), DeployError> {
        if !self.git.is_working_tree_clean().await? {
            return Err(DeployError::DirtyWorkingTree);
        }

        let branches = self.git.list_local_branches().await?;
        if !branches.iter().any(|b| b == branch) {
            return Err(DeployError::BranchNotFound {
                branch: branch.to_string(),
            });
        }

        Ok(())
    }
}
