use std::collections::HashSet;

use anyhow::Result;
use tracing::warn;

use crate::App;
use crate::commands::format_target;
use crate::error::DeployError;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;
use crate::remote_spec::RemoteSpec;
use crate::store::Target;
use crate::store::TargetStore;

impl<G: GitOps, P: Prompter> App<G, P> {
    /// Associate a local branch with a list of `remote[:remote_branch]` specs.
    ///
    /// Overwriting an existing target asks for confirmation first. Every
    /// remote must be a configured git remote.
    pub async fn cmd_add(
        &self,
        store: &mut TargetStore,
        branch: &str,
        tokens: &[String],
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let branch = Target::normalize_branch(branch);
        if tokens.is_empty() {
            return Err(DeployError::EmptyRemoteList { branch }.into());
        }

        let remotes = tokens
            .iter()
            .map(|token| RemoteSpec::parse(token, &branch))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        for spec in &remotes {
            if !seen.insert(spec.remote_name.as_str()) {
                warn!(
                    "remote {} appears more than once in target {}",
                    spec.remote_name, branch
                );
            }
        }

        if store.contains(&branch) {
            writeln!(
                stdout,
                "Target branch already exists. Continuing will overwrite existing target"
            )?;
            if !self.prompter.confirm("Continue?")? {
                writeln!(stdout, "Cancelling...")?;
                return Ok(());
            }
        }

        if let Some(remote) = self.find_missing_remote(&remotes).await? {
            return Err(DeployError::MissingRemote { remote }.into());
        }

        let target = Target::new(branch, remotes);
        writeln!(stdout, "Added target: {}", format_target(&target).trim_end())?;
        store.insert(target);
        store.save().await?;

        Ok(())
    }
}
