use anyhow::Result;
use tracing::debug;

use crate::App;
use crate::commands::format_target;
use crate::error::DeployError;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;
use crate::store::Target;
use crate::store::TargetStore;

impl<G: GitOps, P: Prompter> App<G, P> {
    pub async fn cmd_delete(
        &self,
        store: &mut TargetStore,
        branch: &str,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let branch = Target::normalize_branch(branch);
        let Some(target) = store.get(&branch) else {
            return Err(DeployError::UnknownTarget { branch }.into());
        };

        writeln!(stdout, "You are about to delete the following deploy target:")?;
        writeln!(stdout, "{}", format_target(target).trim_end())?;
        if !self.prompter.confirm("Continue?")? {
            writeln!(stdout, "Cancelling...")?;
            return Ok(());
        }

        store.remove(&branch);
        store.save().await?;
        debug!("{branch} target deleted");

        Ok(())
    }
}
