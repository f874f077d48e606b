use anyhow::Result;

use crate::App;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;
use crate::remote_spec::RemoteSpec;

impl<G: GitOps, P: Prompter> App<G, P> {
    /// Return the first remote name in `remotes` that is not a configured git
    /// remote, or `None` if all of them exist.
    pub async fn find_missing_remote(&self, remotes: &[RemoteSpec]) -> Result<Option<String>> {
        if remotes.is_empty() {
            return Ok(None);
        }

        let configured = self.git.list_remotes().await?;
        Ok(remotes
            .iter()
            .find(|spec| !configured.contains(&spec.remote_name))
            .map(|spec| spec.remote_name.clone()))
    }
}
