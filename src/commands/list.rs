use anyhow::Result;
use anyhow::bail;
use colored::Colorize;

use crate::App;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;
use crate::store::Target;
use crate::store::TargetStore;

/// Width of the branch column.
const BRANCH_COLUMN: usize = 26;

/// One table row: padded branch name followed by its remote specs.
pub(crate) fn format_target(target: &Target) -> String {
    let remotes: Vec<String> = target.remotes.iter().map(|r| r.to_string()).collect();
    format!(
        "{:<width$}{}",
        target.branch_name,
        remotes.join(", "),
        width = BRANCH_COLUMN
    )
}

impl<G: GitOps, P: Prompter> App<G, P> {
    pub async fn cmd_list(
        &self,
        store: &TargetStore,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        if store.is_empty() {
            bail!("No targets exist");
        }

        let header = format!(
            "{:<width$}{}",
            "BRANCH (local_branch)",
            "REMOTES [<remote>:<remote_branch>]",
            width = BRANCH_COLUMN
        );
        writeln!(stdout, "{}", header.bold())?;
        for target in store.iter() {
            writeln!(stdout, "{}", format_target(target).trim_end())?;
        }
        Ok(())
    }
}
