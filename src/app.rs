use crate::config::Config;
use crate::ops::git::GitOps;
use crate::ops::prompt::Prompter;

pub struct App<G: GitOps, P: Prompter> {
    pub config: Config,
    pub git: G,
    pub prompter: P,
}

impl<G: GitOps, P: Prompter> App<G, P> {
    pub fn new(config: Config, git: G, prompter: P) -> Self {
        Self {
            config,
            git,
            prompter,
        }
    }
}
