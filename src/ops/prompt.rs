use anyhow::Result;
use dialoguer::Confirm;
#[cfg(test)]
use mockall::automock;

/// Yes/no confirmation before destructive store edits.
#[cfg_attr(test, automock)]
pub trait Prompter {
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Interactive terminal prompt, defaulting to "no".
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        Ok(Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()?)
    }
}

/// Answers every question the same way, e.g. for `--yes`.
pub struct FixedPrompter(pub bool);

impl Prompter for FixedPrompter {
    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(self.0)
    }
}
