use std::path;

use anyhow::Context;
use anyhow::Result;
use tracing::debug;
use tracing::warn;

use crate::remote_spec::RemoteSpec;

// -----------------------------------------------------------------------------
// Types

/// A local branch and the remotes it is deployed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub branch_name: String,
    pub remotes: Vec<RemoteSpec>,
}

/// Flat-file persistence of deploy targets.
///
/// One target per line: `<branch> <remote>:<branch> ...`, fields separated
/// by runs of whitespace. File order is preserved on rewrite.
pub struct TargetStore {
    path: path::PathBuf,
    targets: Vec<Target>,
}

// -----------------------------------------------------------------------------
// Target impl

impl Target {
    pub fn new(branch_name: impl Into<String>, remotes: Vec<RemoteSpec>) -> Self {
        Self {
            branch_name: branch_name.into(),
            remotes,
        }
    }

    /// Targets are keyed by lower-cased branch name.
    pub fn normalize_branch(branch: &str) -> String {
        branch.to_lowercase()
    }
}

// -----------------------------------------------------------------------------
// TargetStore impl

impl TargetStore {
    pub fn new(path: path::PathBuf) -> Self {
        Self {
            path,
            targets: Vec::new(),
        }
    }

    /// Load the store from `path`. A missing file is an empty store.
    pub async fn load(path: path::PathBuf) -> Result<Self> {
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("target file {} does not exist yet", path.display());
                String::new()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read target file {}", path.display()));
            }
        };

        let mut store = Self::new(path);
        store.targets = parse_targets(&contents);
        Ok(store)
    }

    /// Rewrite the store file, creating its directory if needed.
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        tokio::fs::write(&self.path, render_targets(&self.targets))
            .await
            .with_context(|| format!("Failed to write target file {}", self.path.display()))?;
        Ok(())
    }

    pub fn get(&self, branch: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.branch_name == branch)
    }

    pub fn contains(&self, branch: &str) -> bool {
        self.get(branch).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Insert a target, replacing an existing one with the same branch in place.
    pub fn insert(&mut self, target: Target) {
        match self
            .targets
            .iter_mut()
            .find(|t| t.branch_name == target.branch_name)
        {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
    }

    pub fn remove(&mut self, branch: &str) -> Option<Target> {
        let index = self.targets.iter().position(|t| t.branch_name == branch)?;
        Some(self.targets.remove(index))
    }
}

// -----------------------------------------------------------------------------
// File format

fn parse_targets(contents: &str) -> Vec<Target> {
    let mut targets: Vec<Target> = Vec::new();

    for line in contents.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            if !fields.is_empty() {
                debug!("skipping target line with too few fields: {fields:?}");
            }
            continue;
        }

        let branch = fields[0];
        let remotes: Vec<RemoteSpec> = fields[1..]
            .iter()
            .filter_map(|token| match RemoteSpec::parse(token, branch) {
                Ok(spec) => Some(spec),
                Err(e) => {
                    warn!("ignoring remote spec for target {branch}: {e}");
                    None
                }
            })
            .collect();
        if remotes.is_empty() {
            continue;
        }

        let target = Target::new(branch, remotes);
        match targets.iter_mut().find(|t| t.branch_name == branch) {
            Some(existing) => *existing = target,
            None => targets.push(target),
        }
    }

    targets
}

fn render_targets(targets: &[Target]) -> String {
    let mut out = String::new();
    for target in targets {
        out.push_str(&target.branch_name);
        for remote in &target.remotes {
            out.push(' ');
            out.push_str(&remote.to_string());
        }
        out.push('\n');
    }
    out
}
