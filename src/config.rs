use std::path;

use anyhow::Result;

/// Default directory holding the target file and push logs.
pub const DEFAULT_BASE_DIR: &str = "./.deploy";

/// Name of the target file inside the base directory.
pub const TARGET_FILE_NAME: &str = "deploy_targets.conf";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: path::PathBuf,
    pub verbose: bool,
}

impl Config {
    /// Resolve config: explicit `base_dir`, then `deploy.baseDir` from git
    /// config, then [`DEFAULT_BASE_DIR`].
    pub fn load(base_dir: Option<path::PathBuf>, verbose: bool) -> Result<Self> {
        let base_dir = match base_dir {
            Some(dir) => dir,
            None => Self::base_dir_from_git_config()?
                .unwrap_or_else(|| path::PathBuf::from(DEFAULT_BASE_DIR)),
        };
        Ok(Self { base_dir, verbose })
    }

    fn base_dir_from_git_config() -> Result<Option<path::PathBuf>> {
        let output = std::process::Command::new("git")
            .args(["config", "--get", "deploy.baseDir"])
            .output()?;

        // Exit code 1 means the key is unset
        if !output.status.success() {
            return Ok(None);
        }

        let value = String::from_utf8(output.stdout)?.trim().to_string();
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(path::PathBuf::from(value)))
    }

    /// Create a new config with explicit values (useful for tests)
    pub fn new(base_dir: path::PathBuf) -> Self {
        Self {
            base_dir,
            verbose: false,
        }
    }

    pub fn target_file(&self) -> path::PathBuf {
        self.base_dir.join(TARGET_FILE_NAME)
    }

    /// Per-branch directory for push logs. `%` and `/` in branch names are
    /// percent-encoded, so distinct branches never share a directory.
    pub fn log_dir(&self, branch: &str) -> path::PathBuf {
        self.base_dir.join(branch.replace('%', "%25").replace('/', "%2F"))
    }
}
