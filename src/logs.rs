use std::collections::HashSet;
use std::fs::File;
use std::path;

use anyhow::Context;
use anyhow::Result;

use crate::remote_spec::RemoteSpec;

/// Extension of push log artifacts.
pub const LOG_EXTENSION: &str = "out";

/// Assign one log path per remote spec under `log_dir`, in spec order.
///
/// The first spec for a remote gets `<remote>.out`. A later spec whose
/// file name is already taken gets `<remote>.<n>.out` with the smallest
/// free `n`, so every attempt writes to its own file.
pub fn assign_log_paths(log_dir: &path::Path, remotes: &[RemoteSpec]) -> Vec<path::PathBuf> {
    let mut used: HashSet<String> = HashSet::new();

    remotes
        .iter()
        .map(|spec| {
            let stem = spec.remote_name.replace('/', "-");
            let mut name = format!("{stem}.{LOG_EXTENSION}");
            let mut n = 1;
            while used.contains(&name) {
                name = format!("{stem}.{n}.{LOG_EXTENSION}");
                n += 1;
            }
            used.insert(name.clone());
            log_dir.join(name)
        })
        .collect()
}

/// Create (or truncate) a log artifact, creating its directory first.
pub async fn open_log(log_path: &path::Path) -> Result<File> {
    if let Some(dir) = log_path.parent() {
        // create_dir_all treats an existing directory as success
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let file = tokio::fs::File::create(log_path)
        .await
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;
    Ok(file.into_std().await)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn test_assign_log_paths() {
        let remotes = vec![
            RemoteSpec::new("origin", "prod"),
            RemoteSpec::new("staging", "release"),
        ];
        let paths = assign_log_paths(path::Path::new(".deploy/release"), &remotes);
        assert_eq!(
            paths,
            vec![
                path::PathBuf::from(".deploy/release/origin.out"),
                path::PathBuf::from(".deploy/release/staging.out"),
            ]
        );
    }

    #[test]
    fn test_assign_log_paths_duplicates_are_distinct() {
        let remotes = vec![
            RemoteSpec::new("origin", "prod"),
            RemoteSpec::new("origin", "qa"),
            RemoteSpec::new("origin.1", "x"),
            RemoteSpec::new("origin", "dev"),
        ];
        let paths = assign_log_paths(path::Path::new("logs"), &remotes);
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["origin.out", "origin.1.out", "origin.1.1.out", "origin.2.out"]
        );
    }

    #[test]
    fn test_assign_log_paths_flattens_slashes() {
        let remotes = vec![RemoteSpec::new("team/origin", "main")];
        let paths = assign_log_paths(path::Path::new("logs"), &remotes);
        assert_eq!(paths, vec![path::PathBuf::from("logs/team-origin.out")]);
    }

    #[tokio::test]
    async fn test_open_log_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("release").join("origin.out");

        let mut log = open_log(&log_path).await.unwrap();
        writeln!(log, "first run with a long line").unwrap();
        drop(log);

        let mut log = open_log(&log_path).await.unwrap();
        writeln!(log, "second").unwrap();
        drop(log);

        assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "second\n");
    }
}
