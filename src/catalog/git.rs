use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::{CatalogError, RefSource, Result};

/// [`RefSource`] backed by the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
    repo_root: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(repo_root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: PathBuf::from("git"),
            repo_root: repo_root.into(),
            timeout,
        }
    }

    #[cfg(test)]
    fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl RefSource for GitCli {
    async fn list_refs(&self) -> Result<Vec<String>> {
        // kill_on_drop reaps the child when the timeout drops the future
        let output = Command::new(&self.program)
            .current_dir(&self.repo_root)
            .args(["branch", "--all", "--no-color"])
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, output).await {
            Ok(result) => result.map_err(|e| CatalogError::Retrieval {
                message: format!("Failed to run git: {}", e),
            })?,
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "git branch listing timed out");
                return Err(CatalogError::Retrieval {
                    message: format!(
                        "git branch listing timed out after {}s",
                        self.timeout.as_secs_f64()
                    ),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("git branch listing failed with {}", output.status)
            } else {
                stderr
            };
            return Err(CatalogError::Retrieval { message });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outside_a_repository_is_a_retrieval_error() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::new(dir.path().join("missing"), Duration::from_secs(5));

        let err = git.list_refs().await.unwrap_err();
        assert!(matches!(err, CatalogError::Retrieval { .. }));
    }

    #[tokio::test]
    async fn not_a_repository_reports_git_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::new(dir.path(), Duration::from_secs(5));

        let CatalogError::Retrieval { message } = git.list_refs().await.unwrap_err();
        assert!(
            message.starts_with("fatal: not a git repository"),
            "unexpected message: {message}"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn hung_git_is_killed_after_timeout() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::Instant;

        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("git");
        std::fs::write(&fake, "#!/bin/sh\nexec /bin/sleep 30\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let git = GitCli::new(dir.path(), Duration::from_millis(500)).with_program(&fake);

        let started = Instant::now();
        let CatalogError::Retrieval { message } = git.list_refs().await.unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(message, "git branch listing timed out after 0.5s");
    }
}
