//! Pre-build cleanup of the output tree.
//!
//! Deletion is recursive, so this stage is deliberately conservative: every
//! resolved target must be a descendant of the configured output root, and
//! patterns are processed strictly one after another so dependent-folder
//! cleanup order stays deterministic and the log readable.

use crate::error::CleanupError;
use std::path::{Path, PathBuf};

/// Outcome of a cleanup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    /// Number of patterns processed.
    pub patterns_cleaned: usize,
    /// Number of filesystem entries removed.
    pub paths_removed: usize,
}

/// Removes stale output directories before a build starts.
#[derive(Debug, Clone)]
pub struct CleanupStage {
    public_root: PathBuf,
}

impl CleanupStage {
    /// Create a cleanup stage scoped to `public_root`.
    pub fn new(public_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
        }
    }

    /// Remove everything matched by `patterns`, in order.
    ///
    /// Each pattern is expanded relative to the output root, every match is
    /// checked against the root-escape invariant, and deletions are awaited
    /// one by one before the next pattern starts. An escaping match fails the
    /// whole pattern before anything under it is deleted.
    ///
    /// A missing output root is not an error: there is nothing to clean.
    ///
    /// # Errors
    ///
    /// [`CleanupError::NoTargets`] for an empty list, [`CleanupError::OutsideRoot`]
    /// for the safety violation, and I/O variants for filesystem failures. All
    /// are fatal to the pipeline.
    pub async fn clean(&self, patterns: &[String]) -> Result<CleanupReport, CleanupError> {
        if patterns.is_empty() {
            return Err(CleanupError::NoTargets);
        }

        if !self.public_root.exists() {
            tracing::debug!(root = %self.public_root.display(), "output root absent, nothing to clean");
            return Ok(CleanupReport {
                patterns_cleaned: patterns.len(),
                paths_removed: 0,
            });
        }

        let root = self
            .public_root
            .canonicalize()
            .map_err(|source| CleanupError::Root {
                root: self.public_root.clone(),
                source,
            })?;

        let mut removed = 0usize;
        for pattern in patterns {
            tracing::debug!(pattern, "cleaning -");
            let targets = self.resolve_pattern(&root, pattern)?;
            for target in targets {
                remove_entry(&target).await?;
                removed += 1;
            }
            tracing::debug!(pattern, "cleaned  -");
        }

        Ok(CleanupReport {
            patterns_cleaned: patterns.len(),
            paths_removed: removed,
        })
    }

    /// Expand one pattern and validate every match against the root.
    fn resolve_pattern(&self, root: &Path, pattern: &str) -> Result<Vec<PathBuf>, CleanupError> {
        let full = root.join(pattern);
        let full = full.to_string_lossy();
        let matches = glob::glob(&full).map_err(|source| CleanupError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut targets = Vec::new();
        for entry in matches {
            let path = match entry {
                Ok(p) => p,
                // Unreadable entries are skipped rather than deleted blind.
                Err(e) => {
                    tracing::warn!(pattern, error = %e, "skipping unreadable match");
                    continue;
                }
            };
            let canonical = path.canonicalize().map_err(|source| CleanupError::Remove {
                path: path.clone(),
                source,
            })?;
            if !canonical.starts_with(root) {
                return Err(CleanupError::OutsideRoot {
                    pattern: pattern.to_string(),
                    path: canonical,
                });
            }
            targets.push(path);
        }
        Ok(targets)
    }
}

async fn remove_entry(path: &Path) -> Result<(), CleanupError> {
    let result = if path.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    };
    result.map_err(|source| CleanupError::Remove {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scaffold() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public/css")).unwrap();
        fs::create_dir_all(dir.path().join("public/js/nested")).unwrap();
        fs::write(dir.path().join("public/css/app.css"), "body{}").unwrap();
        fs::write(dir.path().join("public/js/main.js"), "//").unwrap();
        fs::write(dir.path().join("public/js/nested/chunk.js"), "//").unwrap();
        fs::write(dir.path().join("outside.txt"), "keep me").unwrap();
        dir
    }

    #[tokio::test]
    async fn cleans_matched_entries_and_counts() {
        let dir = scaffold();
        let stage = CleanupStage::new(dir.path().join("public"));
        let report = stage
            .clean(&["css/*".to_string(), "js/*".to_string()])
            .await
            .unwrap();

        assert_eq!(report.patterns_cleaned, 2);
        assert_eq!(report.paths_removed, 3);
        assert!(dir.path().join("public/css").exists());
        assert!(!dir.path().join("public/css/app.css").exists());
        assert!(!dir.path().join("public/js/nested").exists());
    }

    #[tokio::test]
    async fn empty_pattern_list_is_an_error() {
        let dir = scaffold();
        let stage = CleanupStage::new(dir.path().join("public"));
        assert!(matches!(
            stage.clean(&[]).await,
            Err(CleanupError::NoTargets)
        ));
    }

    #[tokio::test]
    async fn escaping_pattern_deletes_nothing() {
        let dir = scaffold();
        let stage = CleanupStage::new(dir.path().join("public"));
        let err = stage.clean(&["../outside.txt".to_string()]).await.unwrap_err();
        assert!(matches!(err, CleanupError::OutsideRoot { .. }));
        assert!(dir.path().join("outside.txt").exists());
    }

    #[tokio::test]
    async fn missing_root_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let stage = CleanupStage::new(dir.path().join("does-not-exist"));
        let report = stage.clean(&["css/*".to_string()]).await.unwrap();
        assert_eq!(report.paths_removed, 0);
    }

    #[tokio::test]
    async fn symlink_escape_is_rejected() {
        let dir = scaffold();
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(
                dir.path().join("outside.txt"),
                dir.path().join("public/js/link.js"),
            )
            .unwrap();
            let stage = CleanupStage::new(dir.path().join("public"));
            let err = stage.clean(&["js/link.js".to_string()]).await.unwrap_err();
            assert!(matches!(err, CleanupError::OutsideRoot { .. }));
            assert!(dir.path().join("outside.txt").exists());
        }
    }
}
