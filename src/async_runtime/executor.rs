//! Parallel file checking
//!
//! Each file is read and analyzed on tokio's blocking pool. Analysis is
//! synchronous and shares nothing between runs, so tasks never coordinate.

use std::io;
use std::path::PathBuf;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{CheckError, CheckResult};
use crate::{lint_file, Report};

/// Check `paths` concurrently, returning one result per path in input order
pub async fn lint_files(paths: Vec<PathBuf>) -> Vec<CheckResult<Report>> {
    debug!(files = paths.len(), "spawning check tasks");

    let handles: Vec<(PathBuf, JoinHandle<CheckResult<Report>>)> = paths
        .into_iter()
        .map(|path| {
            let task_path = path.clone();
            (path, tokio::task::spawn_blocking(move || lint_file(&task_path)))
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "check task failed");
                Err(CheckError::io_error(path, io::Error::other(err)))
            }
        };
        results.push(result);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let dir = std::env::temp_dir();
        let clean = dir.join(format!("scopecheck-batch-clean-{}.js", std::process::id()));
        let noisy = dir.join(format!("scopecheck-batch-noisy-{}.js", std::process::id()));
        let missing = dir.join("scopecheck-batch-missing.js");
        fs::write(&clean, "console.log(1);\n").unwrap();
        fs::write(&noisy, "let a;\nlet b;\nnope();\n").unwrap();

        let results = lint_files(vec![noisy.clone(), missing, clean.clone()]).await;
        fs::remove_file(&clean).unwrap();
        fs::remove_file(&noisy).unwrap();

        assert_eq!(results.len(), 3);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.name, noisy.display().to_string());
        assert_eq!(first.diagnostics.len(), 3);
        assert!(matches!(results[1], Err(CheckError::Io { .. })));
        assert!(results[2].as_ref().unwrap().diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_no_files() {
        assert!(lint_files(Vec::new()).await.is_empty());
    }
}
