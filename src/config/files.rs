//! Bootstrapping the working-directory config folder.
//!
//! Copies the bundled template directory into `./config`, keeping relative
//! sub-paths. Failures are reported, never raised.

use super::loader::{CONFIG_DIR, ConfigStore};
use crate::error::{ConfigError, ConfigResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Result of a [`ConfigStore::copy`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Files written, as destination paths.
    Copied { files: Vec<PathBuf> },
    /// The copy stopped early; `message` is what was shown to the user.
    Failed { message: String },
}

impl CopyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CopyOutcome::Copied { .. })
    }
}

impl ConfigStore {
    /// Copy the bundled `config` directory into `<working dir>/config`.
    ///
    /// On failure prints `Failed to copy files: <error>` to stdout and returns
    /// [`CopyOutcome::Failed`]. Files copied before the failure stay in place.
    pub fn copy(&self) -> CopyOutcome {
        self.copy_reporting_to(&mut std::io::stdout())
    }

    /// [`copy`](Self::copy), printing the failure line to `out` instead of stdout.
    pub fn copy_reporting_to(&self, out: &mut impl Write) -> CopyOutcome {
        let source = self.resolver().resource_path(CONFIG_DIR);
        let destination = self.resolver().working_dir().join(CONFIG_DIR);

        match copy_tree(&source, &destination) {
            Ok(files) => {
                info!(
                    from = %source.display(),
                    to = %destination.display(),
                    count = files.len(),
                    "Copied config template"
                );
                CopyOutcome::Copied { files }
            }
            Err(e) => {
                let message = format!("Failed to copy files: {}", e);
                error!("{}", message);
                let _ = writeln!(out, "{}", message);
                CopyOutcome::Failed { message }
            }
        }
    }
}

/// Recursively copy every file under `source` into `destination`.
///
/// Copying a directory onto itself is a no-op per file.
pub fn copy_tree(source: &Path, destination: &Path) -> ConfigResult<Vec<PathBuf>> {
    if !source.is_dir() {
        return Err(ConfigError::SourceNotDirectory(source.to_path_buf()));
    }

    let mut copied = Vec::new();
    let mut pending = vec![PathBuf::new()];

    while let Some(relative) = pending.pop() {
        let dir = source.join(&relative);
        let entries = std::fs::read_dir(&dir).map_err(|e| ConfigError::Read {
            path: dir.clone(),
            source: e,
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::Read {
                path: dir.clone(),
                source: e,
            })?;
            let child = relative.join(entry.file_name());
            let from = source.join(&child);

            if from.is_dir() {
                pending.push(child);
                continue;
            }

            let to = destination.join(&child);
            if same_file(&from, &to) {
                debug!(path = %from.display(), "Source and destination are the same file");
                continue;
            }
            if let Some(parent) = to.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
            std::fs::copy(&from, &to).map_err(|e| ConfigError::Copy {
                from: from.clone(),
                to: to.clone(),
                source: e,
            })?;
            copied.push(to);
        }
    }

    copied.sort();
    Ok(copied)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
