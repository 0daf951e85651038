//! Resource path resolution.
//!
//! Maps a relative path onto one of two roots:
//! - the working directory the program was started from
//! - the bundle directory, when running from a packaged bundle
//!
//! A packaged bundle is detected through the `IPTV_BUNDLE_DIR` environment
//! variable, which the bundle launcher sets to the directory its files were
//! extracted to. Resolution never fails; the returned path may not exist.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable marking a packaged run.
pub const BUNDLE_DIR_ENV: &str = "IPTV_BUNDLE_DIR";

/// Resolves relative resource paths to absolute paths.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    /// Fixed working directory. `None` reads the process working directory on every call.
    working_dir: Option<PathBuf>,
    /// Base directory of the packaged bundle, if running from one.
    bundle_dir: Option<PathBuf>,
}

impl PathResolver {
    /// Resolver for the running process.
    pub fn discover() -> Self {
        let bundle_dir = std::env::var_os(BUNDLE_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        if let Some(ref dir) = bundle_dir {
            debug!(bundle_dir = %dir.display(), "Running from packaged bundle");
        }

        Self {
            working_dir: None,
            bundle_dir,
        }
    }

    /// Resolver with explicit roots.
    pub fn new(working_dir: impl Into<PathBuf>, bundle_dir: Option<PathBuf>) -> Self {
        Self {
            working_dir: Some(working_dir.into()),
            bundle_dir,
        }
    }

    /// The directory relative paths are joined onto.
    pub fn working_dir(&self) -> PathBuf {
        match self.working_dir {
            Some(ref dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn bundle_dir(&self) -> Option<&Path> {
        self.bundle_dir.as_deref()
    }

    /// Resolve `relative` against the working directory or the bundle.
    ///
    /// - `persistent`: always the working directory, whether or not the file exists.
    ///   User-writable files must never land inside a read-only bundle.
    /// - otherwise the working-directory copy wins when it exists, then the
    ///   bundle copy, then the working directory again as a fallback.
    pub fn resolve(&self, relative: impl AsRef<Path>, persistent: bool) -> PathBuf {
        let relative = relative.as_ref();
        let local = self.working_dir().join(relative);

        if persistent || local.exists() {
            return local;
        }

        match self.bundle_dir {
            Some(ref bundle) => bundle.join(relative),
            None => local,
        }
    }

    /// Shorthand for a read-only resource: `resolve(relative, false)`.
    pub fn resource_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.resolve(relative, false)
    }

    /// Shorthand for a user-writable file: `resolve(relative, true)`.
    pub fn persistent_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.resolve(relative, true)
    }
}
