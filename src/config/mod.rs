//! Layered configuration.
//!
//! Two INI tiers are merged key by key:
//! 1. **Defaults** - `config/config.ini`, shipped with the application
//!    (working directory first, then the packaged bundle)
//! 2. **User** - `config/user_config.ini` in the working directory, written by `save`
//!
//! Typed accessors on [`ConfigStore`] read the `[Settings]` section and fall
//! back to fixed values for anything absent, empty or malformed.
//!
//! ## Environment Variables
//! - `APP_PORT` - overrides `app_port`
//! - `LITE` - forces `open_driver` off
//! - `IPTV_BUNDLE_DIR` - bundle directory of a packaged run (see [`crate::paths`])

mod document;
mod env;
mod files;
mod loader;
mod merge;
mod settings;

pub use document::{ConfigDocument, Section};
pub use env::{APP_PORT_ENV, EnvOverrides, LITE_ENV};
pub use files::{CopyOutcome, copy_tree};
pub use loader::{
    CONFIG_DIR, ConfigStore, ConfigTier, DEFAULT_CONFIG_FILE, SETTINGS_SECTION, USER_CONFIG_FILE,
    parse_bool,
};
pub use merge::{merge, merge_all, overlay_onto};
pub use settings::{ALL_REGIONS, OpenMethods, SettingsSnapshot, get_resolution_value, parse_list};
