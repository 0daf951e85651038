//! Environment variable overrides.
//!
//! Two variables are honoured:
//! - `APP_PORT` - replaces the configured `app_port` when set to a non-empty value
//! - `LITE` - any non-empty value forces `open_driver` off

/// Overrides the `app_port` setting.
pub const APP_PORT_ENV: &str = "APP_PORT";

/// Lite mode switch; disables the browser driver.
pub const LITE_ENV: &str = "LITE";

/// Snapshot of the environment taken when the store is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Raw `APP_PORT` value, empty values already filtered out.
    pub app_port: Option<String>,
    /// Whether `LITE` is set to a non-empty value.
    pub lite: bool,
}

impl EnvOverrides {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            app_port: non_empty(APP_PORT_ENV).map(|value| value.trim().to_string()),
            lite: non_empty(LITE_ENV).is_some(),
        }
    }

    pub fn with_app_port(mut self, port: impl Into<String>) -> Self {
        self.app_port = Some(port.into());
        self
    }

    pub fn with_lite(mut self, lite: bool) -> Self {
        self.lite = lite;
        self
    }
}
