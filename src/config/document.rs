//! INI document model.
//!
//! A `ConfigDocument` is a flat two-level map: section name → key → raw string
//! value. Values are never coerced here; the typed accessor layer does that.
//! Keys are case-insensitive (stored lower-cased), section names are not.

use crate::error::{ConfigError, ConfigResult};
use ini::{Ini, ParseOption};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use tracing::warn;

/// One `[Section]` block.
pub type Section = BTreeMap<String, String>;

/// Parsed INI content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    sections: BTreeMap<String, Section>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI text.
    ///
    /// Quotes and backslashes are kept literally. Keys that appear before any
    /// section header are dropped with a warning.
    pub fn parse(content: &str) -> Result<Self, String> {
        let option = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, option).map_err(|e| e.to_string())?;

        let mut document = Self::new();
        for (section, properties) in &ini {
            let Some(section) = section else {
                if properties.iter().next().is_some() {
                    warn!("Ignoring keys outside of any [section]");
                }
                continue;
            };
            document.sections.entry(section.to_string()).or_default();
            for (key, value) in properties.iter() {
                document.insert(section, key, value.to_string());
            }
        }
        Ok(document)
    }

    /// Read and parse an INI file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content).map_err(|message| ConfigError::parse(path, message))
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .get(&normalize_key(key))
            .map(String::as_str)
    }

    /// Insert or replace a value, creating the section when needed.
    ///
    /// Values are single-line: a line break in the section, key or value is
    /// rejected with `ConfigError::InvalidEntry`. Leading and trailing spaces
    /// of a value are not preserved once the document is written and read back.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) -> ConfigResult<()> {
        let value = value.into();
        let invalid = |reason: &str| ConfigError::InvalidEntry {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        };
        if has_line_break(section) || section.contains(']') {
            return Err(invalid("section name must be a single line without ']'"));
        }
        if has_line_break(key) || key.contains(['=', ':']) || key.trim().is_empty() {
            return Err(invalid("key must be a non-empty single line without '=' or ':'"));
        }
        if has_line_break(&value) {
            return Err(invalid("value must not contain line breaks"));
        }
        self.insert(section, key, value);
        Ok(())
    }

    fn insert(&mut self, section: &str, key: &str, value: String) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(normalize_key(key), value);
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, section)| (name.as_str(), section))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render as INI text, one `key = value` line per entry.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, section) in &self.sections {
            let _ = writeln!(out, "[{}]", name);
            for (key, value) in section {
                if value.is_empty() {
                    let _ = writeln!(out, "{} =", key);
                } else {
                    let _ = writeln!(out, "{} = {}", key, value);
                }
            }
            out.push('\n');
        }
        out
    }

    /// Write the rendered document, creating parent directories.
    pub fn write_to(&self, path: &Path) -> ConfigResult<()> {
        let write_err = |e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, self.render()).map_err(write_err)
    }

    pub(crate) fn sections_mut(&mut self) -> &mut BTreeMap<String, Section> {
        &mut self.sections
    }
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
