//! Key-wise merging of configuration documents.
//!
//! Higher tier values override lower tier values one key at a time. A section
//! present in both documents is merged, never replaced wholesale, so keys that
//! only the lower tier defines stay visible.

use super::document::ConfigDocument;

/// Merge `overlay` onto `base`, with `overlay` taking precedence.
///
/// # Example
/// ```
/// use iptv_settings::config::{ConfigDocument, merge};
///
/// let base = ConfigDocument::parse("[Settings]\nurls_limit = 20\nmin_resolution = 1280x720\n").unwrap();
/// let overlay = ConfigDocument::parse("[Settings]\nurls_limit = 50\n").unwrap();
/// let merged = merge(base, overlay);
/// assert_eq!(merged.get("Settings", "urls_limit"), Some("50"));
/// assert_eq!(merged.get("Settings", "min_resolution"), Some("1280x720"));
/// ```
pub fn merge(mut base: ConfigDocument, overlay: ConfigDocument) -> ConfigDocument {
    overlay_onto(&mut base, overlay);
    base
}

/// In-place form of [`merge`].
pub fn overlay_onto(base: &mut ConfigDocument, mut overlay: ConfigDocument) {
    let sections = base.sections_mut();
    for (name, section) in std::mem::take(overlay.sections_mut()) {
        sections.entry(name).or_default().extend(section);
    }
}

/// Merge documents in order, later documents taking precedence.
pub fn merge_all(documents: impl IntoIterator<Item = ConfigDocument>) -> ConfigDocument {
    documents.into_iter().fold(ConfigDocument::new(), merge)
}
