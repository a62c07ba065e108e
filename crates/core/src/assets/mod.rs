use std::collections::HashSet;

use crate::config::DEFAULT_FALLBACK_MEDIA;

/// Tracks which media references failed to load and swaps them for the
/// fallback image.
#[derive(Debug, Clone)]
pub struct AssetStore {
    fallback: String,
    failed: HashSet<String>,
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_MEDIA)
    }
}

impl AssetStore {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
            failed: HashSet::new(),
        }
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Records a load failure reported by the renderer. Returns `true` the
    /// first time a reference fails.
    pub fn report_failure(&mut self, media_ref: &str) -> bool {
        if media_ref == self.fallback {
            return false;
        }
        let first = self.failed.insert(media_ref.to_string());
        if first {
            tracing::warn!(media_ref, fallback = %self.fallback, "media failed to load, using fallback");
        }
        first
    }

    pub fn has_failed(&self, media_ref: &str) -> bool {
        self.failed.contains(media_ref)
    }

    /// Reference the renderer should display. Blank and failed references
    /// resolve to the fallback.
    pub fn resolve<'a>(&'a self, media_ref: &'a str) -> &'a str {
        if media_ref.trim().is_empty() || self.failed.contains(media_ref) {
            &self.fallback
        } else {
            media_ref
        }
    }
}
