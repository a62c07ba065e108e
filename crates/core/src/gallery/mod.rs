//! Project showcase arranged on a rotating cylinder.

pub mod geometry;
pub mod view;

use std::{collections::HashSet, path::Path};

use serde::{Deserialize, Serialize};

use crate::{background::parse_hex_color, FolioError, Result};

pub use geometry::{VisualWeight, WeightFloors};
pub use view::{
    CardView, CircularGallery, ClickOutcome, ClickTarget, DetailView, GalleryFrame,
    GalleryViewState, NavButton, EMPTY_GALLERY_MESSAGE,
};

pub const DEFAULT_ACCENT: &str = "#10B981";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Active,
    Completed,
    Archived,
}

impl ProjectStatus {
    /// Colour family of the status badge.
    pub fn badge(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "green",
            ProjectStatus::Completed => "blue",
            ProjectStatus::Archived => "gray",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Archived => "Archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLinks {
    #[serde(alias = "liveUrl")]
    pub live: String,
    #[serde(alias = "githubUrl")]
    pub source: String,
}

/// One showcased project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    #[serde(alias = "image")]
    pub media_ref: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub year: String,
    pub status: ProjectStatus,
    #[serde(flatten)]
    pub links: LinksField,
    #[serde(default)]
    pub accent_color: Option<String>,
}

/// Links may be nested under `externalLinks` or given flat as
/// `liveUrl` / `githubUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinksField {
    Nested {
        #[serde(rename = "externalLinks")]
        external_links: ExternalLinks,
    },
    Flat(ExternalLinks),
}

impl GalleryItem {
    pub fn links(&self) -> &ExternalLinks {
        match &self.links {
            LinksField::Nested { external_links } => external_links,
            LinksField::Flat(links) => links,
        }
    }

    pub fn accent(&self) -> &str {
        self.accent_color.as_deref().unwrap_or(DEFAULT_ACCENT)
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// Parses a JSON array of projects, checking ids are unique and accent
/// colours are `#rrggbb`.
pub fn parse_items(json: &str) -> Result<Vec<GalleryItem>> {
    let items: Vec<GalleryItem> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(item.id.as_str()) {
            return Err(FolioError::DuplicateItem(item.id.clone()));
        }
        if let Some(accent) = &item.accent_color {
            parse_hex_color(accent)?;
        }
    }
    Ok(items)
}

pub fn load_items(path: impl AsRef<Path>) -> Result<Vec<GalleryItem>> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    parse_items(&raw)
}
