use serde::Serialize;

use super::{
    geometry::{self, VisualWeight, WeightFloors},
    ExternalLinks, GalleryItem, ProjectStatus,
};
use crate::{
    assets::AssetStore,
    config::GalleryConfig,
    host::{Document, Key, ListenerGuard, ListenerKind, ScrollLock},
    tween::{Tween, TweenStatus, GALLERY_EASING},
    FolioError, Result,
};

pub const EMPTY_GALLERY_MESSAGE: &str = "No projects to display";

/// Mutable view state of the gallery. Created zeroed on mount.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GalleryViewState {
    pub rotation_degrees: f32,
    pub selected_item_id: Option<String>,
}

/// Element a pointer click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Card(usize),
    /// The "View Details" button inside a card.
    ViewDetails(usize),
    NavButton(usize),
    /// The dimmed area around the detail panel.
    Backdrop,
    /// Anything inside the detail panel other than its close button.
    DetailContent,
    CloseButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Navigated(usize),
    Opened(String),
    Closed,
    /// The click was swallowed, either because the gallery is inert behind
    /// the overlay or because it hit inert content.
    Ignored,
}

/// Page-wide effects held while the detail overlay is open.
#[derive(Debug)]
struct OverlayScope {
    _scroll_lock: ScrollLock,
    _escape_listener: ListenerGuard,
}

/// Rotating project carousel with a detail overlay.
#[derive(Debug)]
pub struct CircularGallery {
    items: Vec<GalleryItem>,
    config: GalleryConfig,
    state: GalleryViewState,
    displayed_rotation: f32,
    rotation_tween: Option<Tween>,
    assets: AssetStore,
    document: Document,
    overlay: Option<OverlayScope>,
}

impl CircularGallery {
    pub fn new(items: Vec<GalleryItem>, config: GalleryConfig, document: Document) -> Self {
        let assets = AssetStore::new(config.fallback_media.clone());
        Self {
            items,
            config,
            state: GalleryViewState::default(),
            displayed_rotation: 0.0,
            rotation_tween: None,
            assets,
            document,
            overlay: None,
        }
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn state(&self) -> &GalleryViewState {
        &self.state
    }

    /// Rotation currently on screen, which trails the target while a
    /// transition runs.
    pub fn displayed_rotation(&self) -> f32 {
        self.displayed_rotation
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation_tween.is_some()
    }

    pub fn is_detail_open(&self) -> bool {
        self.state.selected_item_id.is_some()
    }

    /// While the overlay is open the cards and navigation ignore pointer input.
    pub fn is_interactive(&self) -> bool {
        !self.is_detail_open()
    }

    pub fn active_index(&self) -> Option<usize> {
        geometry::active_index(self.state.rotation_degrees, self.items.len())
    }

    pub fn selected_item(&self) -> Option<&GalleryItem> {
        let id = self.state.selected_item_id.as_deref()?;
        self.items.iter().find(|item| item.id == id)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if self.items.is_empty() {
            return Err(FolioError::EmptyGallery);
        }
        if index >= self.items.len() {
            return Err(FolioError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Rotates `index` to the front. A jump issued mid-transition replaces
    /// the running one, starting from the rotation currently on screen.
    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        let target = geometry::target_rotation(index, self.items.len())
            .ok_or(FolioError::EmptyGallery)?;

        if target == self.state.rotation_degrees {
            return Ok(());
        }
        self.state.rotation_degrees = target;

        match self.rotation_tween.as_mut() {
            Some(tween) => tween.retarget(target),
            None => {
                self.rotation_tween = Some(Tween::new(
                    self.displayed_rotation,
                    target,
                    self.config.rotation_seconds,
                    GALLERY_EASING,
                ));
            }
        }
        tracing::debug!(index, target, "gallery rotating");
        Ok(())
    }

    /// Steps the rotation transition forward.
    pub fn advance(&mut self, delta: f32) {
        let Some(tween) = self.rotation_tween.as_mut() else {
            return;
        };
        let status = tween.advance(delta);
        self.displayed_rotation = tween.value();
        if status == TweenStatus::Finished {
            self.displayed_rotation = self.state.rotation_degrees;
            self.rotation_tween = None;
        }
    }

    /// Opens the detail overlay for `index`.
    pub fn select_item(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        let id = self.items[index].id.clone();
        if self.overlay.is_none() {
            self.overlay = Some(OverlayScope {
                _scroll_lock: self.document.lock_scroll(),
                _escape_listener: self.document.add_listener(ListenerKind::Keydown),
            });
        }
        tracing::debug!(%id, "opened project detail");
        self.state.selected_item_id = Some(id);
        Ok(())
    }

    /// Closes the overlay and releases its page-wide effects.
    pub fn close_detail(&mut self) {
        self.state.selected_item_id = None;
        self.overlay = None;
    }

    pub fn handle_click(&mut self, target: ClickTarget) -> ClickOutcome {
        if self.is_detail_open() {
            return match target {
                ClickTarget::Backdrop | ClickTarget::CloseButton => {
                    self.close_detail();
                    ClickOutcome::Closed
                }
                _ => ClickOutcome::Ignored,
            };
        }

        let result = match target {
            ClickTarget::Card(index) | ClickTarget::ViewDetails(index) => self
                .select_item(index)
                .map(|()| ClickOutcome::Opened(self.items[index].id.clone())),
            ClickTarget::NavButton(index) => self.jump_to(index).map(|()| ClickOutcome::Navigated(index)),
            ClickTarget::Backdrop | ClickTarget::DetailContent | ClickTarget::CloseButton => {
                Ok(ClickOutcome::Ignored)
            }
        };

        result.unwrap_or_else(|err| {
            tracing::warn!(?target, %err, "ignoring gallery click");
            ClickOutcome::Ignored
        })
    }

    /// Keyboard input reaches the gallery only through the Escape listener
    /// installed while the overlay is open.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if self.overlay.is_some() && key == Key::Escape {
            self.close_detail();
            return true;
        }
        false
    }

    /// Reports that the renderer failed to load `media_ref`.
    pub fn report_media_error(&mut self, media_ref: &str) {
        self.assets.report_failure(media_ref);
    }

    pub fn frame(&self) -> GalleryFrame {
        let Some(per_item) = geometry::angle_per_item(self.items.len()) else {
            return GalleryFrame::Empty {
                message: EMPTY_GALLERY_MESSAGE.to_string(),
            };
        };

        let floors = WeightFloors {
            opacity: self.config.opacity_floor,
            scale: self.config.scale_floor,
        };
        let rotation = self.state.rotation_degrees;
        let active = self.active_index();

        let cards = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let angle = geometry::item_angle(index, per_item);
                CardView {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    category: item.category.clone(),
                    description: item.description.clone(),
                    media: self.assets.resolve(&item.media_ref).to_string(),
                    status: item.status,
                    accent: item.accent().to_string(),
                    angle,
                    translate_z: self.config.radius,
                    weight: geometry::visual_weight(angle, rotation, floors),
                }
            })
            .collect();

        let nav = (0..self.items.len())
            .map(|index| NavButton {
                index,
                label: (index + 1).to_string(),
                active: active == Some(index),
            })
            .collect();

        let detail = self.selected_item().map(|item| DetailView {
            id: item.id.clone(),
            title: item.title.clone(),
            category: item.category.clone(),
            description: item.description.clone(),
            media: self.assets.resolve(&item.media_ref).to_string(),
            technologies: item.technologies.clone(),
            year: item.year.clone(),
            status: item.status,
            badge: item.status.badge(),
            links: item.links().clone(),
        });

        GalleryFrame::Carousel {
            rotation: self.displayed_rotation,
            active_index: active.unwrap_or(0),
            interactive: self.is_interactive(),
            cards,
            nav,
            detail,
        }
    }
}

/// Everything the renderer needs to draw the gallery for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GalleryFrame {
    Empty {
        message: String,
    },
    Carousel {
        /// Rotation applied to the cylinder.
        rotation: f32,
        active_index: usize,
        interactive: bool,
        cards: Vec<CardView>,
        nav: Vec<NavButton>,
        detail: Option<DetailView>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub media: String,
    pub status: ProjectStatus,
    pub accent: String,
    /// Static placement around the cylinder axis.
    pub angle: f32,
    pub translate_z: f32,
    pub weight: VisualWeight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavButton {
    pub index: usize,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub media: String,
    pub technologies: Vec<String>,
    pub year: String,
    pub status: ProjectStatus,
    pub badge: &'static str,
    pub links: ExternalLinks,
}
