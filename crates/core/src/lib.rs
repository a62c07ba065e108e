//! Core library for the portfolio front page.
//!
//! Two mechanisms live here. The intro sequencer hands the page from a
//! preloader to a tile wipe to the main content, firing its completion
//! callbacks exactly once and in order. The circular gallery places project
//! cards on a rotating cylinder, navigates between them by index and shows
//! a detail overlay on selection.
//!
//! Nothing in this crate touches a render tree. Components advance in
//! host-supplied time steps and hand back plain view-models (tiles, cards,
//! frames) for a UI layer to draw.

pub mod assets;
pub mod background;
pub mod config;
pub mod error;
pub mod gallery;
pub mod host;
pub mod intro;
pub mod render;
pub mod timeline;
pub mod tween;

pub use assets::AssetStore;
pub use background::{BackgroundEffect, BackgroundKind};
pub use config::{AppConfig, GalleryConfig, IntroConfig, RevealConfig};
pub use error::{FolioError, Result};
pub use gallery::{
    load_items, parse_items, CircularGallery, ClickOutcome, ClickTarget, ExternalLinks,
    GalleryFrame, GalleryItem, GalleryViewState, LinksField, ProjectStatus, VisualWeight,
};
pub use host::{Document, Key, ListenerKind, Viewport};
pub use intro::{
    transition, BlockReveal, GridSize, IntroCallbacks, IntroEvent, IntroLayers, IntroObserver,
    IntroSequencer, Stage, Tile,
};
pub use render::{Frame, Layer, RenderGraph};
pub use timeline::{PlaybackClock, ScheduledEvent, Scheduler, TimerId};
pub use tween::{Easing, RandomOrder, SequentialOrder, StaggerOrder, Tween};
