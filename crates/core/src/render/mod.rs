use serde::Serialize;

use crate::{
    background::BackgroundEffect,
    gallery::{CircularGallery, GalleryFrame},
    intro::{GridSize, IntroSequencer, Stage, Tile},
};

/// One mounted visual, listed bottom to top.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum Layer {
    Preloader(PreloaderView),
    TileGrid(TileGridView),
    Main(MainView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreloaderView {
    pub label: String,
    pub progress: u8,
    pub files: u32,
    pub time_remaining: String,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileGridView {
    pub grid: GridSize,
    pub tile_size: f32,
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainView {
    pub background: BackgroundEffect,
    pub gallery: GalleryFrame,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub stage: Stage,
    pub layers: Vec<Layer>,
}

impl Frame {
    pub fn has_preloader(&self) -> bool {
        self.layers.iter().any(|layer| matches!(layer, Layer::Preloader(_)))
    }

    pub fn has_tile_grid(&self) -> bool {
        self.layers.iter().any(|layer| matches!(layer, Layer::TileGrid(_)))
    }

    pub fn main(&self) -> Option<&MainView> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::Main(main) => Some(main),
            _ => None,
        })
    }
}

/// Composes the intro and the gallery into renderable frames. The gallery is
/// only asked for a frame once the intro has handed over to main content.
#[derive(Debug)]
pub struct RenderGraph {
    background: BackgroundEffect,
    tile_size: f32,
}

impl RenderGraph {
    pub fn new(background: BackgroundEffect, tile_size: f32) -> Self {
        Self {
            background,
            tile_size,
        }
    }

    pub fn compose(&self, intro: &IntroSequencer, gallery: &CircularGallery) -> Frame {
        let mounted = intro.layers();
        let mut layers = Vec::with_capacity(2);

        if mounted.preloader {
            let indicator = intro.indicator();
            layers.push(Layer::Preloader(PreloaderView {
                label: indicator.label(),
                progress: indicator.progress(),
                files: indicator.files_count(),
                time_remaining: indicator.time_remaining_label(),
                complete: indicator.is_complete(),
            }));
        }

        if mounted.tile_grid {
            if let Some(reveal) = intro.reveal() {
                layers.push(Layer::TileGrid(TileGridView {
                    grid: reveal.grid(),
                    tile_size: self.tile_size,
                    tiles: reveal.tiles().to_vec(),
                }));
            }
        }

        if mounted.main_content {
            layers.push(Layer::Main(MainView {
                background: self.background.clone(),
                gallery: gallery.frame(),
            }));
        }

        Frame {
            stage: intro.stage(),
            layers,
        }
    }
}
