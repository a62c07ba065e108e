use serde::Serialize;

use crate::{
    config::RevealConfig,
    host::Viewport,
    tween::{stagger_delays, Easing, StaggerOrder, Tween},
};

/// Number of tile columns and rows needed to cover a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSize {
    pub cols: usize,
    pub rows: usize,
}

impl GridSize {
    pub fn cover(viewport: Viewport, tile_size: f32) -> Self {
        if tile_size <= 0.0 || !tile_size.is_finite() {
            return Self { cols: 0, rows: 0 };
        }
        Self {
            cols: (viewport.width / tile_size).ceil() as usize,
            rows: (viewport.height / tile_size).ceil() as usize,
        }
    }

    pub fn tile_count(&self) -> usize {
        self.cols * self.rows
    }
}

/// One square of the wipe, laid out row-major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tile {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RevealPhase {
    Waiting,
    FadingIn,
    Holding,
    FadingOut,
    Finished,
}

/// Tile wipe played between the preloader and the main content.
///
/// The grid is a plain list of [`Tile`] view-models; the renderer draws
/// them and never feeds anything back. A resize throws the running
/// animation away and restarts it for the new grid, so completion is only
/// ever reported by the run that actually finishes.
#[derive(Debug)]
pub struct BlockReveal {
    config: RevealConfig,
    grid: GridSize,
    tiles: Vec<Tile>,
    fade_in: Vec<Tween>,
    fade_out: Vec<Tween>,
    fade_in_end: f32,
    fade_out_start: f32,
    finish_time: f32,
    elapsed: f32,
    generation: u32,
    detached: bool,
    completed: bool,
}

impl BlockReveal {
    pub fn new(config: RevealConfig, viewport: Viewport, order: &mut dyn StaggerOrder) -> Self {
        let mut reveal = Self::empty(config);
        reveal.rebuild(viewport, order);
        reveal
    }

    /// Reveal without a container to draw into. It has no tiles and
    /// completes on its first advance.
    pub fn detached(config: RevealConfig) -> Self {
        Self {
            detached: true,
            ..Self::empty(config)
        }
    }

    fn empty(config: RevealConfig) -> Self {
        Self {
            config,
            grid: GridSize { cols: 0, rows: 0 },
            tiles: Vec::new(),
            fade_in: Vec::new(),
            fade_out: Vec::new(),
            fade_in_end: 0.0,
            fade_out_start: 0.0,
            finish_time: 0.0,
            elapsed: 0.0,
            generation: 0,
            detached: false,
            completed: false,
        }
    }

    fn rebuild(&mut self, viewport: Viewport, order: &mut dyn StaggerOrder) {
        let cfg = &self.config;
        let grid = GridSize::cover(viewport, cfg.tile_size);
        let count = grid.tile_count();
        let span = if count == 0 {
            0.0
        } else {
            (count - 1) as f32 * cfg.stagger_each_seconds + cfg.tile_fade_seconds
        };

        let fade_in_end = cfg.fade_in_delay_seconds + span;
        let fade_out_start = fade_in_end + cfg.hold_seconds;

        // Appearance and disappearance use independent orders.
        let in_delays = stagger_delays(
            &order.order(count),
            cfg.fade_in_delay_seconds,
            cfg.stagger_each_seconds,
        );
        let out_delays = stagger_delays(&order.order(count), fade_out_start, cfg.stagger_each_seconds);

        self.fade_in = in_delays
            .into_iter()
            .map(|delay| Tween::new(0.0, 1.0, cfg.tile_fade_seconds, Easing::Power2Out).with_delay(delay))
            .collect();
        self.fade_out = out_delays
            .into_iter()
            .map(|delay| Tween::new(1.0, 0.0, cfg.tile_fade_seconds, Easing::Power2In).with_delay(delay))
            .collect();
        self.tiles = (0..count)
            .map(|index| Tile {
                index,
                row: index / grid.cols.max(1),
                col: index % grid.cols.max(1),
                opacity: 0.0,
            })
            .collect();

        self.grid = grid;
        self.fade_in_end = fade_in_end;
        self.fade_out_start = fade_out_start;
        self.finish_time = fade_out_start + span;
        self.elapsed = 0.0;
    }

    /// Regenerates the grid for a new viewport and restarts the animation.
    /// Returns `false` once the reveal has already completed.
    pub fn resize(&mut self, viewport: Viewport, order: &mut dyn StaggerOrder) -> bool {
        if self.completed || self.detached {
            return false;
        }
        self.generation += 1;
        self.rebuild(viewport, order);
        tracing::debug!(
            generation = self.generation,
            cols = self.grid.cols,
            rows = self.grid.rows,
            "regenerated reveal grid"
        );
        true
    }

    /// Advances the animation. Returns `true` exactly once, on the tick the
    /// last tile finishes fading out.
    pub fn advance(&mut self, delta: f32) -> bool {
        if self.completed {
            return false;
        }
        self.elapsed += delta.max(0.0);

        if self.detached || self.elapsed >= self.finish_time {
            for tile in &mut self.tiles {
                tile.opacity = 0.0;
            }
            self.completed = true;
            return true;
        }

        let elapsed = self.elapsed;
        for ((tile, fade_in), fade_out) in self.tiles.iter_mut().zip(&self.fade_in).zip(&self.fade_out) {
            tile.opacity = fade_in.value_at(elapsed).min(fade_out.value_at(elapsed));
        }
        false
    }

    pub fn phase(&self) -> RevealPhase {
        if self.completed {
            RevealPhase::Finished
        } else if self.elapsed < self.config.fade_in_delay_seconds {
            RevealPhase::Waiting
        } else if self.elapsed < self.fade_in_end {
            RevealPhase::FadingIn
        } else if self.elapsed < self.fade_out_start {
            RevealPhase::Holding
        } else {
            RevealPhase::FadingOut
        }
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of times the grid has been regenerated by a resize.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Time from the latest (re)start until completion.
    pub fn finish_time(&self) -> f32 {
        self.finish_time
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
