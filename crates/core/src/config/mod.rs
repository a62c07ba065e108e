use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{background::BackgroundEffect, FolioError, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub intro: IntroConfig,
    pub gallery: GalleryConfig,
    pub background: BackgroundEffect,
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.intro.validate()?;
        self.gallery.validate()?;
        self.background.tint_rgb()?;
        Ok(())
    }
}

/// Timing for the preloader and the block reveal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Idle time after mount before the progress indicator starts.
    pub start_delay_seconds: f32,
    /// Time for progress to go from 0 to 100.
    pub progress_duration_seconds: f32,
    /// Progress duration used when reduced motion is requested.
    pub reduced_motion_duration_seconds: f32,
    pub reduced_motion: bool,
    /// Delay between progress reaching 100 and the indicator settling.
    pub settle_seconds: f32,
    /// Delay between the indicator settling and loading being signalled.
    pub signal_delay_seconds: f32,
    pub reveal: RevealConfig,
    /// Slack past the reveal's expected finish before READY is forced.
    /// Re-armed whenever a resize restarts the reveal.
    pub reveal_timeout_seconds: f32,
    /// Hard ceiling on the reveal stage, measured from entering it, so
    /// repeated resizes cannot hold the intro back indefinitely.
    pub reveal_max_seconds: f32,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            start_delay_seconds: 0.9,
            progress_duration_seconds: 7.5,
            reduced_motion_duration_seconds: 0.3,
            reduced_motion: false,
            settle_seconds: 0.1,
            signal_delay_seconds: 0.1,
            reveal: RevealConfig::default(),
            reveal_timeout_seconds: 10.0,
            reveal_max_seconds: 60.0,
        }
    }
}

impl IntroConfig {
    pub fn effective_progress_duration(&self) -> f32 {
        if self.reduced_motion {
            self.reduced_motion_duration_seconds
        } else {
            self.progress_duration_seconds
        }
    }

    fn validate(&self) -> Result<()> {
        non_negative("intro.start_delay_seconds", self.start_delay_seconds)?;
        positive(
            "intro.progress_duration_seconds",
            self.progress_duration_seconds,
        )?;
        positive(
            "intro.reduced_motion_duration_seconds",
            self.reduced_motion_duration_seconds,
        )?;
        non_negative("intro.settle_seconds", self.settle_seconds)?;
        non_negative("intro.signal_delay_seconds", self.signal_delay_seconds)?;
        positive("intro.reveal_timeout_seconds", self.reveal_timeout_seconds)?;
        positive("intro.reveal_max_seconds", self.reveal_max_seconds)?;
        self.reveal.validate()
    }
}

/// Geometry and stagger timing of the tile wipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Edge length of one square tile, in pixels.
    pub tile_size: f32,
    pub fade_in_delay_seconds: f32,
    /// Spacing between consecutive tiles in stagger order.
    pub stagger_each_seconds: f32,
    /// Fade duration of a single tile.
    pub tile_fade_seconds: f32,
    /// Time every tile stays opaque before the fade-out stagger begins.
    pub hold_seconds: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            tile_size: 100.0,
            fade_in_delay_seconds: 0.5,
            stagger_each_seconds: 0.004,
            tile_fade_seconds: 0.0005,
            hold_seconds: 1.5,
        }
    }
}

impl RevealConfig {
    fn validate(&self) -> Result<()> {
        positive("intro.reveal.tile_size", self.tile_size)?;
        non_negative("intro.reveal.fade_in_delay_seconds", self.fade_in_delay_seconds)?;
        non_negative("intro.reveal.stagger_each_seconds", self.stagger_each_seconds)?;
        non_negative("intro.reveal.tile_fade_seconds", self.tile_fade_seconds)?;
        non_negative("intro.reveal.hold_seconds", self.hold_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Cylinder radius, in pixels.
    pub radius: f32,
    pub opacity_floor: f32,
    pub scale_floor: f32,
    pub rotation_seconds: f32,
    /// Image shown in place of any media that failed to load.
    pub fallback_media: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            radius: 600.0,
            opacity_floor: 0.3,
            scale_floor: 0.7,
            rotation_seconds: 0.8,
            fallback_media: DEFAULT_FALLBACK_MEDIA.to_string(),
        }
    }
}

pub const DEFAULT_FALLBACK_MEDIA: &str = "https://images.unsplash.com/photo-1551288049-bebda4e38f71?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=80";

impl GalleryConfig {
    fn validate(&self) -> Result<()> {
        positive("gallery.radius", self.radius)?;
        unit_interval("gallery.opacity_floor", self.opacity_floor)?;
        unit_interval("gallery.scale_floor", self.scale_floor)?;
        non_negative("gallery.rotation_seconds", self.rotation_seconds)?;
        if self.fallback_media.trim().is_empty() {
            return Err(FolioError::config("gallery.fallback_media must not be empty"));
        }
        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FolioError::config(format!("{field} must be positive, got {value}")))
    }
}

fn non_negative(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FolioError::config(format!(
            "{field} must not be negative, got {value}"
        )))
    }
}

fn unit_interval(field: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FolioError::config(format!(
            "{field} must lie in [0, 1], got {value}"
        )))
    }
}
