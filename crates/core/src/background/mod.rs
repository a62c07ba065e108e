use serde::{Deserialize, Serialize};

use crate::{FolioError, Result};

/// Decorative shader backgrounds. The core only carries their props; the
/// widgets render on their own and report nothing back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    FaultyTerminal,
    Particles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundEffect {
    pub kind: BackgroundKind,
    pub scale: f32,
    /// `#rrggbb` colour the effect is tinted with.
    pub tint: String,
    pub brightness: f32,
    pub mouse_react: bool,
    pub mouse_strength: f32,
    pub glitch_amount: f32,
    pub flicker_amount: f32,
    pub scanline_intensity: f32,
    pub curvature: f32,
    pub paused: bool,
}

impl Default for BackgroundEffect {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::FaultyTerminal,
            scale: 2.0,
            tint: "#a1e799".to_string(),
            brightness: 0.7,
            mouse_react: true,
            mouse_strength: 1.0,
            glitch_amount: 1.0,
            flicker_amount: 1.0,
            scanline_intensity: 1.0,
            curvature: 0.3,
            paused: false,
        }
    }
}

impl BackgroundEffect {
    /// Quieter variant used behind the main content.
    pub fn ambient() -> Self {
        Self {
            brightness: 0.35,
            glitch_amount: 0.4,
            flicker_amount: 0.2,
            mouse_strength: 0.5,
            ..Self::default()
        }
    }

    pub fn tint_rgb(&self) -> Result<[u8; 3]> {
        parse_hex_color(&self.tint)
    }
}

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(value: &str) -> Result<[u8; 3]> {
    let digits = value.trim().trim_start_matches('#');
    // `from_str_radix` alone would accept a sign prefix such as `+f`.
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FolioError::InvalidColor(value.to_string()));
    }

    let mut rgb = [0u8; 3];
    for (slot, index) in rgb.iter_mut().zip((0..6).step_by(2)) {
        *slot = u8::from_str_radix(&digits[index..index + 2], 16)
            .map_err(|_| FolioError::InvalidColor(value.to_string()))?;
    }
    Ok(rgb)
}
