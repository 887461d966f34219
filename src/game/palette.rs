//! Bubble color tables and the per-level palette.
//!
//! Bubbles are drawn as a light fill inside a dark outline. Whether a color
//! counts as "light" or "dark" is decided by its relative luminance after
//! sRGB linearization, so the split survives palette edits. The palette for
//! a level is an immutable value injected into the board at construction,
//! which keeps tests deterministic (fixed palettes, seeded RNGs).

use bevy::prelude::*;
use rand::Rng;
use rand::seq::SliceRandom;

use super::config::ConfigError;

/// Board background color, also used for the window clear color.
pub fn background() -> Color {
    Color::srgb_u8(0xB8, 0xBE, 0xE0)
}

/// The master table of bubble colors (background excluded).
pub fn all_colors() -> [Color; 13] {
    [
        Color::srgb_u8(0x73, 0x82, 0x90), // grey
        Color::srgb_u8(0xFF, 0xFC, 0xF7), // white
        Color::srgb_u8(0x0A, 0x09, 0x08), // black
        Color::srgb_u8(0x2E, 0x28, 0x2A), // brown
        Color::srgb_u8(0x8B, 0x43, 0xCC), // purple
        Color::srgb_u8(0xE8, 0xD9, 0x15), // yellow
        Color::srgb_u8(0xA1, 0xB5, 0xD8), // blue
        Color::srgb_u8(0xF3, 0x8D, 0x68), // orange
        Color::srgb_u8(0x43, 0xB4, 0xA4), // cyan
        Color::srgb_u8(0xE4, 0xF0, 0xD0), // light green
        Color::srgb_u8(0xC2, 0xD8, 0xB9), // green
        Color::srgb_u8(0xE5, 0x62, 0x5E), // red
        Color::srgb_u8(0xFF, 0xB8, 0xD1), // pink
    ]
}

fn linearize(c: f32) -> f32 {
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a color, computed on linearized sRGB channels.
pub fn relative_luminance(color: Color) -> f32 {
    let s = color.to_srgba();
    0.2126 * linearize(s.red) + 0.7152 * linearize(s.green) + 0.0722 * linearize(s.blue)
}

/// A color is dark iff its relative luminance is below 0.5.
pub fn is_dark(color: Color) -> bool {
    relative_luminance(color) < 0.5
}

/// A bubble's visual identity: light fill inside a dark outline.
///
/// Two bubbles match for cluster purposes only when both components are
/// exactly equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPair {
    pub fill: Color,
    pub outline: Color,
}

/// The immutable color subset a level plays with.
#[derive(Debug, Clone)]
pub struct LevelPalette {
    colors: Vec<Color>,
}

impl LevelPalette {
    /// Sample the palette for a level: `min(4 + level, 13)` distinct colors.
    ///
    /// The sample is topped up from the master table if it happens to miss
    /// one of the shade classes, so a palette can always produce pairs.
    pub fn for_level(level: u32, rng: &mut impl Rng) -> Self {
        let mut pool = all_colors().to_vec();
        pool.shuffle(rng);
        let k = (4 + level as usize).min(pool.len());
        let mut colors: Vec<Color> = pool.iter().take(k).copied().collect();

        if !colors.iter().copied().any(is_dark) {
            if let Some(dark) = pool.iter().copied().find(|c| is_dark(*c)) {
                colors.push(dark);
            }
        }
        if !colors.iter().copied().any(|c| !is_dark(c)) {
            if let Some(light) = pool.iter().copied().find(|c| !is_dark(*c)) {
                colors.push(light);
            }
        }

        Self { colors }
    }

    /// Build a palette from explicit colors. Fails when either shade class
    /// is missing, since such a palette could never color a bubble.
    pub fn from_colors(colors: Vec<Color>) -> Result<Self, ConfigError> {
        if !colors.iter().copied().any(is_dark) {
            return Err(ConfigError::PaletteMissingShade { shade: "dark" });
        }
        if !colors.iter().copied().any(|c| !is_dark(c)) {
            return Err(ConfigError::PaletteMissingShade { shade: "light" });
        }
        Ok(Self { colors })
    }

    /// The light (fill-eligible) subset.
    pub fn light(&self) -> Vec<Color> {
        self.colors.iter().copied().filter(|c| !is_dark(*c)).collect()
    }

    /// The dark (outline-eligible) subset.
    pub fn dark(&self) -> Vec<Color> {
        self.colors.iter().copied().filter(|c| is_dark(*c)).collect()
    }

    /// Draw a random fill/outline pair for a new bubble.
    pub fn random_pair(&self, rng: &mut impl Rng) -> ColorPair {
        let light = self.light();
        let dark = self.dark();
        ColorPair {
            fill: light[rng.random_range(0..light.len())],
            outline: dark[rng.random_range(0..dark.len())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn luminance_split_matches_obvious_colors() {
        assert!(is_dark(Color::srgb_u8(0x0A, 0x09, 0x08)));
        assert!(is_dark(Color::srgb_u8(0x8B, 0x43, 0xCC)));
        assert!(!is_dark(Color::srgb_u8(0xFF, 0xFC, 0xF7)));
        assert!(!is_dark(Color::srgb_u8(0xE4, 0xF0, 0xD0)));
    }

    #[test]
    fn master_table_has_both_shades() {
        let all = all_colors();
        assert!(all.iter().copied().any(is_dark));
        assert!(all.iter().copied().any(|c| !is_dark(c)));
    }

    #[test]
    fn level_palette_always_yields_pairs() {
        for level in 1..10 {
            let mut rng = StdRng::seed_from_u64(level as u64);
            let palette = LevelPalette::for_level(level, &mut rng);
            assert!(!palette.light().is_empty(), "level {level} lacks lights");
            assert!(!palette.dark().is_empty(), "level {level} lacks darks");

            let pair = palette.random_pair(&mut rng);
            assert!(!is_dark(pair.fill));
            assert!(is_dark(pair.outline));
        }
    }

    #[test]
    fn level_palette_grows_with_level() {
        let mut rng = StdRng::seed_from_u64(7);
        let small = LevelPalette::for_level(1, &mut rng);
        let full = LevelPalette::for_level(20, &mut rng);
        assert!(small.colors.len() >= 5);
        assert_eq!(full.colors.len(), 13);
    }

    #[test]
    fn explicit_palette_requires_both_shades() {
        let only_dark = vec![Color::srgb_u8(0x0A, 0x09, 0x08)];
        assert!(LevelPalette::from_colors(only_dark).is_err());

        let mixed = vec![
            Color::srgb_u8(0x0A, 0x09, 0x08),
            Color::srgb_u8(0xFF, 0xFC, 0xF7),
        ];
        assert!(LevelPalette::from_colors(mixed).is_ok());
    }
}
