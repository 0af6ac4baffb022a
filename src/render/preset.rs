//! Visual presets
//!
//! A preset pairs a label-free base layer with a per-pixel tone and the
//! colors used around the circular crop.

use crate::error::{Error, Result};
use image::Rgba;
use rand::seq::SliceRandom;
use rand::Rng;

/// Per-pixel color transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    Natural,
    Grayscale,
    Sepia,
    /// Light areas become paper blue, dark lines turn pale
    Blueprint,
    /// Washed towards white
    Pastel,
    /// Grayscale quantized to a few levels
    Posterize { levels: u8 },
}

impl Tone {
    pub fn apply(&self, pixel: Rgba<u8>) -> Rgba<u8> {
        let [r, g, b, a] = pixel.0;
        let (rf, gf, bf) = (r as f64, g as f64, b as f64);
        let luma = 0.299 * rf + 0.587 * gf + 0.114 * bf;

        let rgb = match self {
            Self::Natural => [rf, gf, bf],
            Self::Grayscale => [luma; 3],
            Self::Sepia => [
                0.393 * rf + 0.769 * gf + 0.189 * bf,
                0.349 * rf + 0.686 * gf + 0.168 * bf,
                0.272 * rf + 0.534 * gf + 0.131 * bf,
            ],
            Self::Blueprint => {
                let t = 1.0 - luma / 255.0;
                lerp([16.0, 42.0, 92.0], [200.0, 225.0, 255.0], t)
            }
            Self::Pastel => lerp([rf, gf, bf], [255.0; 3], 0.35),
            Self::Posterize { levels } => {
                let steps = (*levels).max(2) as f64 - 1.0;
                [(luma / 255.0 * steps).round() / steps * 255.0; 3]
            }
        };

        Rgba([clamp(rgb[0]), clamp(rgb[1]), clamp(rgb[2]), a])
    }
}

fn lerp(from: [f64; 3], to: [f64; 3], t: f64) -> [f64; 3] {
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
    ]
}

fn clamp(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// A named visual style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    /// Base tile layer substituted for `{layer}` in the tile URL
    pub layer: &'static str,
    pub tone: Tone,
    /// Color outside the circular crop
    pub background: [u8; 3],
    pub ring: [u8; 3],
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "default",
        layer: "rastertiles/voyager_nolabels",
        tone: Tone::Natural,
        background: [245, 240, 225],
        ring: [60, 60, 60],
    },
    Preset {
        name: "minimal",
        layer: "light_nolabels",
        tone: Tone::Posterize { levels: 4 },
        background: [255, 255, 255],
        ring: [30, 30, 30],
    },
    Preset {
        name: "noir",
        layer: "dark_nolabels",
        tone: Tone::Grayscale,
        background: [10, 10, 10],
        ring: [220, 220, 220],
    },
    Preset {
        name: "sepia",
        layer: "rastertiles/voyager_nolabels",
        tone: Tone::Sepia,
        background: [240, 228, 200],
        ring: [90, 60, 30],
    },
    Preset {
        name: "blueprint",
        layer: "light_nolabels",
        tone: Tone::Blueprint,
        background: [16, 42, 92],
        ring: [200, 225, 255],
    },
    Preset {
        name: "pastel",
        layer: "rastertiles/voyager_nolabels",
        tone: Tone::Pastel,
        background: [255, 250, 240],
        ring: [180, 150, 170],
    },
];

/// Look up a preset by name, case-insensitively
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

/// Preset requested on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresetChoice {
    Named(&'static Preset),
    /// Uniform pick from `PRESETS` at render time
    Random,
}

impl PresetChoice {
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> &'static Preset {
        match self {
            Self::Named(preset) => preset,
            Self::Random => PRESETS.choose(rng).unwrap_or(&PRESETS[0]),
        }
    }
}

impl std::str::FromStr for PresetChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("random") {
            return Ok(Self::Random);
        }
        find_preset(s).map(Self::Named).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "Unknown preset: {} (available: random, {})",
                s,
                available_presets().join(", ")
            ))
        })
    }
}

pub fn available_presets() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::str::FromStr;

    #[test]
    fn test_find_preset_case_insensitive() {
        assert_eq!(find_preset("NOIR").unwrap().name, "noir");
        assert!(find_preset("vaporwave").is_none());
    }

    #[test]
    fn test_choice_from_str() {
        assert_eq!(PresetChoice::from_str("random").unwrap(), PresetChoice::Random);
        assert!(matches!(
            PresetChoice::from_str("Sepia").unwrap(),
            PresetChoice::Named(p) if p.name == "sepia"
        ));
        let err = PresetChoice::from_str("vaporwave").unwrap_err().to_string();
        assert!(err.contains("blueprint"));
    }

    #[test]
    fn test_random_pick_covers_presets() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(PresetChoice::Random.pick(&mut rng).name);
        }
        assert_eq!(seen.len(), PRESETS.len());
    }

    #[test]
    fn test_tones() {
        let white = Rgba([255, 255, 255, 255]);
        let red = Rgba([200, 30, 30, 255]);

        assert_eq!(Tone::Natural.apply(red), red);
        let gray = Tone::Grayscale.apply(red);
        assert_eq!(gray.0[0], gray.0[1]);
        assert_eq!(gray.0[1], gray.0[2]);
        assert_eq!(Tone::Blueprint.apply(white), Rgba([16, 42, 92, 255]));
        assert_eq!(Tone::Pastel.apply(white), white);
        assert_eq!(Tone::Sepia.apply(white), Rgba([255, 255, 239, 255]));

        let poster = Tone::Posterize { levels: 2 }.apply(Rgba([100, 100, 100, 255]));
        assert_eq!(poster, Rgba([0, 0, 0, 255]));
    }
}
