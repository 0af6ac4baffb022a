//! Map rendering
//!
//! Renders a circular, stylized map centered on a coordinate:
//! - Stitch label-free raster tiles around the center
//! - Apply the preset's tone to every pixel
//! - Crop to a circle on the preset background, with a thin ring
//! - Encode as PNG and write a transient file next to the buffer

pub mod preset;
pub mod tiles;

use crate::error::{Error, Result};
use crate::geo::Coordinates;
use chrono::Local;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use preset::Preset;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tiles::{stitch, TileSource};
use tracing::{debug, info, warn};

/// Trait for map renderers
pub trait MapRenderer {
    /// Render a map of `center` in the style of `preset`
    fn render(&self, center: Coordinates, preset: &Preset) -> Result<RenderedMap>;
}

/// A rendered PNG, in memory and on disk
///
/// The file is removed when the value is dropped unless `keep` was called.
#[derive(Debug)]
pub struct RenderedMap {
    bytes: Vec<u8>,
    path: PathBuf,
    preset: &'static str,
    keep: bool,
}

impl RenderedMap {
    pub fn new(bytes: Vec<u8>, path: PathBuf, preset: &'static str) -> Self {
        Self {
            bytes,
            path,
            preset,
            keep: false,
        }
    }

    /// PNG bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn preset(&self) -> &'static str {
        self.preset
    }

    /// Leave the file on disk after drop and return its path
    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        self.path.clone()
    }
}

impl Drop for RenderedMap {
    fn drop(&mut self) {
        if self.keep || !self.path.exists() {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed {}", self.path.display()),
            Err(e) => warn!("Could not remove {}: {}", self.path.display(), e),
        }
    }
}

/// Output geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub zoom: u8,
}

/// Renderer backed by a raster tile source
pub struct TileMapRenderer<'a> {
    tiles: &'a dyn TileSource,
    settings: RenderSettings,
    out_dir: PathBuf,
}

impl<'a> TileMapRenderer<'a> {
    pub fn new(tiles: &'a dyn TileSource, settings: RenderSettings, out_dir: PathBuf) -> Self {
        Self {
            tiles,
            settings,
            out_dir,
        }
    }

    fn output_path(&self, preset: &Preset) -> PathBuf {
        self.out_dir.join(format!(
            "guessmap_{}_{}.png",
            Local::now().format("%Y%m%d-%H%M%S"),
            preset.name
        ))
    }
}

impl MapRenderer for TileMapRenderer<'_> {
    fn render(&self, center: Coordinates, preset: &Preset) -> Result<RenderedMap> {
        center.validate()?;
        let RenderSettings {
            width,
            height,
            zoom,
        } = self.settings;
        if width == 0 || height == 0 {
            return Err(Error::Render(format!("Invalid image size {}x{}", width, height)));
        }

        info!("Rendering {} map at zoom {} around {}", preset.name, zoom, center);
        let background = rgba(preset.background);
        let mut canvas = stitch(self.tiles, preset.layer, center, zoom, width, height, background)?;

        for pixel in canvas.pixels_mut() {
            *pixel = preset.tone.apply(*pixel);
        }
        crop_circle(&mut canvas, background, rgba(preset.ring));

        let bytes = encode_png(canvas)?;
        let path = self.output_path(preset);
        fs::write(&path, &bytes)
            .map_err(|e| Error::Render(format!("Failed to write {}: {}", path.display(), e)))?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());

        Ok(RenderedMap::new(bytes, path, preset.name))
    }
}

fn rgba([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

/// Paint everything outside the inscribed circle with `background`
fn crop_circle(canvas: &mut RgbaImage, background: Rgba<u8>, ring: Rgba<u8>) {
    let (width, height) = canvas.dimensions();
    let short_side = width.min(height) as f64;
    let margin = (short_side / 20.0).floor();
    let radius = short_side / 2.0 - margin;
    let ring_width = (short_side / 200.0).max(1.0);
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);

    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - cx;
        let dy = y as f64 + 0.5 - cy;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > radius {
            *pixel = background;
        } else if distance > radius - ring_width {
            *pixel = ring;
        }
    }
}

fn encode_png(canvas: RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .to_rgb8()
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::preset::find_preset;
    use crate::render::tiles::tests::CheckerTiles;
    use tempfile::TempDir;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn settings() -> RenderSettings {
        RenderSettings {
            width: 300,
            height: 300,
            zoom: 13,
        }
    }

    #[test]
    fn test_render_writes_png() {
        let dir = TempDir::new().unwrap();
        let tiles = CheckerTiles::new();
        let renderer = TileMapRenderer::new(&tiles, settings(), dir.path().to_path_buf());
        let preset = find_preset("noir").unwrap();

        let map = renderer.render(Coordinates::new(45.9, 6.12), preset).unwrap();
        assert!(map.bytes().starts_with(&PNG_SIGNATURE));
        assert!(map.path().exists());
        assert_eq!(map.preset(), "noir");
        assert!(map
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("_noir.png"));

        let decoded = image::load_from_memory(map.bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (300, 300));
    }

    #[test]
    fn test_drop_removes_file_unless_kept() {
        let dir = TempDir::new().unwrap();
        let tiles = CheckerTiles::new();
        let renderer = TileMapRenderer::new(&tiles, settings(), dir.path().to_path_buf());
        let preset = find_preset("default").unwrap();

        let map = renderer.render(Coordinates::new(10.0, 10.0), preset).unwrap();
        let path = map.path().to_path_buf();
        drop(map);
        assert!(!path.exists());

        let map = renderer.render(Coordinates::new(10.0, 10.0), preset).unwrap();
        let kept = map.keep();
        assert!(kept.exists());
    }

    #[test]
    fn test_invalid_center_is_rejected() {
        let dir = TempDir::new().unwrap();
        let tiles = CheckerTiles::new();
        let renderer = TileMapRenderer::new(&tiles, settings(), dir.path().to_path_buf());
        let preset = find_preset("default").unwrap();

        assert!(renderer.render(Coordinates::new(120.0, 0.0), preset).is_err());
        assert_eq!(tiles.calls.get(), 0);
    }

    #[test]
    fn test_crop_circle() {
        let background = Rgba([0, 0, 0, 255]);
        let ring = Rgba([255, 0, 0, 255]);
        let mut canvas = RgbaImage::from_pixel(200, 200, Rgba([9, 9, 9, 255]));
        crop_circle(&mut canvas, background, ring);

        assert_eq!(*canvas.get_pixel(0, 0), background);
        assert_eq!(*canvas.get_pixel(100, 100), Rgba([9, 9, 9, 255]));
        // Radius is 90, ring is 1px wide
        assert_eq!(*canvas.get_pixel(100, 10), ring);
    }
}
