//! Raster tile fetching and stitching
//!
//! Tiles follow the Web Mercator XYZ scheme: 256px squares, 2^z per axis.

use crate::constants::api::TILE_SUBDOMAINS;
use crate::constants::USER_AGENT;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::f64::consts::PI;
use std::time::Duration;
use tracing::debug;

pub const TILE_SIZE: u32 = 256;

/// Source of raster tiles
pub trait TileSource {
    /// Fetch tile (x, y) at zoom `z` from `layer`
    fn tile(&self, layer: &str, z: u8, x: u32, y: u32) -> Result<RgbaImage>;
}

/// Tile server reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpTileSource {
    client: reqwest::blocking::Client,
    url_template: String,
}

impl HttpTileSource {
    /// `url_template` may contain `{s}`, `{layer}`, `{z}`, `{x}` and `{y}`
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }

    fn tile_url(&self, layer: &str, z: u8, x: u32, y: u32) -> String {
        let subdomain = TILE_SUBDOMAINS[((x + y) as usize) % TILE_SUBDOMAINS.len()];
        self.url_template
            .replace("{s}", subdomain)
            .replace("{layer}", layer)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl TileSource for HttpTileSource {
    fn tile(&self, layer: &str, z: u8, x: u32, y: u32) -> Result<RgbaImage> {
        let url = self.tile_url(layer, z, x, y);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::Render(format!("Tile request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Render(format!(
                "Tile server returned {} for {}",
                response.status(),
                url
            )));
        }

        let bytes = response.bytes()?;
        let tile = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?.to_rgba8();
        Ok(tile)
    }
}

/// Position of a coordinate in global pixel space at `zoom`
pub fn world_pixel(point: Coordinates, zoom: u8) -> (f64, f64) {
    let world = TILE_SIZE as f64 * (1u64 << zoom) as f64;
    let lat = point.lat.to_radians();
    let x = (point.lng + 180.0) / 360.0 * world;
    let y = (1.0 - lat.tan().asinh() / PI) / 2.0 * world;
    (x, y)
}

/// Stitch a `width` x `height` image centered on `center`
///
/// Rows above or below the projection stay `background`; columns wrap
/// around the antimeridian.
pub fn stitch(
    source: &dyn TileSource,
    layer: &str,
    center: Coordinates,
    zoom: u8,
    width: u32,
    height: u32,
    background: Rgba<u8>,
) -> Result<RgbaImage> {
    let mut canvas = RgbaImage::from_pixel(width, height, background);
    let tile = TILE_SIZE as i64;
    let tiles_per_axis = 1i64 << zoom;

    let (cx, cy) = world_pixel(center, zoom);
    let left = (cx - width as f64 / 2.0).floor() as i64;
    let top = (cy - height as f64 / 2.0).floor() as i64;

    let first_x = left.div_euclid(tile);
    let last_x = (left + width as i64 - 1).div_euclid(tile);
    let first_y = top.div_euclid(tile);
    let last_y = (top + height as i64 - 1).div_euclid(tile);

    let mut fetched = 0;
    for ty in first_y..=last_y {
        if ty < 0 || ty >= tiles_per_axis {
            continue;
        }
        for tx in first_x..=last_x {
            let wrapped = tx.rem_euclid(tiles_per_axis);
            let mut image = source.tile(layer, zoom, wrapped as u32, ty as u32)?;
            if image.dimensions() != (TILE_SIZE, TILE_SIZE) {
                image = imageops::resize(&image, TILE_SIZE, TILE_SIZE, FilterType::Triangle);
            }

            imageops::replace(&mut canvas, &image, tx * tile - left, ty * tile - top);
            fetched += 1;
        }
    }

    debug!("Stitched {} tile(s) of {} at zoom {}", fetched, layer, zoom);
    Ok(canvas)
}
