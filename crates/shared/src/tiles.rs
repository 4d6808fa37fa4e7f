//! Web Mercator slippy-map math.
//!
//! World pixel space at zoom `z` is a square of `256 * 2^z` pixels, origin
//! top-left (lng -180, lat +85.05), Y growing south. Tiles are 256x256
//! images addressed by `z/x/y`.

use std::f64::consts::PI;

use crate::models::LatLng;

pub const TILE_SIZE: f64 = 256.0;

/// Latitude at which the Mercator square is cut off.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Side length of the world in pixels at `zoom`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2f64.powi(i32::from(zoom))
}

/// Number of tiles per axis at `zoom`, saturating past zoom 62.
pub fn tile_count(zoom: u8) -> i64 {
    1i64 << zoom.min(62)
}

/// Wrap a longitude into [-180, 180).
pub fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Lat/lng to world pixels at `zoom`. Latitude is clamped to the Mercator
/// square; longitude is not wrapped.
pub fn project(p: LatLng, zoom: u8) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (p.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

/// World pixels at `zoom` back to lat/lng. Longitude is not wrapped.
pub fn unproject(x: f64, y: f64, zoom: u8) -> LatLng {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * y / size);
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: i64,
    pub y: i64,
    pub z: u8,
}

/// A tile together with its top-left corner in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedTile {
    pub tile: TileCoord,
    pub left: f64,
    pub top: f64,
}

/// Every tile intersecting a `width` x `height` container centered on
/// `center`. Columns wrap around the antimeridian; rows outside the world
/// are skipped.
pub fn visible_tiles(center: LatLng, zoom: u8, width: f64, height: f64) -> Vec<PlacedTile> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let (cx, cy) = project(center, zoom);
    let origin_x = cx - width / 2.0;
    let origin_y = cy - height / 2.0;

    let min_tx = (origin_x / TILE_SIZE).floor() as i64;
    let max_tx = ((origin_x + width) / TILE_SIZE).ceil() as i64;
    let min_ty = (origin_y / TILE_SIZE).floor() as i64;
    let max_ty = ((origin_y + height) / TILE_SIZE).ceil() as i64;
    let n = tile_count(zoom);

    let mut tiles = Vec::new();
    for ty in min_ty.max(0)..max_ty.min(n) {
        for tx in min_tx..max_tx {
            tiles.push(PlacedTile {
                tile: TileCoord {
                    x: tx.rem_euclid(n),
                    y: ty,
                    z: zoom,
                },
                left: tx as f64 * TILE_SIZE - origin_x,
                top: ty as f64 * TILE_SIZE - origin_y,
            });
        }
    }
    tiles
}

/// Expand `{s}`, `{z}`, `{x}` and `{y}` in a tile URL template.
/// Subdomains rotate with the tile position to spread requests.
pub fn tile_url(template: &str, subdomains: &[String], tile: TileCoord) -> String {
    let s = if subdomains.is_empty() {
        ""
    } else {
        let idx = (tile.x + tile.y).unsigned_abs() as usize % subdomains.len();
        subdomains[idx].as_str()
    };
    template
        .replace("{s}", s)
        .replace("{z}", &tile.z.to_string())
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
}
