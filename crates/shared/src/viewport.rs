use crate::models::LatLng;
use crate::tiles::{self, PlacedTile};

/// What part of the world the map shows: a center and an integer zoom.
/// Container coordinates are pixels from the map element's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl Viewport {
    pub const fn new(center: LatLng, zoom: u8) -> Self {
        Self { center, zoom }
    }

    /// World pixel of the container's top-left corner.
    fn origin(&self, width: f64, height: f64) -> (f64, f64) {
        let (cx, cy) = tiles::project(self.center, self.zoom);
        (cx - width / 2.0, cy - height / 2.0)
    }

    /// Lat/lng under a container pixel, longitude wrapped to [-180, 180).
    /// Points above or below the world clamp to its edge.
    pub fn container_to_latlng(&self, x: f64, y: f64, width: f64, height: f64) -> LatLng {
        let (ox, oy) = self.origin(width, height);
        let p = tiles::unproject(ox + x, oy + y, self.zoom);
        LatLng::new(
            p.lat.clamp(-tiles::MAX_LATITUDE, tiles::MAX_LATITUDE),
            tiles::wrap_lng(p.lng),
        )
    }

    /// Container pixel of `p`. Picks the world copy nearest the center so
    /// markers stay visible when the map is panned across the antimeridian.
    pub fn latlng_to_container(&self, p: LatLng, width: f64, height: f64) -> (f64, f64) {
        let size = tiles::world_size(self.zoom);
        let (ox, oy) = self.origin(width, height);
        let (cx, _) = tiles::project(self.center, self.zoom);
        let (mut px, py) = tiles::project(p, self.zoom);
        while px - cx > size / 2.0 {
            px -= size;
        }
        while cx - px > size / 2.0 {
            px += size;
        }
        (px - ox, py - oy)
    }

    /// Shift the view so content moves by `(dx, dy)` container pixels,
    /// as when dragging the map.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let size = tiles::world_size(self.zoom);
        let (cx, cy) = tiles::project(self.center, self.zoom);
        let y = (cy - dy).clamp(0.0, size);
        let p = tiles::unproject(cx - dx, y, self.zoom);
        self.center = LatLng::new(p.lat, tiles::wrap_lng(p.lng));
    }

    /// Change zoom while keeping the point under `(x, y)` fixed on screen.
    pub fn zoom_at(&mut self, zoom: u8, x: f64, y: f64, width: f64, height: f64) {
        if zoom == self.zoom {
            return;
        }
        let (ox, oy) = self.origin(width, height);
        let anchor = tiles::unproject(ox + x, oy + y, self.zoom);
        let (ax, ay) = tiles::project(anchor, zoom);
        let size = tiles::world_size(zoom);
        let cx = ax - (x - width / 2.0);
        let cy = (ay - (y - height / 2.0)).clamp(0.0, size);
        let c = tiles::unproject(cx, cy, zoom);
        self.center = LatLng::new(c.lat, tiles::wrap_lng(c.lng));
        self.zoom = zoom;
    }

    /// Recenter on `target` at `zoom`.
    pub fn navigate_to(&mut self, target: LatLng, zoom: u8) {
        self.center = target;
        self.zoom = zoom;
    }

    pub fn tiles(&self, width: f64, height: f64) -> Vec<PlacedTile> {
        tiles::visible_tiles(self.center, self.zoom, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 800.0;
    const H: f64 = 600.0;

    fn london() -> Viewport {
        Viewport::new(LatLng::new(51.505, -0.09), 13)
    }

    fn close(a: LatLng, b: LatLng) -> bool {
        (a.lat - b.lat).abs() < 1e-9 && (a.lng - b.lng).abs() < 1e-9
    }

    #[test]
    fn test_container_center_is_viewport_center() {
        let v = london();
        let p = v.container_to_latlng(W / 2.0, H / 2.0, W, H);
        assert!(close(p, v.center));
    }

    #[test]
    fn test_click_outside_world_clamps_latitude() {
        let v = Viewport::new(LatLng::new(0.0, 0.0), 1);
        // The world is 512px tall, so the top of a 1200px container is empty
        let top = v.container_to_latlng(400.0, 0.0, 800.0, 1200.0);
        let bottom = v.container_to_latlng(400.0, 1200.0, 800.0, 1200.0);
        assert!((top.lat - tiles::MAX_LATITUDE).abs() < 1e-9);
        assert!((bottom.lat + tiles::MAX_LATITUDE).abs() < 1e-9);
    }

    #[test]
    fn test_container_round_trip() {
        let v = london();
        let p = v.container_to_latlng(123.0, 456.0, W, H);
        let (x, y) = v.latlng_to_container(p, W, H);
        assert!((x - 123.0).abs() < 1e-6);
        assert!((y - 456.0).abs() < 1e-6);
    }

    #[test]
    fn test_north_is_up() {
        let v = london();
        let top = v.container_to_latlng(W / 2.0, 0.0, W, H);
        let bottom = v.container_to_latlng(W / 2.0, H, W, H);
        assert!(top.lat > bottom.lat);
        let left = v.container_to_latlng(0.0, H / 2.0, W, H);
        let right = v.container_to_latlng(W, H / 2.0, W, H);
        assert!(right.lng > left.lng);
    }

    #[test]
    fn test_click_past_antimeridian_wraps() {
        let v = Viewport::new(LatLng::new(0.0, 179.99), 3);
        let p = v.container_to_latlng(W, H / 2.0, W, H);
        assert!(p.lng < 0.0 && p.lng >= -180.0);
    }

    #[test]
    fn test_marker_across_antimeridian_uses_nearest_copy() {
        let v = Viewport::new(LatLng::new(0.0, 179.0), 5);
        let (x, _) = v.latlng_to_container(LatLng::new(0.0, -179.0), W, H);
        // 2 degrees east of center, not a world away
        assert!(x > W / 2.0 && x < W);
    }

    #[test]
    fn test_pan_by_moves_content() {
        let mut v = london();
        let before = v.container_to_latlng(300.0, 200.0, W, H);
        v.pan_by(50.0, -20.0);
        let (x, y) = v.latlng_to_container(before, W, H);
        assert!((x - 350.0).abs() < 1e-6);
        assert!((y - 180.0).abs() < 1e-6);
        assert_eq!(v.zoom, 13);
    }

    #[test]
    fn test_pan_clamps_at_poles() {
        let mut v = Viewport::new(LatLng::new(80.0, 0.0), 2);
        v.pan_by(0.0, 10_000.0);
        assert!(v.center.lat <= tiles::MAX_LATITUDE + 1e-9);
        assert!(v.center.lat.is_finite());
    }

    #[test]
    fn test_zoom_at_keeps_anchor_fixed() {
        let mut v = london();
        let anchor = v.container_to_latlng(200.0, 150.0, W, H);
        v.zoom_at(14, 200.0, 150.0, W, H);
        assert_eq!(v.zoom, 14);
        let (x, y) = v.latlng_to_container(anchor, W, H);
        assert!((x - 200.0).abs() < 1e-6);
        assert!((y - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_at_center_keeps_center() {
        let mut v = london();
        let center = v.center;
        v.zoom_at(10, W / 2.0, H / 2.0, W, H);
        assert!(close(v.center, center));
    }

    #[test]
    fn test_navigate_to() {
        let mut v = Viewport::new(LatLng::new(0.0, 0.0), 3);
        v.navigate_to(LatLng::new(48.85, 2.35), 13);
        assert_eq!(v, Viewport::new(LatLng::new(48.85, 2.35), 13));
    }
}
