//! Spherical Web Mercator, the projection used by OpenStreetMap style tile
//! servers. World coordinates are pixels at a given zoom level, with the
//! origin at the top left corner of tile (0, 0).
use std::f64::consts::PI;

use serde::Deserialize;

pub const TILE_SIZE: f64 = 256.0;
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

/// Width and height of the whole world in pixels.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * f64::from(1u32 << u32::from(zoom.min(30)))
}

pub fn project(position: LatLng, zoom: u8) -> WorldPoint {
    let size = world_size(zoom);
    let lat = position.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    WorldPoint {
        x: (position.lng + 180.0) / 360.0 * size,
        y: (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size,
    }
}

pub fn unproject(point: WorldPoint, zoom: u8) -> LatLng {
    let size = world_size(zoom);
    let n = PI * (1.0 - 2.0 * point.y / size);
    LatLng {
        lat: n.sinh().atan().to_degrees(),
        lng: point.x / size * 360.0 - 180.0,
    }
}

/// One map tile. `x` is not wrapped, so tiles left and right of the
/// antimeridian keep their on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub x: i64,
    pub y: i64,
    pub zoom: u8,
}

impl TileId {
    /// Top left corner of this tile in world pixels.
    #[allow(clippy::cast_precision_loss)]
    pub fn origin(&self) -> WorldPoint {
        WorldPoint {
            x: self.x as f64 * TILE_SIZE,
            y: self.y as f64 * TILE_SIZE,
        }
    }

    /// Fill in a `{s}/{z}/{x}/{y}` url template. The subdomain is picked the
    /// same way for the same tile every time so the http cache stays warm.
    pub fn url(&self, template: &str, subdomains: &[String]) -> String {
        let tiles_per_axis = 1i64 << self.zoom.min(30);
        let wrapped_x = self.x.rem_euclid(tiles_per_axis);
        let subdomain = if subdomains.is_empty() {
            ""
        } else {
            let index = (wrapped_x + self.y).unsigned_abs() % subdomains.len() as u64;
            usize::try_from(index)
                .ok()
                .and_then(|index| subdomains.get(index))
                .map_or("", String::as_str)
        };
        template
            .replace("{s}", subdomain)
            .replace("{z}", &self.zoom.to_string())
            .replace("{x}", &wrapped_x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

/// All tiles touching the rectangle spanned by the two world points. Rows
/// outside the world are skipped, columns wrap around.
#[allow(clippy::cast_possible_truncation)]
pub fn visible_tiles(top_left: WorldPoint, bottom_right: WorldPoint, zoom: u8) -> Vec<TileId> {
    let tiles_per_axis = 1i64 << zoom.min(30);
    let min_x = (top_left.x / TILE_SIZE).floor() as i64;
    let max_x = (bottom_right.x / TILE_SIZE).floor() as i64;
    let min_y = ((top_left.y / TILE_SIZE).floor() as i64).max(0);
    let max_y = ((bottom_right.y / TILE_SIZE).floor() as i64).min(tiles_per_axis - 1);

    let mut tiles = Vec::new();
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            tiles.push(TileId { x, y, zoom });
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn null_island_is_the_world_centre() {
        let p = project(LatLng { lat: 0.0, lng: 0.0 }, 0);
        assert!(close(p.x, 128.0));
        assert!(close(p.y, 128.0));
    }

    #[test]
    fn unproject_inverts_project() {
        let london = LatLng {
            lat: 51.5074,
            lng: -0.1278,
        };
        for zoom in [0, 6, 18] {
            let back = unproject(project(london, zoom), zoom);
            assert!(close(back.lat, london.lat), "zoom {zoom}: {back:?}");
            assert!(close(back.lng, london.lng), "zoom {zoom}: {back:?}");
        }
    }

    #[test]
    fn poles_are_clamped() {
        let north = project(LatLng { lat: 90.0, lng: 0.0 }, 1);
        assert!(north.y.is_finite());
        assert!(north.y.abs() < 1e-6);
    }

    #[test]
    fn tile_url_fills_template() {
        let tile = TileId { x: 31, y: 20, zoom: 6 };
        let subdomains = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        assert_eq!(
            tile.url("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", &subdomains),
            "https://a.tile.openstreetmap.org/6/31/20.png"
        );
    }

    #[test]
    fn tile_url_wraps_columns() {
        let tile = TileId { x: -1, y: 0, zoom: 2 };
        assert_eq!(tile.url("{z}/{x}/{y}", &[]), "2/3/0");
    }

    #[test]
    fn visible_tiles_cover_the_viewport() {
        let tiles = visible_tiles(
            WorldPoint { x: 100.0, y: 100.0 },
            WorldPoint { x: 600.0, y: 300.0 },
            3,
        );
        // columns 0..=2, rows 0..=1
        assert_eq!(tiles.len(), 6);
        assert!(tiles.contains(&TileId { x: 2, y: 1, zoom: 3 }));
    }

    #[test]
    fn rows_outside_the_world_are_skipped() {
        let tiles = visible_tiles(
            WorldPoint { x: 0.0, y: -500.0 },
            WorldPoint { x: 10.0, y: 1000.0 },
            1,
        );
        assert!(tiles.iter().all(|tile| (0..2).contains(&tile.y)));
        assert_eq!(tiles.len(), 2);
    }
}
