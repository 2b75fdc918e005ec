use crate::model::markers::{Marker, MarkerSet};
use crate::projection::{self, project, unproject, LatLng, TileId, WorldPoint, TILE_SIZE};

/// Where the map is looking. Screen positions are relative to the rect the
/// map is drawn into, the map centre sits in the middle of that rect.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    pub max_zoom: u8,
}

impl MapView {
    pub fn new(center: LatLng, zoom: u8, max_zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.min(max_zoom),
            max_zoom,
        }
    }

    fn world_center(&self) -> WorldPoint {
        project(self.center, self.zoom)
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn world_to_screen(&self, world: WorldPoint, rect: egui::Rect) -> egui::Pos2 {
        let center = self.world_center();
        rect.center() + egui::vec2((world.x - center.x) as f32, (world.y - center.y) as f32)
    }

    pub fn screen_to_world(&self, screen: egui::Pos2, rect: egui::Rect) -> WorldPoint {
        let center = self.world_center();
        let offset = screen - rect.center();
        WorldPoint {
            x: center.x + f64::from(offset.x),
            y: center.y + f64::from(offset.y),
        }
    }

    pub fn to_screen(&self, position: LatLng, rect: egui::Rect) -> egui::Pos2 {
        self.world_to_screen(project(position, self.zoom), rect)
    }

    pub fn from_screen(&self, screen: egui::Pos2, rect: egui::Rect) -> LatLng {
        unproject(self.screen_to_world(screen, rect), self.zoom)
    }

    /// Move the map content by `delta` screen pixels, as when dragging.
    pub fn pan_by(&mut self, delta: egui::Vec2) {
        if delta == egui::Vec2::ZERO {
            return;
        }
        let center = self.world_center();
        let moved = unproject(
            WorldPoint {
                x: center.x - f64::from(delta.x),
                y: center.y - f64::from(delta.y),
            },
            self.zoom,
        );
        self.center = LatLng {
            lat: moved.lat,
            lng: (moved.lng + 180.0).rem_euclid(360.0) - 180.0,
        };
    }

    /// Zoom in (positive) or out (negative) by whole levels, keeping the
    /// spot under `anchor` where it is.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn zoom_around(&mut self, steps: i32, anchor: egui::Pos2, rect: egui::Rect) {
        let zoom = (i32::from(self.zoom) + steps).clamp(0, i32::from(self.max_zoom)) as u8;
        if zoom == self.zoom {
            return;
        }
        // as per https://www.youtube.com/watch?v=ZQ8qtAizis4
        let anchor_position = self.from_screen(anchor, rect);
        self.zoom = zoom;
        let drift = self.to_screen(anchor_position, rect) - anchor;
        self.pan_by(-drift);
    }

    pub fn visible_tiles(&self, rect: egui::Rect) -> Vec<TileId> {
        projection::visible_tiles(
            self.screen_to_world(rect.left_top(), rect),
            self.screen_to_world(rect.right_bottom(), rect),
            self.zoom,
        )
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn tile_rect(&self, tile: TileId, rect: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_size(
            self.world_to_screen(tile.origin(), rect),
            egui::Vec2::splat(TILE_SIZE as f32),
        )
    }
}

/// The topmost marker under `pointer`. Tiny markers stay hoverable thanks to
/// the `tolerance`, which is usually half the stroke width.
#[allow(clippy::cast_possible_truncation)]
pub fn marker_at<'a>(
    view: &MapView,
    markers: &'a MarkerSet,
    pointer: egui::Pos2,
    rect: egui::Rect,
    tolerance: f32,
) -> Option<&'a Marker> {
    markers.iter().rev().find(|marker| {
        let center = view.to_screen(marker.position, rect);
        center.distance(pointer) <= marker.radius as f32 + tolerance
    })
}
