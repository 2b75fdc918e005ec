use std::collections::HashMap;

/// Tile images kept around once they leave the screen, enough to pan back
/// and forth over a large window without downloading again.
pub const TILE_CACHE_SIZE: usize = 256;

/// Tracks when each tile image was last drawn. egui's image loaders hold on to
/// everything they ever loaded, so tiles that drop out of this cache have to be
/// handed to `egui::Context::forget_image`.
#[derive(Debug)]
pub struct TileCache {
    capacity: usize,
    frame: u64,
    last_drawn: HashMap<String, u64>,
}

impl TileCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            frame: 0,
            last_drawn: HashMap::new(),
        }
    }

    /// Record the tiles drawn in a new frame and return the least recently
    /// drawn urls that no longer fit. Tiles of the current frame are never
    /// returned, even if they alone exceed the capacity.
    pub fn drawn(&mut self, urls: impl IntoIterator<Item = String>) -> Vec<String> {
        self.frame += 1;
        for url in urls {
            self.last_drawn.insert(url, self.frame);
        }

        let excess = self.last_drawn.len().saturating_sub(self.capacity);
        if excess == 0 {
            return Vec::new();
        }

        let mut by_age: Vec<(u64, &String)> = self
            .last_drawn
            .iter()
            .filter(|(_, frame)| **frame != self.frame)
            .map(|(url, frame)| (*frame, url))
            .collect();
        by_age.sort_unstable();
        let evicted: Vec<String> = by_age
            .into_iter()
            .take(excess)
            .map(|(_, url)| url.clone())
            .collect();

        for url in &evicted {
            self.last_drawn.remove(url);
        }
        evicted
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.last_drawn.len()
    }
}
