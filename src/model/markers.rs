use log::{info, warn};

use crate::projection::LatLng;
use crate::town::{scale_population, TownRecord};

/// One town on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub county: String,
    pub population: Option<f64>,
    pub position: LatLng,
    pub radius: f64,
}

impl Marker {
    fn from_record(town: &TownRecord, position: LatLng) -> Self {
        Self {
            name: town.name.clone(),
            county: town.county.clone(),
            population: town.known_population(),
            position,
            radius: scale_population(town.population),
        }
    }
}

/// What happened while drawing one town list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub drawn: usize,
    /// Names of the towns that could not be placed on the map.
    pub skipped: Vec<String>,
}

/// The markers currently on the map. Only ever holds the towns of a single
/// town list, every render replaces the previous content completely.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn replace(&mut self, towns: &[TownRecord]) -> RenderReport {
        self.markers.clear();
        let mut report = RenderReport::default();

        for town in towns {
            if let Some(position) = town.coordinates() {
                self.markers.push(Marker::from_record(town, position));
                report.drawn += 1;
            } else {
                warn!("Invalid coordinates for town: {}", town.name);
                report.skipped.push(town.name.clone());
            }
        }

        info!(
            "Drew {} towns, skipped {} without coordinates",
            report.drawn,
            report.skipped.len()
        );
        report
    }

    /// In drawing order, the last marker is on top.
    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
