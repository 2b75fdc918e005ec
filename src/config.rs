use std::ops::RangeInclusive;
use std::path::Path;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context};
#[cfg(not(target_arch = "wasm32"))]
use directories_next::ProjectDirs;
use serde::Deserialize;

use crate::animation::Pulse;
use crate::projection::LatLng;

#[cfg(not(target_arch = "wasm32"))]
static CONFIG_FILE_NAME: &str = "config.yaml";

/// Everything that can be tuned without recompiling. On desktop any subset of
/// these fields can be overridden in `config.yaml` in the platform config
/// directory, the browser build always uses the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The town count is appended to this to form the request url.
    pub api_base_url: String,
    pub initial_town_count: u32,
    pub min_town_count: u32,
    pub max_town_count: u32,
    pub slider_debounce_ms: u64,

    pub center: LatLng,
    pub zoom: u8,
    pub max_zoom: u8,
    pub tile_url: String,
    pub tile_subdomains: Vec<String>,
    pub attribution: String,

    pub pulse: Pulse,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: String::from("http://34.147.162.172/Circles/Towns/"),
            initial_town_count: 50,
            min_town_count: 1,
            max_town_count: 500,
            slider_debounce_ms: 300,
            center: LatLng {
                lat: 54.0,
                lng: -2.0,
            },
            zoom: 6,
            max_zoom: 18,
            tile_url: String::from("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"),
            tile_subdomains: vec!["a".into(), "b".into(), "c".into()],
            attribution: String::from("© OpenStreetMap contributors"),
            pulse: Pulse::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(text).context("Failed to parse the configuration")?;
        config.validated()
    }

    /// Read the configuration at `path`. A missing file is not an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {path:?}"))?;
        let config =
            Self::from_yaml_str(&text).with_context(|| format!("Invalid configuration in {path:?}"))?;
        Ok(Some(config))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "UkTownMap").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// The configuration the app starts with. Problems with the config file
    /// are logged and the defaults are used instead.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::debug!("No config directory on this platform, using defaults");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(Some(config)) => {
                log::info!("Loaded configuration from {path:?}");
                config
            }
            Ok(None) => Self::default(),
            Err(err) => {
                log::error!("{err:?}");
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::default()
    }

    fn validated(mut self) -> anyhow::Result<Self> {
        ensure!(
            self.min_town_count >= 1,
            "min_town_count must be at least 1"
        );
        ensure!(
            self.min_town_count <= self.max_town_count,
            "min_town_count ({}) is larger than max_town_count ({})",
            self.min_town_count,
            self.max_town_count
        );
        ensure!(self.max_zoom <= 22, "max_zoom ({}) is above 22", self.max_zoom);
        self.initial_town_count = self.initial_town_count.clamp(self.min_town_count, self.max_town_count);
        self.zoom = self.zoom.min(self.max_zoom);
        Ok(self)
    }

    pub fn town_count_range(&self) -> RangeInclusive<u32> {
        self.min_town_count..=self.max_town_count
    }

    pub fn slider_debounce(&self) -> Duration {
        Duration::from_millis(self.slider_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_feed_and_map_setup() {
        let config = Config::default();
        assert_eq!(config.initial_town_count, 50);
        assert_eq!(config.slider_debounce(), Duration::from_millis(300));
        assert_eq!(config.zoom, 6);
        assert_eq!(config.max_zoom, 18);
        assert_eq!(config.center, LatLng { lat: 54.0, lng: -2.0 });
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = Config::from_yaml_str("initial_town_count: 120\nzoom: 7\n").unwrap();
        assert_eq!(config.initial_town_count, 120);
        assert_eq!(config.zoom, 7);
        assert_eq!(config.api_base_url, Config::default().api_base_url);
        assert_eq!(config.pulse, Pulse::default());
    }

    #[test]
    fn nested_pulse_settings() {
        let config = Config::from_yaml_str("pulse:\n  phase_ms: 250\n").unwrap();
        assert_eq!(config.pulse.phase_ms, 250);
        assert_eq!(config.pulse.radius_delta, 2.0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::from_yaml_str("town_cuont: 3\n").is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = Config::from_yaml_str("min_town_count: 10\nmax_town_count: 5\n").unwrap_err();
        assert!(format!("{err:?}").contains("min_town_count"));
    }

    #[test]
    fn initial_count_and_zoom_are_clamped() {
        let config =
            Config::from_yaml_str("initial_town_count: 9000\nmax_zoom: 10\nzoom: 12\n").unwrap();
        assert_eq!(config.initial_town_count, 500);
        assert_eq!(config.zoom, 10);
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_base_url: http://localhost:8080/towns/").unwrap();
        let config = Config::load_from(file.path()).unwrap().unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8080/towns/");
    }

    #[test]
    fn broken_file_names_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "zoom: [not a number").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(format!("{err:?}").contains("Invalid configuration"));
    }
}
