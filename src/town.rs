use serde::Deserialize;

use crate::projection::LatLng;

/// Radius of a marker whose town has no known population.
pub const DEFAULT_RADIUS: f64 = 5.0;
const RADIUS_PER_SQRT_PERSON: f64 = 0.05;

/// One entry of the town feed. The feed is loosely typed, so every field is
/// decoded leniently (see [`lenient`]).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TownRecord {
    #[serde(rename = "Town", default, deserialize_with = "lenient::text")]
    pub name: String,

    #[serde(rename = "County", default, deserialize_with = "lenient::text")]
    pub county: String,

    #[serde(rename = "Population", default, deserialize_with = "lenient::number")]
    pub population: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub lng: Option<f64>,
}

impl TownRecord {
    /// The position of this town, if it can be plotted. Zero counts as
    /// missing, the feed uses it for towns without a known location.
    pub fn coordinates(&self) -> Option<LatLng> {
        match (truthy(self.lat), truthy(self.lng)) {
            (Some(lat), Some(lng)) => Some(LatLng { lat, lng }),
            _ => None,
        }
    }

    /// The population if it is known and positive.
    pub fn known_population(&self) -> Option<f64> {
        truthy(self.population).filter(|population| *population > 0.0)
    }
}

fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// Marker radius for a population: 5 if unknown, `sqrt(population) * 0.05` otherwise.
pub fn scale_population(population: Option<f64>) -> f64 {
    match truthy(population).filter(|population| *population > 0.0) {
        Some(population) => population.sqrt() * RADIUS_PER_SQRT_PERSON,
        None => DEFAULT_RADIUS,
    }
}

/// Parse the body of a town feed response.
pub fn parse_towns(bytes: &[u8]) -> Result<Vec<TownRecord>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

mod lenient {
    use std::fmt;

    use serde::{
        de::{self, Visitor},
        Deserializer,
    };

    /// Numbers may arrive as JSON numbers, as numeric strings or as null.
    /// Anything that is not a number becomes `None`.
    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NumberVisitor)
    }

    /// Text may arrive as a string, a number or null.
    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TextVisitor)
    }

    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number, a numeric string or null")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.trim().parse::<f64>().ok())
        }

        fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, a number or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(format!("{v}"))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(format!("{v}"))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(format!("{v}"))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(String::new())
        }
    }
}
