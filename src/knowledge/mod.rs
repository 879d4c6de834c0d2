//! Static knowledge base: weather and event suitability tables plus the
//! category → wardrobe slot grouping.
//!
//! The three documents are parsed once at startup into immutable maps and
//! shared by reference with every evaluation task.

use serde::Deserialize;
use std::{collections::HashMap, fmt::Display, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::{Category, Season, WardrobeSlot},
};

mod temperature;

pub use temperature::TemperatureRange;

pub const WEATHER_DOCUMENT: &str = "weather_recommendations.json";
pub const EVENT_DOCUMENT: &str = "event_recommendations.json";
pub const GROUPING_DOCUMENT: &str = "clothing_grouping.json";

const EMBEDDED_WEATHER: &str = include_str!("../../data/weather_recommendations.json");
const EMBEDDED_EVENTS: &str = include_str!("../../data/event_recommendations.json");
const EMBEDDED_GROUPING: &str = include_str!("../../data/clothing_grouping.json");

/// Weather profile of a category or a season
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherProfile {
    pub temperature_range: TemperatureRange,
    /// Fitness in [0, 1] per OpenWeather condition description
    pub weather: HashMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct EventProfile {
    event: HashMap<String, f64>,
}

/// A lookup path that does not exist in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPath {
    pub path: String,
    pub key: String,
}

impl Display for MissingPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Path '{}' is invalid: key '{}' not found", self.path, self.key)
    }
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    weather: HashMap<String, WeatherProfile>,
    events: HashMap<String, EventProfile>,
    slots: HashMap<String, WardrobeSlot>,
}

impl KnowledgeBase {
    /// Loads the documents from `dir` when given, otherwise the embedded copies
    pub fn load(dir: Option<&str>) -> AppResult<Self> {
        match dir {
            Some(dir) => Self::from_dir(Path::new(dir)),
            None => Self::embedded(),
        }
    }

    pub fn embedded() -> AppResult<Self> {
        Self::from_documents(EMBEDDED_WEATHER, EMBEDDED_EVENTS, EMBEDDED_GROUPING)
    }

    pub fn from_dir(dir: &Path) -> AppResult<Self> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|e| {
                AppError::KnowledgeBase(format!("Failed to read {}: {}", path.display(), e))
            })
        };

        Self::from_documents(
            &read(WEATHER_DOCUMENT)?,
            &read(EVENT_DOCUMENT)?,
            &read(GROUPING_DOCUMENT)?,
        )
    }

    pub fn from_documents(weather: &str, events: &str, grouping: &str) -> AppResult<Self> {
        let weather: HashMap<String, WeatherProfile> = parse_document(WEATHER_DOCUMENT, weather)?;
        let events: HashMap<String, EventProfile> = parse_document(EVENT_DOCUMENT, events)?;
        let grouping: HashMap<WardrobeSlot, Vec<String>> =
            parse_document(GROUPING_DOCUMENT, grouping)?;

        for (key, profile) in &weather {
            for (condition, score) in &profile.weather {
                check_score(WEATHER_DOCUMENT, &format!("{}.weather.{}", key, condition), *score)?;
            }
        }
        for (key, profile) in &events {
            for (event, score) in &profile.event {
                check_score(EVENT_DOCUMENT, &format!("{}.event.{}", key, event), *score)?;
            }
        }

        let mut slots = HashMap::new();
        for (slot, categories) in grouping {
            for category in categories {
                if let Some(previous) = slots.insert(category.clone(), slot) {
                    return Err(AppError::KnowledgeBase(format!(
                        "{}: category '{}' listed under both {:?} and {:?}",
                        GROUPING_DOCUMENT, category, previous, slot
                    )));
                }
            }
        }

        tracing::info!(
            weather_profiles = weather.len(),
            event_profiles = events.len(),
            grouped_categories = slots.len(),
            "Knowledge base loaded"
        );

        Ok(Self {
            weather,
            events,
            slots,
        })
    }

    pub fn category_weather(&self, category: Category) -> Result<&WeatherProfile, MissingPath> {
        self.weather_profile(category.as_str())
    }

    pub fn season_weather(&self, season: Season) -> Result<&WeatherProfile, MissingPath> {
        self.weather_profile(season.as_str())
    }

    fn weather_profile(&self, key: &str) -> Result<&WeatherProfile, MissingPath> {
        self.weather.get(key).ok_or_else(|| MissingPath {
            path: format!("{}.weather", key),
            key: key.to_string(),
        })
    }

    /// Suitability of `category` for `event`, looked up at `category.event.<event>`
    pub fn event_score(&self, category: Category, event: &str) -> Result<f64, MissingPath> {
        let path = format!("{}.event.{}", category, event);
        let profile = self.events.get(category.as_str()).ok_or_else(|| MissingPath {
            path: path.clone(),
            key: category.to_string(),
        })?;

        profile.event.get(event).copied().ok_or_else(|| MissingPath {
            path,
            key: event.to_string(),
        })
    }

    /// Wardrobe slot of a category; `Unknown` when the grouping omits it
    pub fn slot_for(&self, category: Category) -> WardrobeSlot {
        self.slots
            .get(category.as_str())
            .copied()
            .unwrap_or(WardrobeSlot::Unknown)
    }
}

fn parse_document<T: serde::de::DeserializeOwned>(name: &str, raw: &str) -> AppResult<T> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::KnowledgeBase(format!("{} is not valid: {}", name, e)))
}

fn check_score(document: &str, path: &str, score: f64) -> AppResult<()> {
    if (0.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(AppError::KnowledgeBase(format!(
            "{}: score at '{}' must be within [0, 1], got {}",
            document, path, score
        )))
    }
}
