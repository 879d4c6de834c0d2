use std::collections::BTreeSet;

use crate::{
    knowledge::{KnowledgeBase, TemperatureRange, WeatherProfile},
    models::{Category, Season, WeatherSnapshot},
};

use super::MatchError;

/// Penalty applied when the observed temperature is outside the merged range
pub const TEMPERATURE_MISMATCH_COEF: f64 = 0.6;

/// Union of a category's and a season's weather profiles
#[derive(Debug, Clone, PartialEq)]
pub struct MergedWeatherProfile {
    pub temperature_range: TemperatureRange,
    pub conditions: BTreeSet<String>,
}

impl MergedWeatherProfile {
    pub fn merge(category: &WeatherProfile, season: &WeatherProfile) -> Self {
        Self {
            temperature_range: category.temperature_range.union(&season.temperature_range),
            conditions: category
                .weather
                .keys()
                .chain(season.weather.keys())
                .cloned()
                .collect(),
        }
    }
}

/// Scores how well an item of `category`/`season` suits the observed weather.
///
/// Both the category and the season profile must rate the observed condition;
/// the better of the two wins. The score is multiplied by
/// [`TEMPERATURE_MISMATCH_COEF`] when the temperature falls outside the union
/// of both profiles' ranges.
pub fn weather_match_score(
    knowledge: &KnowledgeBase,
    category: Category,
    season: Season,
    weather: &WeatherSnapshot,
) -> Result<f64, MatchError> {
    let category_profile = knowledge
        .category_weather(category)
        .map_err(|e| MatchError::MissingWeatherData(e.to_string()))?;
    let season_profile = knowledge
        .season_weather(season)
        .map_err(|e| MatchError::MissingWeatherData(e.to_string()))?;

    let condition_score = |profile: &WeatherProfile, key: &str| {
        profile.weather.get(&weather.condition).copied().ok_or_else(|| {
            MatchError::MissingWeatherData(format!(
                "no fitness for '{}' at '{}.weather'",
                weather.condition, key
            ))
        })
    };
    let category_score = condition_score(category_profile, category.as_str())?;
    let season_score = condition_score(season_profile, season.as_str())?;

    let merged = MergedWeatherProfile::merge(category_profile, season_profile);
    let suitability = category_score.max(season_score);

    if merged.temperature_range.contains(weather.temperature) {
        Ok(suitability)
    } else {
        Ok(suitability * TEMPERATURE_MISMATCH_COEF)
    }
}
