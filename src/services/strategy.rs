use std::sync::Arc;

use crate::{
    knowledge::KnowledgeBase,
    models::{
        ClothingItem, FinalMatch, MatchKind, MatchResult, PaletteType, Rgb, WardrobeSlot,
        WeatherSnapshot,
    },
};

use super::{color::color_match_score, event::event_match_score, weather::weather_match_score};
use super::MatchError;

/// Multiplier for items that are not favorites when favorites weighting is on
pub const UNFAVORITE_NERF_COEF: f64 = 0.8;

/// Result of one scoring dimension for one item
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionScore {
    /// The request did not ask for this dimension
    Absent,
    Scored(f64),
    /// Requested, but the item lacks the data to be scored
    Missing(MatchError),
}

impl DimensionScore {
    fn from_result(result: Result<f64, MatchError>) -> Self {
        match result {
            Ok(score) => DimensionScore::Scored(score),
            Err(e) => DimensionScore::Missing(e),
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, DimensionScore::Absent)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            DimensionScore::Scored(score) => Some(*score),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionScores {
    pub weather: DimensionScore,
    pub color: DimensionScore,
    pub event: DimensionScore,
}

impl DimensionScores {
    fn errors(&self) -> Vec<String> {
        [&self.weather, &self.color, &self.event]
            .into_iter()
            .filter_map(|dimension| match dimension {
                DimensionScore::Missing(e) => Some(e.to_string()),
                _ => None,
            })
            .collect()
    }
}

/// Mean of the available sub-scores; 0 when none are available
fn average(dimensions: &[&DimensionScore]) -> f64 {
    let scores: Vec<f64> = dimensions.iter().filter_map(|d| d.value()).collect();
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Picks the final match from the present dimensions.
///
/// Single-dimension matches are assigned in weather, color, event order and
/// each overwrites the previous one. Unless all three dimensions are present,
/// every fully present pair then overwrites in color+event, weather+event,
/// color+weather order. With all three present the average wins.
pub fn compose(scores: &DimensionScores) -> Option<FinalMatch> {
    let DimensionScores {
        weather,
        color,
        event,
    } = scores;
    let (has_weather, has_color, has_event) =
        (weather.is_present(), color.is_present(), event.is_present());

    let mut final_match = None;
    let mut set = |kind: MatchKind, score: Option<f64>| {
        final_match = Some(FinalMatch { kind, score });
    };

    if has_weather {
        set(MatchKind::WeatherMatch, weather.value());
    }
    if has_color {
        set(MatchKind::ColorMatch, color.value());
    }
    if has_event {
        set(MatchKind::EventMatch, event.value());
    }

    if has_weather && has_color && has_event {
        set(MatchKind::AverageMatch, Some(average(&[weather, color, event])));
    } else {
        if has_color && has_event {
            set(MatchKind::ColorEventMatch, Some(average(&[color, event])));
        }
        if has_weather && has_event {
            set(MatchKind::WeatherEventMatch, Some(average(&[weather, event])));
        }
        if has_weather && has_color {
            set(MatchKind::ColorWeatherMatch, Some(average(&[weather, color])));
        }
    }

    final_match
}

/// Applies the non-favorite multiplier when favorites weighting is requested
pub fn apply_favorite_weighting(
    final_match: Option<FinalMatch>,
    include_favorites: bool,
    is_favorite: bool,
) -> Option<FinalMatch> {
    final_match.map(|mut m| {
        if include_favorites && !is_favorite {
            m.score = m.score.map(|score| score * UNFAVORITE_NERF_COEF);
        }
        m
    })
}

/// Everything a scoring task needs; shared read-only across tasks
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    pub knowledge: Arc<KnowledgeBase>,
    pub weather: Option<WeatherSnapshot>,
    pub target_color: Option<Rgb>,
    pub palette: Option<PaletteType>,
    pub event: Option<String>,
    pub include_favorites: bool,
    pub image_base_url: String,
}

impl EvaluationContext {
    pub fn dimension_scores(&self, item: &ClothingItem) -> DimensionScores {
        let weather = match &self.weather {
            Some(snapshot) => DimensionScore::from_result(weather_match_score(
                &self.knowledge,
                item.category,
                item.season,
                snapshot,
            )),
            None => DimensionScore::Absent,
        };

        let color = match (self.target_color, self.palette) {
            (Some(target), Some(palette)) => match item.color() {
                Some(item_color) => {
                    DimensionScore::Scored(color_match_score(item_color, target, palette))
                }
                None => DimensionScore::Missing(MatchError::MissingColor),
            },
            _ => DimensionScore::Absent,
        };

        let event = match &self.event {
            Some(event) => DimensionScore::from_result(event_match_score(
                &self.knowledge,
                item.category,
                event,
            )),
            None => DimensionScore::Absent,
        };

        DimensionScores {
            weather,
            color,
            event,
        }
    }

    pub fn image_ref(&self, item: &ClothingItem) -> String {
        format!("{}/{}", self.image_base_url.trim_end_matches('/'), item.filename)
    }

    /// Scores one item. The slot is left as `Unknown`; outfit assembly assigns it.
    pub fn evaluate_item(&self, item: &ClothingItem) -> MatchResult {
        let scores = self.dimension_scores(item);
        let final_match = apply_favorite_weighting(
            compose(&scores),
            self.include_favorites,
            item.is_favorite,
        );

        MatchResult {
            item_id: item.id,
            item_name: item.name.clone(),
            category: item.category,
            image_ref: self.image_ref(item),
            is_favorite: item.is_favorite,
            final_match,
            group: WardrobeSlot::Unknown,
            errors: scores.errors(),
        }
    }
}
