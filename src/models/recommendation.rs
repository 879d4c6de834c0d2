use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

use super::{Category, Rgb, WardrobeSlot, WeatherSnapshot, FORECAST_TIME_FORMAT};

/// Hue relationship used to judge whether two colors go together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteType {
    Monochromatic,
    Analogous,
    Complementary,
    SplitComplementary,
    Triadic,
    Rectangle,
}

impl PaletteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteType::Monochromatic => "monochromatic",
            PaletteType::Analogous => "analogous",
            PaletteType::Complementary => "complementary",
            PaletteType::SplitComplementary => "split_complementary",
            PaletteType::Triadic => "triadic",
            PaletteType::Rectangle => "rectangle",
        }
    }

    /// Parses a requested palette tag.
    ///
    /// A blank tag is valid and means "no color dimension" (`Ok(None)`).
    /// Anything else must name one of the six palettes, case-insensitively.
    pub fn parse_tag(tag: &str) -> Result<Option<PaletteType>, String> {
        let normalized = tag.trim().to_lowercase();
        let palette = match normalized.as_str() {
            "" => return Ok(None),
            "monochromatic" => PaletteType::Monochromatic,
            "analogous" => PaletteType::Analogous,
            "complementary" => PaletteType::Complementary,
            "split_complementary" => PaletteType::SplitComplementary,
            "triadic" => PaletteType::Triadic,
            "rectangle" => PaletteType::Rectangle,
            _ => return Err(format!("Unsupported palette type: '{}'", tag)),
        };
        Ok(Some(palette))
    }
}

impl Display for PaletteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label echoed back on outfits; blank when the color dimension was off
pub fn palette_label(palette: Option<PaletteType>) -> &'static str {
    palette.map(|p| p.as_str()).unwrap_or("")
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// Color channel sent either as a number or as a (possibly blank) string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorComponent {
    Number(i64),
    Text(String),
}

impl ColorComponent {
    fn value(&self) -> Option<u8> {
        match self {
            ColorComponent::Number(n) => u8::try_from(*n).ok(),
            ColorComponent::Text(s) => s.trim().parse::<u8>().ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PaletteTypes {
    One(String),
    Many(Vec<String>),
}

/// Recommendation request body.
///
/// Accepts both the structured form (`location`, `target_color`) and the flat
/// form used by older clients (`lat`/`lon`, `red`/`green`/`blue`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationRequest {
    pub location: Option<Location>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub target_time: Option<String>,
    pub target_color: Option<Rgb>,
    pub red: Option<ColorComponent>,
    pub green: Option<ColorComponent>,
    pub blue: Option<ColorComponent>,
    pub palette_types: Option<PaletteTypes>,
    pub event: Option<String>,
    pub include_favorites: Option<bool>,
}

/// Validated request context
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationContext {
    pub location: Option<Location>,
    pub target_time: Option<NaiveDateTime>,
    pub target_color: Option<Rgb>,
    /// Never empty and free of repeats. `None` disables the color dimension for that pass.
    pub palette_types: Vec<Option<PaletteType>>,
    pub event: Option<String>,
    pub include_favorites: bool,
}

impl RecommendationContext {
    /// Coordinates and time, when both were supplied
    pub fn weather_query(&self) -> Option<(Location, NaiveDateTime)> {
        self.location.zip(self.target_time)
    }
}

impl TryFrom<RecommendationRequest> for RecommendationContext {
    type Error = AppError;

    fn try_from(request: RecommendationRequest) -> AppResult<Self> {
        let location = request.location.or(match (request.lat, request.lon) {
            (Some(lat), Some(lon)) => Some(Location { lat, lon }),
            _ => None,
        });

        let target_time = match request.target_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                NaiveDateTime::parse_from_str(raw, FORECAST_TIME_FORMAT).map_err(|_| {
                    AppError::InvalidInput(format!(
                        "target_time must look like YYYY-MM-DD HH:MM:SS, got '{}'",
                        raw
                    ))
                })?,
            ),
        };

        let flat_color = match (
            request.red.as_ref().and_then(ColorComponent::value),
            request.green.as_ref().and_then(ColorComponent::value),
            request.blue.as_ref().and_then(ColorComponent::value),
        ) {
            (Some(red), Some(green), Some(blue)) => Some(Rgb { red, green, blue }),
            _ => None,
        };

        let tags = match request.palette_types {
            None => Vec::new(),
            Some(PaletteTypes::One(tag)) => vec![tag],
            Some(PaletteTypes::Many(tags)) => tags,
        };
        let mut palette_types: Vec<Option<PaletteType>> = Vec::with_capacity(tags.len());
        for tag in &tags {
            let palette = PaletteType::parse_tag(tag).map_err(AppError::InvalidInput)?;
            // first occurrence wins; later spellings of the same palette are dropped
            if !palette_types.contains(&palette) {
                palette_types.push(palette);
            }
        }
        if palette_types.is_empty() {
            palette_types.push(None);
        }

        let event = request
            .event
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Ok(Self {
            location,
            target_time,
            target_color: request.target_color.or(flat_color),
            palette_types,
            event,
            include_favorites: request.include_favorites.unwrap_or(false),
        })
    }
}

/// Which scoring path produced an item's final match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    WeatherMatch,
    ColorMatch,
    EventMatch,
    ColorEventMatch,
    WeatherEventMatch,
    ColorWeatherMatch,
    AverageMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalMatch {
    #[serde(rename = "type")]
    pub kind: MatchKind,
    /// `None` when the only contributing dimension had no data for the item
    #[serde(rename = "result")]
    pub score: Option<f64>,
}

/// Scored wardrobe item for one palette pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "id")]
    pub item_id: i64,
    #[serde(rename = "name")]
    pub item_name: String,
    pub category: Category,
    #[serde(rename = "image")]
    pub image_ref: String,
    pub is_favorite: bool,
    pub final_match: Option<FinalMatch>,
    pub group: WardrobeSlot,
    /// Per-item lookup failures ("missing data" markers)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl MatchResult {
    pub fn score(&self) -> Option<f64> {
        self.final_match.and_then(|m| m.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutfitType {
    TopsBottoms,
    OuterwearBottoms,
    OnePiece,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    #[serde(rename = "type")]
    pub outfit_type: OutfitType,
    pub items: Vec<MatchResult>,
    pub score_avg: f64,
    pub palette_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub detail: String,
    pub weather: Option<WeatherSnapshot>,
    pub outfits: Vec<Outfit>,
}
