mod clothing;
mod recommendation;
mod weather;

pub use clothing::{Category, ClothingItem, Rgb, Season, WardrobeSlot};
pub use recommendation::{
    palette_label, ColorComponent, FinalMatch, Location, MatchKind, MatchResult, Outfit,
    OutfitType, PaletteType, PaletteTypes, RecommendationContext, RecommendationRequest,
    RecommendationResponse,
};
pub use weather::{
    ForecastSlot, OpenWeatherCondition, OpenWeatherEntry, OpenWeatherForecast, OpenWeatherMain,
    WeatherSnapshot, FORECAST_TIME_FORMAT,
};
