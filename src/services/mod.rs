pub mod color;
pub mod evaluator;
pub mod event;
pub mod outfits;
pub mod providers;
pub mod recommendations;
pub mod strategy;
pub mod wardrobe;
pub mod weather;

/// Why an item could not be scored on a requested dimension
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("Missing data for weather evaluation: {0}")]
    MissingWeatherData(String),

    #[error("Missing data for event evaluation: {0}")]
    MissingEventData(String),

    #[error("Item has no color to match against")]
    MissingColor,

    #[error("Evaluation failed: {0}")]
    Evaluation(String),
}
