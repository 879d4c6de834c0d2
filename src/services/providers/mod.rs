/// Weather data provider abstraction
///
/// The recommendation service only needs "the weather at this place and
/// time"; providers decide how to get it (OpenWeather's 5-day forecast today).
use chrono::NaiveDateTime;

use crate::{
    error::AppResult,
    models::{ForecastSlot, WeatherSnapshot},
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Trait for weather data providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Forecast for the slot closest to `target_time` at the given coordinates
    async fn forecast_at(
        &self,
        lat: f64,
        lon: f64,
        target_time: NaiveDateTime,
    ) -> AppResult<WeatherSnapshot>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Picks the slot whose time equals `target_time`, else the nearest one.
/// Ties go to the earlier slot in the list.
pub fn select_forecast_slot(
    slots: &[ForecastSlot],
    target_time: NaiveDateTime,
) -> Option<&ForecastSlot> {
    slots
        .iter()
        .find(|slot| slot.time == target_time)
        .or_else(|| {
            slots
                .iter()
                .min_by_key(|slot| (slot.time - target_time).num_seconds().abs())
        })
}
