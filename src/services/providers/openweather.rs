/// OpenWeather provider
///
/// Uses the free 5-day / 3-hour forecast endpoint. The whole forecast list is
/// cached per rounded coordinate pair, then the slot nearest to the requested
/// time is picked locally, so requests for different hours share one fetch.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ForecastSlot, OpenWeatherForecast, WeatherSnapshot},
    services::providers::{select_forecast_slot, WeatherProvider},
};
use chrono::NaiveDateTime;
use reqwest::Client as HttpClient;

const FORECAST_CACHE_TTL: u64 = 10800; // one forecast slot

#[derive(Clone)]
pub struct OpenWeatherProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

/// Two decimals is roughly 1km, well inside a forecast cell
fn round_coordinate(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts the raw forecast, dropping malformed entries
fn parse_forecast(forecast: OpenWeatherForecast) -> AppResult<Vec<ForecastSlot>> {
    let slots: Vec<ForecastSlot> = forecast
        .list
        .into_iter()
        .filter_map(|entry| match ForecastSlot::try_from(entry) {
            Ok(slot) => Some(slot),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed forecast entry");
                None
            }
        })
        .collect();

    if slots.is_empty() {
        return Err(AppError::ExternalApi(
            "OpenWeather returned an empty forecast".to_string(),
        ));
    }

    Ok(slots)
}

impl OpenWeatherProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    async fn fetch_forecast(&self, lat: f64, lon: f64) -> AppResult<Vec<ForecastSlot>> {
        let url = format!("{}/data/2.5/forecast", self.api_url);
        let lat_param = lat.to_string();
        let lon_param = lon.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("lat", lat_param.as_str()),
                ("lon", lon_param.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OpenWeather API returned status {}: {}",
                status, body
            )));
        }

        let forecast: OpenWeatherForecast = response.json().await?;
        let slots = parse_forecast(forecast)?;

        tracing::info!(lat, lon, slots = slots.len(), "Fetched forecast from OpenWeather");

        Ok(slots)
    }

    async fn forecast(&self, lat: f64, lon: f64) -> AppResult<Vec<ForecastSlot>> {
        let lat = round_coordinate(lat);
        let lon = round_coordinate(lon);

        cached!(
            self.cache,
            CacheKey::Forecast { lat, lon },
            FORECAST_CACHE_TTL,
            self.fetch_forecast(lat, lon)
        )
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn forecast_at(
        &self,
        lat: f64,
        lon: f64,
        target_time: NaiveDateTime,
    ) -> AppResult<WeatherSnapshot> {
        let slots = self.forecast(lat, lon).await?;

        let slot = select_forecast_slot(&slots, target_time).ok_or_else(|| {
            AppError::ExternalApi("No forecast slot available".to_string())
        })?;

        if slot.time != target_time {
            tracing::debug!(
                requested = %target_time,
                closest = %slot.time,
                "No exact forecast slot, using the closest one"
            );
        }

        Ok(slot.snapshot.clone())
    }

    fn name(&self) -> &'static str {
        "openweather"
    }
}
