use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format of OpenWeather `dt_txt` values and of request target times
pub const FORECAST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Observed weather for one request, shared by every item evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Degrees Celsius
    #[serde(rename = "temp")]
    pub temperature: f64,
    pub condition: String,
    pub icon: String,
    #[serde(rename = "code")]
    pub condition_code: i64,
}

/// One 3-hourly forecast slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSlot {
    pub time: NaiveDateTime,
    pub snapshot: WeatherSnapshot,
}

// ============================================================================
// OpenWeather API Types
// ============================================================================

/// Raw response from GET /data/2.5/forecast
#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherForecast {
    #[serde(default)]
    pub list: Vec<OpenWeatherEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherEntry {
    pub dt_txt: String,
    pub main: OpenWeatherMain,
    #[serde(default)]
    pub weather: Vec<OpenWeatherCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherCondition {
    #[serde(default)]
    pub id: Option<i64>,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl TryFrom<OpenWeatherEntry> for ForecastSlot {
    type Error = String;

    fn try_from(entry: OpenWeatherEntry) -> Result<Self, Self::Error> {
        let time = NaiveDateTime::parse_from_str(&entry.dt_txt, FORECAST_TIME_FORMAT)
            .map_err(|e| format!("Invalid forecast time '{}': {}", entry.dt_txt, e))?;

        let condition = entry
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| format!("Forecast slot {} has no weather condition", entry.dt_txt))?;

        Ok(ForecastSlot {
            time,
            snapshot: WeatherSnapshot {
                temperature: entry.main.temp,
                condition: condition.description,
                icon: condition.icon.unwrap_or_else(|| "None".to_string()),
                condition_code: condition.id.unwrap_or(-1),
            },
        })
    }
}
