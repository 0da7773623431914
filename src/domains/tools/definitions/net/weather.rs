//! Weather tool definition.
//!
//! Two upstream calls: geocode the city name, then fetch the current
//! weather at the first match's coordinates. Open-Meteo compatible APIs.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the weather tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WeatherParams {
    /// City name (e.g. "London", "Mumbai").
    pub city: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeoLocation>,
}

#[derive(Debug, Deserialize)]
struct GeoLocation {
    name: String,
    #[serde(default)]
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    weathercode: i64,
}

/// Weather tool - current conditions for a city.
pub struct WeatherTool;

#[async_trait::async_trait]
impl ToolDefinition for WeatherTool {
    const NAME: &'static str = "get_weather";
    const DESCRIPTION: &'static str = "Get the current weather for a city: temperature (°C), condition, wind speed (km/h) and coordinates.";

    type Params = WeatherParams;

    #[instrument(skip_all, fields(city = %params.city))]
    async fn execute(params: WeatherParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let city = params.city.trim();
        if city.is_empty() {
            return Err(ToolError::execution_failed("city must not be empty"));
        }

        let weather = &ctx.config.weather;

        let geo: GeocodingResponse = ctx
            .http
            .get(&weather.geocoding_url)
            .query(&[("name", city), ("count", "1"), ("language", "en"), ("format", "json")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(location) = geo.results.into_iter().next() else {
            warn!("City not found");
            return Err(ToolError::execution_failed(format!("city not found: {}", city)));
        };

        let forecast: ForecastResponse = ctx
            .http
            .get(&weather.forecast_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("temperature_unit", "celsius".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let current = forecast.current_weather;
        info!(
            resolved = %location.name,
            temperature = current.temperature,
            "Weather fetched"
        );

        Ok(json!({
            "city": location.name,
            "country": location.country.unwrap_or_default(),
            "temperature_celsius": current.temperature,
            "condition": describe_weather_code(current.weathercode),
            "wind_speed_kmh": current.windspeed,
            "coordinates": {
                "latitude": location.latitude,
                "longitude": location.longitude,
            },
        }))
    }
}

/// WMO weather interpretation code to text.
fn describe_weather_code(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
