use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::{WeatherError, truncate_body},
    model::WeatherRecord,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Current-weather client for the OpenWeather API.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, city: &str, api_key: &str) -> Result<WeatherRecord, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", api_key)])
            .send()
            .await
            .map_err(WeatherError::transport)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::transport)?;

        if !status.is_success() {
            return Err(WeatherError::Status { status, body: truncate_body(&body) });
        }

        WeatherRecord::from_json(&body)
    }
}
