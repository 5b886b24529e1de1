use crate::{
    Config, WeatherRecord,
    error::{GenerationError, WeatherError},
    provider::{gemini::GeminiGenerator, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, sync::Arc};

pub mod gemini;
pub mod openweather;

/// Fetches current weather for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, city: &str, api_key: &str) -> Result<WeatherRecord, WeatherError>;
}

/// Turns a prompt into a single text completion.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Construct the weather provider described by `config`.
pub fn weather_provider_from_config(
    config: &Config,
    http: Client,
) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    // The key itself is passed per call; only its presence is checked here.
    config.weather_api_key()?;

    let provider = match config.weather.as_ref().and_then(|w| w.base_url.as_deref()) {
        Some(base_url) => OpenWeatherProvider::with_base_url(http, base_url),
        None => OpenWeatherProvider::new(http),
    };

    Ok(Arc::new(provider))
}

/// Construct the text generator described by `config`.
pub fn text_generator_from_config(
    config: &Config,
    http: Client,
) -> anyhow::Result<Arc<dyn TextGenerator>> {
    let api_key = config.generation_api_key()?.to_owned();
    let model = config.generation_model().to_owned();

    let generator = match config.generation.as_ref().and_then(|g| g.base_url.as_deref()) {
        Some(base_url) => GeminiGenerator::with_base_url(http, api_key, model, base_url),
        None => GeminiGenerator::new(http, api_key, model),
    };
    tracing::debug!(model = generator.model(), "text generator configured");

    Ok(Arc::new(generator))
}
