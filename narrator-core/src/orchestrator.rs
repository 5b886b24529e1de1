//! Sequencing of the weather fetch and the description request.
//!
//! [`Orchestrator`] owns the current [`UiState`] and publishes every
//! transition through a `tokio::sync::watch` channel. Observers hold a
//! receiver and always see the latest whole value.
//!
//! A new [`Orchestrator::submit`] supersedes the one before it: the older
//! task is aborted, and if it is already past its last suspension point the
//! epoch check keeps it from publishing over the newer request.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use reqwest::Client;
use tokio::{
    sync::watch,
    task::{AbortHandle, JoinHandle},
};
use tracing::Instrument;

use crate::{
    Config,
    error::Failure,
    prompt::build_prompt,
    provider::{TextGenerator, WeatherProvider, text_generator_from_config, weather_provider_from_config},
    state::UiState,
};

pub struct Orchestrator {
    shared: Arc<Shared>,
    in_flight: Mutex<Option<AbortHandle>>,
}

struct Shared {
    weather: Arc<dyn WeatherProvider>,
    generator: Arc<dyn TextGenerator>,
    weather_api_key: String,
    state: watch::Sender<UiState>,
    epoch: AtomicU64,
}

impl Orchestrator {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        generator: Arc<dyn TextGenerator>,
        weather_api_key: String,
    ) -> Self {
        let (state, _) = watch::channel(UiState::Initial);

        Self {
            shared: Arc::new(Shared {
                weather,
                generator,
                weather_api_key,
                state,
                epoch: AtomicU64::new(0),
            }),
            in_flight: Mutex::new(None),
        }
    }

    /// Build both providers from `config`, sharing one HTTP client.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = Client::new();
        let weather = weather_provider_from_config(config, http.clone())?;
        let generator = text_generator_from_config(config, http)?;

        Ok(Self::new(weather, generator, config.weather_api_key()?.to_owned()))
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.shared.state.subscribe()
    }

    pub fn current(&self) -> UiState {
        self.shared.state.borrow().clone()
    }

    /// Start a fetch sequence for `city`.
    ///
    /// `Loading` is published before this returns. The sequence itself runs on
    /// the tokio runtime; the returned handle resolves once its terminal state
    /// has been published, or with a cancellation error if a later call
    /// superseded it. Blank input is ignored and yields `None`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, city: &str) -> Option<JoinHandle<()>> {
        let city = city.trim();
        if city.is_empty() {
            tracing::debug!("ignoring submit with empty city");
            return None;
        }

        let mut in_flight = self.in_flight.lock();
        if let Some(previous) = in_flight.take() {
            previous.abort();
        }

        let epoch = self.shared.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.state.send_replace(UiState::Loading);

        let shared = Arc::clone(&self.shared);
        let city = city.to_owned();
        let span = tracing::info_span!("submit", %city, epoch);

        let handle = tokio::spawn(
            async move {
                let next = shared.run(&city).await;
                shared.publish(epoch, next);
            }
            .instrument(span),
        );

        *in_flight = Some(handle.abort_handle());
        Some(handle)
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.get_mut().take() {
            task.abort();
        }
    }
}

impl Shared {
    async fn run(&self, city: &str) -> UiState {
        let weather = match self.weather.fetch(city, &self.weather_api_key).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "weather fetch failed");
                return Failure::WeatherFetchFailed.into();
            }
        };
        tracing::debug!(record = %weather, "weather received");

        let prompt = build_prompt(city, &weather);
        let description = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "weather description generation failed");
                return Failure::TextGenerationFailed.into();
            }
        };

        UiState::Success { city: city.to_owned(), weather, description }
    }

    /// Publish `next` unless a newer submit has started since `epoch`.
    fn publish(&self, epoch: u64, next: UiState) {
        let published = self.state.send_if_modified(|current| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            *current = next;
            true
        });

        if !published {
            tracing::debug!("dropping result of superseded request");
        }
    }
}
