//! Error types for the provider clients and the user-facing failure set.
//!
//! Provider errors keep their underlying cause for the operator log. The
//! orchestrator collapses each of them into one [`Failure`], whose message is
//! the only thing a user ever sees.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    /// Stored without the request URL, whose query holds the API key.
    #[error("failed to reach weather provider: {0}")]
    Transport(reqwest::Error),

    #[error("weather provider returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode weather response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("weather response contained no conditions")]
    NoConditions,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to reach text generation provider: {0}")]
    Transport(reqwest::Error),

    #[error("text generation provider returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode text generation response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("prompt was blocked by the provider: {0}")]
    Blocked(String),

    #[error("text generation provider returned an empty completion")]
    EmptyCompletion,
}

impl WeatherError {
    pub(crate) fn transport(e: reqwest::Error) -> Self {
        WeatherError::Transport(e.without_url())
    }
}

impl GenerationError {
    pub(crate) fn transport(e: reqwest::Error) -> Self {
        GenerationError::Transport(e.without_url())
    }
}

/// Where a fetch sequence stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    WeatherFetchFailed,
    TextGenerationFailed,
}

impl Failure {
    pub fn message(&self) -> &'static str {
        match self {
            Failure::WeatherFetchFailed => "failed with fetching weather data",
            Failure::TextGenerationFailed => "failed with generating weather description",
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
