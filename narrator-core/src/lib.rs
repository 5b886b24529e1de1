//! Core library for the `narrator` weather CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the weather and text generation providers
//! - The request orchestrator and the state it publishes
//!
//! It is used by `narrator-cli`, but any other front end can drive an
//! [`Orchestrator`] and render its [`UiState`].

pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod state;

pub use config::{Config, GenerationConfig, WeatherConfig};
pub use error::{Failure, GenerationError, WeatherError};
pub use model::{Condition, MainReading, WeatherRecord, Wind};
pub use orchestrator::Orchestrator;
pub use provider::{TextGenerator, WeatherProvider};
pub use state::UiState;
