use crate::{error::Failure, model::WeatherRecord};

/// What the presentation surface should show.
///
/// Replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    /// No fetch attempted yet.
    #[default]
    Initial,
    /// A fetch sequence is in flight.
    Loading,
    Success {
        city: String,
        weather: WeatherRecord,
        description: String,
    },
    Error {
        message: String,
    },
}

impl UiState {
    /// `Success` and `Error` end a fetch sequence.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UiState::Success { .. } | UiState::Error { .. })
    }
}

impl From<Failure> for UiState {
    fn from(failure: Failure) -> Self {
        UiState::Error { message: failure.message().to_string() }
    }
}
