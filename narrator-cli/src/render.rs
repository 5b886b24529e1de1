use chrono::{DateTime, Local};
use narrator_core::UiState;

/// Human-readable form of `state`.
///
/// `pending` is the city of the request in flight, which `Loading` itself
/// does not carry; `at` stamps a successful report.
pub fn render(state: &UiState, pending: Option<&str>, at: DateTime<Local>) -> String {
    match state {
        UiState::Initial => "Enter a city name to get its current weather.".to_string(),
        UiState::Loading => match pending {
            Some(city) => format!("Fetching weather for {}...", city.trim()),
            None => "Fetching weather...".to_string(),
        },
        UiState::Success { city, weather, description } => {
            let mut out = format!(
                "Current temperature in {city}: {} °C (as of {})\n",
                weather.temperature_celsius(),
                at.format("%H:%M"),
            );
            if let Some(condition) = weather.primary_condition() {
                out.push_str(&format!("Description: {}\n", condition.description));
                out.push_str(&format!("Icon: {}\n", condition.icon_url()));
            }
            out.push_str(&format!(
                "Wind: {} m/s from {}°, visibility {} m\n\n",
                weather.wind.speed, weather.wind.deg, weather.visibility
            ));
            out.push_str(description.trim_end());
            out
        }
        UiState::Error { message } => format!("Error: {message}"),
    }
}

/// Print `state` to stdout, or stderr for errors.
pub fn print_state(state: &UiState, pending: Option<&str>) {
    let text = render(state, pending, Local::now());
    match state {
        UiState::Error { .. } => eprintln!("{text}"),
        _ => println!("{text}"),
    }
}
