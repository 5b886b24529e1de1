use crate::model::WeatherRecord;

/// Build the text generation prompt for `record`.
///
/// The output is a pure function of its inputs and embeds the record's full
/// textual form.
pub fn build_prompt(city: &str, record: &WeatherRecord) -> String {
    format!(
        "Describe in detail to a regular user today's weather in {city}, \
         based on this current weather report: {record}. \
         The temperature in the report is in Kelvin; \
         indicate the temperature in both Celsius and Fahrenheit."
    )
}
