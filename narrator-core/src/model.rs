use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WeatherError;

const KELVIN_OFFSET: f64 = 273.15;
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Current conditions for one city, as reported by the weather provider.
///
/// Field nesting follows the provider's JSON body so the record decodes
/// directly; anything the provider sends beyond these fields is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub main: MainReading,
    pub weather: Vec<Condition>,
    pub visibility: i64,
    pub wind: Wind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReading {
    /// Temperature in Kelvin.
    pub temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: i64,
}

impl WeatherRecord {
    /// Decode a provider response body.
    ///
    /// A body without any weather condition is rejected: every record carries
    /// at least one.
    pub fn from_json(body: &str) -> Result<Self, WeatherError> {
        let record: WeatherRecord = serde_json::from_str(body)?;
        if record.weather.is_empty() {
            return Err(WeatherError::NoConditions);
        }
        Ok(record)
    }

    pub fn temperature_kelvin(&self) -> f64 {
        self.main.temp
    }

    pub fn temperature_celsius(&self) -> f64 {
        round2(self.main.temp - KELVIN_OFFSET)
    }

    pub fn temperature_fahrenheit(&self) -> f64 {
        round2((self.main.temp - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0)
    }

    /// The first reported condition, which the provider lists as the primary one.
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

impl Condition {
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@2x.png", self.icon)
    }
}

impl fmt::Display for WeatherRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "temperature={}K, conditions=[", self.main.temp)?;
        for (i, c) in self.weather.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} (icon {})", c.description, c.icon)?;
        }
        write!(
            f,
            "], visibility={}m, wind={} m/s from {} degrees",
            self.visibility, self.wind.speed, self.wind.deg
        )
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
