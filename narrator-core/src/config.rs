use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, path::PathBuf};

pub const WEATHER_API_KEY_ENV: &str = "NARRATOR_WEATHER_API_KEY";
pub const GENERATION_API_KEY_ENV: &str = "NARRATOR_GENERATION_API_KEY";
pub const GENERATION_MODEL_ENV: &str = "NARRATOR_GENERATION_MODEL";

pub const DEFAULT_GENERATION_MODEL: &str = "gemini-1.5-flash";

/// Weather provider credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,
    /// Overrides the provider's base URL, e.g. for a local mock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Text generation provider credentials and model selection.
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [weather]
/// api_key = "..."
///
/// [generation]
/// api_key = "..."
/// model = "gemini-1.5-flash"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationConfig>,
}

impl Config {
    /// Load config from the platform config directory, or return an empty
    /// default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-narrator", "narrator")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`; empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(WEATHER_API_KEY_ENV) {
            self.set_weather_api_key(key);
        }
        if let Some(key) = get(GENERATION_API_KEY_ENV) {
            self.set_generation_api_key(key);
        }
        if let Some(model) = get(GENERATION_MODEL_ENV) {
            match self.generation.as_mut() {
                Some(generation) => generation.model = Some(model),
                None => tracing::debug!(
                    %model,
                    "ignoring {GENERATION_MODEL_ENV}: no text generation key configured"
                ),
            }
        }

        self
    }

    /// Set or replace the weather API key, keeping any base URL override.
    pub fn set_weather_api_key(&mut self, api_key: String) {
        match self.weather.as_mut() {
            Some(weather) => weather.api_key = api_key,
            None => self.weather = Some(WeatherConfig { api_key, base_url: None }),
        }
    }

    /// Set or replace the generation API key, keeping model and base URL.
    pub fn set_generation_api_key(&mut self, api_key: String) {
        match self.generation.as_mut() {
            Some(generation) => generation.api_key = api_key,
            None => {
                self.generation = Some(GenerationConfig { api_key, model: None, base_url: None })
            }
        }
    }

    pub fn weather_api_key(&self) -> Result<&str> {
        self.weather.as_ref().map(|w| w.api_key.as_str()).ok_or_else(|| {
            anyhow!(
                "No weather API key configured.\n\
                 Hint: run `narrator configure` or set {WEATHER_API_KEY_ENV}."
            )
        })
    }

    pub fn generation_api_key(&self) -> Result<&str> {
        self.generation.as_ref().map(|g| g.api_key.as_str()).ok_or_else(|| {
            anyhow!(
                "No text generation API key configured.\n\
                 Hint: run `narrator configure` or set {GENERATION_API_KEY_ENV}."
            )
        })
    }

    pub fn generation_model(&self) -> &str {
        self.generation
            .as_ref()
            .and_then(|g| g.model.as_deref())
            .unwrap_or(DEFAULT_GENERATION_MODEL)
    }

    pub fn is_complete(&self) -> bool {
        self.weather.is_some() && self.generation.is_some()
    }
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_keys_error_with_hint() {
        let cfg = Config::default();

        let err = cfg.weather_api_key().unwrap_err();
        assert!(err.to_string().contains("No weather API key configured"));
        assert!(err.to_string().contains("Hint: run `narrator configure`"));

        let err = cfg.generation_api_key().unwrap_err();
        assert!(err.to_string().contains("No text generation API key configured"));
        assert!(!cfg.is_complete());
    }

    #[test]
    fn set_keys_and_read_back() {
        let mut cfg = Config::default();
        cfg.set_weather_api_key("WEATHER_KEY".into());
        cfg.set_generation_api_key("AI_KEY".into());

        assert_eq!(cfg.weather_api_key().unwrap(), "WEATHER_KEY");
        assert_eq!(cfg.generation_api_key().unwrap(), "AI_KEY");
        assert_eq!(cfg.generation_model(), DEFAULT_GENERATION_MODEL);
        assert!(cfg.is_complete());
    }

    #[test]
    fn replacing_key_keeps_overrides() {
        let mut cfg = Config {
            weather: Some(WeatherConfig {
                api_key: "OLD".into(),
                base_url: Some("http://localhost:9000".into()),
            }),
            generation: None,
        };
        cfg.set_weather_api_key("NEW".into());

        let weather = cfg.weather.as_ref().unwrap();
        assert_eq!(weather.api_key, "NEW");
        assert_eq!(weather.base_url.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn env_overrides_win_over_file() {
        let mut cfg = Config::default();
        cfg.set_weather_api_key("FROM_FILE".into());

        let env: HashMap<&str, &str> = HashMap::from([
            (WEATHER_API_KEY_ENV, "FROM_ENV"),
            (GENERATION_API_KEY_ENV, "AI_FROM_ENV"),
            (GENERATION_MODEL_ENV, "gemini-2.0-flash"),
        ]);
        let cfg = cfg.with_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(cfg.weather_api_key().unwrap(), "FROM_ENV");
        assert_eq!(cfg.generation_api_key().unwrap(), "AI_FROM_ENV");
        assert_eq!(cfg.generation_model(), "gemini-2.0-flash");
    }

    #[test]
    fn model_override_needs_generation_key() {
        let cfg = Config::default()
            .with_overrides(|name| (name == GENERATION_MODEL_ENV).then(|| "gemini-2.0-flash".into()));

        assert!(cfg.generation.is_none());
        assert_eq!(cfg.generation_model(), DEFAULT_GENERATION_MODEL);
    }

    #[test]
    fn model_override_applies_to_file_generation_section() {
        let mut cfg = Config::default();
        cfg.set_generation_api_key("FROM_FILE".into());

        let cfg = cfg
            .with_overrides(|name| (name == GENERATION_MODEL_ENV).then(|| "gemini-2.0-flash".into()));
        assert_eq!(cfg.generation_model(), "gemini-2.0-flash");
        assert_eq!(cfg.generation_api_key().unwrap(), "FROM_FILE");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.set_weather_api_key("FROM_FILE".into());

        let cfg = cfg.with_overrides(|_| Some("  ".to_string()));
        assert_eq!(cfg.weather_api_key().unwrap(), "FROM_FILE");
        assert!(cfg.generation.is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_weather_api_key("W".into());
        cfg.set_generation_api_key("G".into());
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.weather_api_key().unwrap(), "W");
        assert_eq!(loaded.generation_api_key().unwrap(), "G");
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert!(cfg.weather.is_none());
        assert!(cfg.generation.is_none());
    }

    #[test]
    fn load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[weather\napi_key = 1").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn debug_output_redacts_keys() {
        let mut cfg = Config::default();
        cfg.set_weather_api_key("SECRET_WEATHER".into());
        cfg.set_generation_api_key("SECRET_AI".into());

        let printed = format!("{cfg:?}");
        assert!(!printed.contains("SECRET"));
        assert!(printed.contains("<redacted>"));
    }
}
