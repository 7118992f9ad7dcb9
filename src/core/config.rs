use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::core::language::Language;

/// Built-in server URL used when neither config nor `--server` supplies one.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Base URL of the mood service.
    pub server_url: Option<String>,
    /// Language attached to outgoing chat messages unless overridden.
    pub default_language: Option<Language>,
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path();
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(config_path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path();
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    fn get_config_path() -> PathBuf {
        let proj_dirs =
            ProjectDirs::from("org", "moodline", "moodline").expect("config directory unavailable");
        proj_dirs.config_dir().join("config.toml")
    }

    /// Effective server URL after applying the built-in default.
    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn language(&self) -> Language {
        self.default_language.unwrap_or_default()
    }

    /// Apply a `set <key> <value>` from the CLI.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        match key {
            "server-url" => {
                self.server_url = Some(value.to_string());
                Ok(())
            }
            "language" => {
                self.default_language = Some(value.parse::<Language>()?);
                Ok(())
            }
            _ => Err(format!("unknown config key: {key} (expected server-url or language)").into()),
        }
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.server_url {
            Some(url) => println!("  server-url: {url}"),
            None => println!("  server-url: (unset, using {DEFAULT_SERVER_URL})"),
        }
        match self.default_language {
            Some(language) => println!("  language: {language}"),
            None => println!("  language: (unset, using en)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.server_url(), DEFAULT_SERVER_URL);
        assert_eq!(config.language(), Language::En);
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set_value("server-url", "https://mood.example.com").unwrap();
        config.set_value("language", "fr").unwrap();
        config.save_to_path(&path).unwrap();

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(reloaded.server_url(), "https://mood.example.com");
        assert_eq!(reloaded.language(), Language::Fr);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_languages() {
        let mut config = Config::default();
        assert!(config.set_value("theme", "dark").is_err());
        assert!(config.set_value("language", "de").is_err());
    }
}
