//! Settings injected into the clients at construction.
//!
//! Layers, lowest first: built-in defaults, the TOML file, command line and
//! environment.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_STORE_URL: &str = "http://localhost:3000/cities";
pub const DEFAULT_WEATHER_URL: &str = "https://api.weatherapi.com/v1";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Collection resource of the local store.
    pub store_url: String,

    /// Base of the weather service; `current.json` is appended.
    pub weather_url: String,

    pub api_key: String,
}

/// Shape of the config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub store_url: Option<String>,
    pub weather_url: Option<String>,
    pub api_key: Option<String>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// A missing file at the default location is not an error; a missing
    /// file the user asked for is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text)
                .map_err(|e| Error::Config(format!("{}: {e}", path.display()))),
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::Config(format!("{}: {e}", path.display()))),
        }
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("citywx").join("config.toml"))
}

impl Config {
    /// `overrides` come from the command line and win over the file.
    pub fn resolve(file: FileConfig, overrides: FileConfig) -> Result<Self> {
        let api_key = overrides
            .api_key
            .or(file.api_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::Config("a weather service API key is required (--api-key or WEATHERAPI_KEY)".into())
            })?;

        Ok(Self {
            store_url: overrides
                .store_url
                .or(file.store_url)
                .unwrap_or_else(|| DEFAULT_STORE_URL.to_string()),
            weather_url: overrides
                .weather_url
                .or(file.weather_url)
                .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
            api_key,
        })
    }
}
