//! Settings for eventctl.
//!
//! Settings are layered: the TOML file is read first, then `EVENTCAST_*`
//! environment variables override individual keys. A missing file is
//! fine as long as the environment supplies every required setting.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing required setting '{key}' (or environment variable {env_var})")]
    MissingField {
        key: &'static str,
        env_var: &'static str,
    },

    #[error("Invalid value for {env_var}: {value}")]
    InvalidValue { env_var: &'static str, value: String },
}

/// Immutable connection settings, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Event stream connection string
    /// (`Endpoint=...;SharedAccessKeyName=...;SharedAccessKey=...;EntityPath=...`).
    pub connection_string: String,

    /// Stream events are published to.
    pub stream_name: String,

    /// Base URL of the schema registry.
    pub registry_endpoint: String,

    /// Group schemas are resolved under.
    pub schema_group: String,

    /// Schema id the dynamic workflow fetches; when absent, the demo
    /// falls back to the id assigned while seeding the Order schema.
    pub target_schema_id: Option<i32>,
}

/// `[settings]` table as it appears in the file. Every key is optional
/// here; required-field checks run after environment layering.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    connection_string: Option<String>,
    stream_name: Option<String>,
    registry_endpoint: Option<String>,
    schema_group: Option<String>,
    target_schema_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    settings: RawSettings,
}

impl Settings {
    /// Load settings from a file plus environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_from(path, |name| std::env::var(name).ok())
    }

    fn load_from(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let file: SettingsFile =
                toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;
            file.settings
        } else {
            RawSettings::default()
        };

        let target_schema_id = match env("EVENTCAST_TARGET_SCHEMA_ID") {
            Some(value) => Some(value.parse::<i32>().map_err(|_| ConfigError::InvalidValue {
                env_var: "EVENTCAST_TARGET_SCHEMA_ID",
                value,
            })?),
            None => raw.target_schema_id,
        };

        Ok(Settings {
            connection_string: require(
                env("EVENTCAST_CONNECTION_STRING").or(raw.connection_string),
                "connection_string",
                "EVENTCAST_CONNECTION_STRING",
            )?,
            stream_name: require(
                env("EVENTCAST_STREAM_NAME").or(raw.stream_name),
                "stream_name",
                "EVENTCAST_STREAM_NAME",
            )?,
            registry_endpoint: require(
                env("EVENTCAST_REGISTRY_ENDPOINT").or(raw.registry_endpoint),
                "registry_endpoint",
                "EVENTCAST_REGISTRY_ENDPOINT",
            )?,
            schema_group: require(
                env("EVENTCAST_SCHEMA_GROUP").or(raw.schema_group),
                "schema_group",
                "EVENTCAST_SCHEMA_GROUP",
            )?,
            target_schema_id,
        })
    }
}

fn require(
    value: Option<String>,
    key: &'static str,
    env_var: &'static str,
) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField { key, env_var }),
    }
}
