use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::TrackError;

pub const DEFAULT_CONFIG_FILE: &str = "biotrack.json";

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub user_name: String,
    #[serde(default)]
    pub database: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub user_name: String,
    pub database: Utf8PathBuf,
}

/// The acting user, stamped onto every interface this process creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserContext {
    pub user_id: i64,
    pub user_name: String,
}

pub struct SettingsLoader;

impl SettingsLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedSettings, TrackError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Err(TrackError::MissingConfig);
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| TrackError::ConfigRead(config_path.clone()))?;
        let settings: Settings = serde_json::from_str(&content)
            .map_err(|err| TrackError::ConfigParse(err.to_string()))?;

        Self::resolve_settings(settings)
    }

    pub fn resolve_settings(settings: Settings) -> Result<ResolvedSettings, TrackError> {
        let user_name = settings.user_name.trim().to_string();
        if user_name.is_empty() {
            return Err(TrackError::ConfigParse("user_name must not be empty".to_string()));
        }

        let database = match settings.database {
            Some(path) => Utf8PathBuf::from(path),
            None => default_database_path()?,
        };

        Ok(ResolvedSettings {
            user_name,
            database,
        })
    }
}

pub fn default_database_path() -> Result<Utf8PathBuf, TrackError> {
    BaseDirs::new()
        .and_then(|dirs| {
            Utf8PathBuf::from_path_buf(
                dirs.data_local_dir()
                    .join("biotrack")
                    .join("biotrack.sqlite"),
            )
            .ok()
        })
        .ok_or_else(|| TrackError::Filesystem("unable to resolve data directory".to_string()))
}
