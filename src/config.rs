use std::env;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".person-registry";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "records.sqlite";
const LOG_DIR_NAME: &str = "logs";

pub const DB_PATH_VAR: &str = "PERSON_REGISTRY_DB";
pub const LOG_DIR_VAR: &str = "PERSON_REGISTRY_LOG_DIR";
pub const LOG_LEVEL_VAR: &str = "PERSON_REGISTRY_LOG_LEVEL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("could not locate home directory")]
    NoHomeDir,
    #[error("{var} must be an absolute path, got `{value}`")]
    RelativePath { var: &'static str, value: String },
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    UnknownLogLevel(String),
}

/// Where the app keeps its data and how loudly it logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: &'static str,
}

impl AppConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        Self::resolve(|name| env::var(name).ok(), home.as_deref())
    }

    /// Resolve the configuration from an arbitrary variable lookup. The home
    /// directory is only required when one of the paths is not overridden.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        home: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let data_dir = || {
            home.map(|home| home.join(DATA_DIR_NAME))
                .ok_or(ConfigError::NoHomeDir)
        };

        let db_path = match override_path(&lookup, DB_PATH_VAR)? {
            Some(path) => path,
            None => data_dir()?.join(DB_FILE_NAME),
        };
        let log_dir = match override_path(&lookup, LOG_DIR_VAR)? {
            Some(path) => path,
            None => data_dir()?.join(LOG_DIR_NAME),
        };
        let log_level = match non_empty(lookup(LOG_LEVEL_VAR)) {
            Some(level) => normalize_level(&level)?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

pub fn normalize_level(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        _ => Err(ConfigError::UnknownLogLevel(level.trim().to_string())),
    }
}

fn override_path(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<PathBuf>, ConfigError> {
    let Some(value) = non_empty(lookup(var)) else {
        return Ok(None);
    };
    let path = PathBuf::from(&value);
    if path.is_absolute() {
        Ok(Some(path))
    } else {
        Err(ConfigError::RelativePath { var, value })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_live_under_the_home_directory() {
        let home = PathBuf::from("/home/ana");
        let config = AppConfig::resolve(lookup(&[]), Some(home.as_path())).unwrap();
        assert_eq!(
            config.db_path,
            PathBuf::from("/home/ana/.person-registry/records.sqlite")
        );
        assert_eq!(
            config.log_dir,
            PathBuf::from("/home/ana/.person-registry/logs")
        );
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn overrides_do_not_need_a_home_directory() {
        let config = AppConfig::resolve(
            lookup(&[
                (DB_PATH_VAR, "/tmp/people.sqlite"),
                (LOG_DIR_VAR, "/tmp/people-logs"),
                (LOG_LEVEL_VAR, " Warning "),
            ]),
            None,
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/people.sqlite"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/people-logs"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn missing_home_without_overrides_is_an_error() {
        let err = AppConfig::resolve(lookup(&[]), None).unwrap_err();
        assert_eq!(err, ConfigError::NoHomeDir);
    }

    #[test]
    fn relative_override_is_rejected() {
        let home = PathBuf::from("/home/ana");
        let err = AppConfig::resolve(
            lookup(&[(DB_PATH_VAR, "data/people.sqlite")]),
            Some(home.as_path()),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::RelativePath { var, .. } if var == DB_PATH_VAR));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let home = PathBuf::from("/home/ana");
        let err = AppConfig::resolve(lookup(&[(LOG_LEVEL_VAR, "loud")]), Some(home.as_path()))
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownLogLevel("loud".to_string()));
    }
}
