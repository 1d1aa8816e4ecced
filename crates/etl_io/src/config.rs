//! Connection settings for the source database.

use crate::IoError;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Environment variable holding the database host.
pub const HOST_VAR: &str = "POSTGRES_HOST";
/// Environment variable holding the database user.
pub const USER_VAR: &str = "POSTGRES_USER";
/// Environment variable holding the database password.
pub const PASSWORD_VAR: &str = "POSTGRES_PASSWORD";
/// Environment variable holding the database name.
pub const DB_VAR: &str = "POSTGRES_DB";
/// Environment variable holding the database port.
pub const PORT_VAR: &str = "POSTGRES_PORT";

/// Connection parameters, passed through to the source untouched.
///
/// Values are kept as strings; an empty value means "not set".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Database host
    pub host: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Database name
    pub dbname: String,
    /// Database port
    pub port: String,
}

impl ConnectionSettings {
    /// Builds settings by looking up each `POSTGRES_*` variable; missing
    /// variables become empty strings.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            host: get(HOST_VAR),
            user: get(USER_VAR),
            password: get(PASSWORD_VAR),
            dbname: get(DB_VAR),
            port: get(PORT_VAR),
        }
    }

    /// Parses the port. Empty means unset.
    pub fn port_number(&self) -> Result<Option<u16>, IoError> {
        let port = self.port.trim();
        if port.is_empty() {
            return Ok(None);
        }
        port.parse()
            .map(Some)
            .map_err(|_| IoError::connection(format!("invalid port '{port}'")))
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &password)
            .field("dbname", &self.dbname)
            .field("port", &self.port)
            .finish()
    }
}

/// Produces connection settings for a run.
pub trait SettingsLoader {
    /// Loads the settings. Loading never fails; missing values are empty.
    fn load(&self) -> ConnectionSettings;
}

/// Fixed settings, mostly useful in tests.
impl SettingsLoader for ConnectionSettings {
    fn load(&self) -> ConnectionSettings {
        self.clone()
    }
}

/// Loads settings from the process environment, after reading a `.env` file.
///
/// Variables already set in the environment win over the `.env` file.
#[derive(Debug, Clone, Default)]
pub struct EnvSettingsLoader {
    env_file: Option<PathBuf>,
}

impl EnvSettingsLoader {
    /// Creates a loader reading `.env` from the working directory, if present.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader reading the given env file instead of `./.env`.
    pub fn with_env_file(path: impl Into<PathBuf>) -> Self {
        Self {
            env_file: Some(path.into()),
        }
    }
}

impl SettingsLoader for EnvSettingsLoader {
    fn load(&self) -> ConnectionSettings {
        match &self.env_file {
            Some(path) => match dotenvy::from_path(path) {
                Ok(()) => debug!(path = %path.display(), "Loaded env file"),
                Err(e) => warn!(path = %path.display(), error = %e, "Could not load env file"),
            },
            None => match dotenvy::dotenv() {
                Ok(path) => debug!(path = %path.display(), "Loaded env file"),
                Err(e) if e.not_found() => debug!("No .env file found"),
                Err(e) => warn!(error = %e, "Could not load .env file"),
            },
        }

        ConnectionSettings::from_lookup(|key| std::env::var(key).ok())
    }
}
