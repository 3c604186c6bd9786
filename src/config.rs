use crate::error::{NotesError, Result};

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "notes_app_db";
pub const DEFAULT_COLLECTION: &str = "notes";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Server configuration.
///
/// Read from the process environment (after `.env` has been loaded) and then
/// overridden by `serve` flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Connection string for the document store (`MONGODB_URI`)
    pub mongodb_uri: String,
    /// Database name (`NOTES_DATABASE`)
    pub database: String,
    /// Collection holding the notes (`NOTES_COLLECTION`)
    pub collection: String,
    /// Listen host (`NOTES_HOST`)
    pub host: String,
    /// Listen port (`NOTES_PORT`)
    pub port: u16,
    /// Allowed CORS origins (`NOTES_CORS_ORIGINS`, comma-separated). Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or blank
    /// variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(uri) = get("MONGODB_URI") {
            config.mongodb_uri = uri;
        }
        if let Some(database) = get("NOTES_DATABASE") {
            config.database = database;
        }
        if let Some(collection) = get("NOTES_COLLECTION") {
            config.collection = collection;
        }
        if let Some(host) = get("NOTES_HOST") {
            config.host = host;
        }
        if let Some(port) = get("NOTES_PORT") {
            config.port = port.trim().parse().map_err(|_| {
                NotesError::Config(format!("NOTES_PORT must be a port number, got '{}'", port))
            })?;
        }
        if let Some(origins) = get("NOTES_CORS_ORIGINS") {
            config.cors_origins = parse_origins(&origins);
        }

        Ok(config)
    }

    /// `host:port` as accepted by `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
