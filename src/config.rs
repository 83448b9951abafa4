use thiserror::Error;
use tracing::debug;

pub const DEFAULT_PORT: u16 = 9000;

/// Web origins allowed to call the API with credentials when none are configured
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = [
    "https://car-doctor-244f4.web.app",
    "https://car-doctor-244f4.firebaseapp.com",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    /// Document database connection string; the in-memory store is used when absent
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) => debug!(error = %e, "No .env file loaded"),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(value) => match value.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => return Err(ConfigError::Invalid { name: "PORT", value }),
            },
            None => DEFAULT_PORT,
        };

        let jwt_secret =
            non_empty("JWT_SECRET_KEY").ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;

        let cors_origins = match non_empty("CORS_ORIGINS") {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            port,
            database_url: non_empty("DATABASE_URL"),
            jwt_secret,
            cors_origins,
        })
    }
}
