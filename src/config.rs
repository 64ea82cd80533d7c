use std::env;
use std::fmt;

use crate::auth::DEFAULT_HASH_COST;

/// `DATABASE_URL` value selecting the in-process store.
pub const MEMORY_DATABASE_URL: &str = "memory://";

pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_port: u16,
    pub server_host: String,
    pub bcrypt_cost: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} must be set", name),
            ConfigError::Invalid(name, value) => write!(f, "{} has an invalid value: {:?}", name, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let server_port = match lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("SERVER_PORT", raw))?,
            None => 8080,
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => return Err(ConfigError::Invalid("BCRYPT_COST", raw)),
            },
            None => DEFAULT_HASH_COST,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            server_port,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            bcrypt_cost,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
