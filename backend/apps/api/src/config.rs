//! Server Configuration
//!
//! Everything is read from the process environment (after `.env` is loaded).
//! Unset and empty variables fall back to development defaults.

use std::fmt;
use std::str::FromStr;

use auth::AuthConfig;
use platform::password::ClearTextPassword;
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid {expected}: {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{0} must be set in production")]
    MissingInProduction(&'static str),
}

/// Deployment mode; only `production` changes behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Production => "production",
        })
    }
}

/// Where the store lives
pub struct DatabaseConfig {
    /// Takes precedence over the individual parts
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) => url.parse(),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .database(&self.name)
                .username(&self.user)
                .password(&self.password)),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Identity ensured at startup
#[derive(Debug)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: ClearTextPassword,
}

#[derive(Debug)]
pub struct ServerConfig {
    pub environment: Environment,
    pub port: u16,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    pub frontend_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let or = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let environment: Environment = or("APP_ENV", "development")
            .parse()
            .unwrap_or(Environment::Development);

        let auth = match get("JWT_SECRET") {
            Some(secret) => AuthConfig::new(secret),
            None if environment.is_production() => {
                return Err(ConfigError::MissingInProduction("JWT_SECRET"));
            }
            None => {
                tracing::warn!("JWT_SECRET not set, using a random per-process secret");
                AuthConfig::with_random_secret()
            }
        };

        let database = DatabaseConfig {
            url: get("DATABASE_URL"),
            host: or("DB_HOST", "localhost"),
            port: parse_port("DB_PORT", get("DB_PORT"), 5432)?,
            name: or("DB_NAME", "plots_db"),
            user: or("DB_USER", "plots_user"),
            password: or("DB_PASSWORD", "plots_password"),
        };

        let admin = AdminConfig {
            username: or("ADMIN_USERNAME", "admin"),
            email: or("ADMIN_EMAIL", "admin@plots.com"),
            password: ClearTextPassword::new(or("ADMIN_PASSWORD", "admin123")),
        };

        let frontend_origins = or(
            "FRONTEND_ORIGINS",
            "http://localhost:5173,http://127.0.0.1:5173",
        )
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect();

        Ok(Self {
            environment,
            port: parse_port("PORT", get("PORT"), 3000)?,
            database,
            auth,
            admin,
            frontend_origins,
        })
    }
}

fn parse_port(name: &'static str, raw: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected: "port number",
            value,
        }),
    }
}
