//! Server configuration.
//!
//! Everything is read from environment variables (optionally loaded from a `.env` file by the binary). Invalid or
//! missing values are logged and replaced with defaults, so the server always starts.
//!
//! | Variable                     | Default                        |
//! |------------------------------|--------------------------------|
//! | `VPM_HOST`                   | `127.0.0.1`                    |
//! | `VPM_PORT`                   | `8470`                         |
//! | `VPM_DATABASE_URL`           | `sqlite://data/vendor_perf.db` |
//! | `VPM_DB_MAX_CONNECTIONS`     | `25`                           |
//! | `VPM_AUTO_MIGRATE`           | `true`                         |
//! | `VPM_JWT_SECRET`             | random, per process            |
//! | `VPM_ACCESS_TOKEN_LIFETIME`  | `300` seconds                  |
//! | `VPM_REFRESH_TOKEN_LIFETIME` | `86400` seconds                |
//! | `VPM_BCRYPT_COST`            | `12`                           |
use std::{env, fmt::Display, str::FromStr};

use chrono::Duration;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use vpm_common::{parse_boolean_flag, parse_env_value, Secret};

const DEFAULT_VPM_HOST: &str = "127.0.0.1";
const DEFAULT_VPM_PORT: u16 = 8470;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/vendor_perf.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_ACCESS_TOKEN_LIFETIME: i64 = 300;
const DEFAULT_REFRESH_TOKEN_LIFETIME: i64 = 86_400;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// If true, the embedded database migrations are run before the server starts accepting requests.
    pub auto_migrate: bool,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_VPM_HOST.to_string(),
            port: DEFAULT_VPM_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            auto_migrate: true,
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration using `lookup` to fetch each variable by name.
    pub fn from_lookup<F>(lookup: F) -> Self
    where F: Fn(&str) -> Option<String> {
        let host = lookup("VPM_HOST").unwrap_or_else(|| DEFAULT_VPM_HOST.into());
        let port = env_or_default(&lookup, "VPM_PORT", DEFAULT_VPM_PORT);
        let database_url = lookup("VPM_DATABASE_URL").unwrap_or_else(|| {
            info!("🪛️ VPM_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = env_or_default(&lookup, "VPM_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
        let auto_migrate = parse_boolean_flag(lookup("VPM_AUTO_MIGRATE"), true);
        let auth = AuthConfig::from_lookup(&lookup);
        Self { host, port, database_url, max_connections, auto_migrate, auth }
    }
}

/// Parses the variable `name`, falling back to `default` (with a log message) if it is missing or invalid.
fn env_or_default<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match parse_env_value::<T>(name, lookup(name)) {
        Ok(Some(v)) => v,
        Ok(None) => {
            debug!("🪛️ {name} is not set. Using the default value of {default}.");
            default
        },
        Err(e) => {
            error!("🪛️ {e}. Using the default, {default}, instead.");
            default
        },
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HS256 secret used to sign and verify access and refresh tokens.
    pub jwt_secret: Secret<String>,
    pub access_token_lifetime: Duration,
    pub refresh_token_lifetime: Duration,
    /// bcrypt cost factor for new password hashes. Existing hashes carry their own cost.
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: random_secret(),
            access_token_lifetime: Duration::seconds(DEFAULT_ACCESS_TOKEN_LIFETIME),
            refresh_token_lifetime: Duration::seconds(DEFAULT_REFRESH_TOKEN_LIFETIME),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AuthConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where F: Fn(&str) -> Option<String> {
        let jwt_secret = match lookup("VPM_JWT_SECRET") {
            Some(s) if !s.is_empty() => Secret::new(s),
            _ => random_secret(),
        };
        let access = env_or_default(lookup, "VPM_ACCESS_TOKEN_LIFETIME", DEFAULT_ACCESS_TOKEN_LIFETIME);
        let refresh = env_or_default(lookup, "VPM_REFRESH_TOKEN_LIFETIME", DEFAULT_REFRESH_TOKEN_LIFETIME);
        let mut bcrypt_cost = env_or_default(lookup, "VPM_BCRYPT_COST", bcrypt::DEFAULT_COST);
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            warn!(
                "🪛️ VPM_BCRYPT_COST must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}. Using the default, {}, \
                 instead.",
                bcrypt::DEFAULT_COST
            );
            bcrypt_cost = bcrypt::DEFAULT_COST;
        }
        Self {
            jwt_secret,
            access_token_lifetime: Duration::seconds(access.max(1)),
            refresh_token_lifetime: Duration::seconds(refresh.max(1)),
            bcrypt_cost,
        }
    }
}

fn random_secret() -> Secret<String> {
    warn!(
        "🚨️🚨️🚨️ VPM_JWT_SECRET has not been set. I'm using a random value for this session. Every token issued will \
         become invalid when the server restarts. DO NOT operate in production like this. 🚨️🚨️🚨️"
    );
    let secret = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect::<String>();
    Secret::new(secret)
}
