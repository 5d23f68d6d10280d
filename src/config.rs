use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Server configuration, loaded from environment variables (a `.env` file
/// is honored by the binary). Every field has a local-development default.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_expiry_hours: i64,
}

impl Config {
    pub fn load() -> Self {
        let config = Self {
            port: try_load("PORT", "5000"),
            database_url: try_load("DATABASE_URL", "sqlite:tourcraft.db?mode=rwc"),
            jwt_secret: try_load("JWT_SECRET", "dev-secret"),
            token_expiry_hours: try_load("TOKEN_EXPIRY_HOURS", "24"),
        };

        if config.jwt_secret == "dev-secret" {
            warn!("JWT_SECRET not set, tokens are signed with the development secret");
        }

        config
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
