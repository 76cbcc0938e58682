//! Process configuration, read once at startup from the environment
//! (`.env` is loaded first by `main`).

use std::fmt::Display;
use std::str::FromStr;

use url::Url;

use crate::auth::jwt::JwtConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS, from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Shared secret the payment provider signs notifications with. When
    /// unset, notifications are rejected.
    pub payment_webhook_secret: Option<String>,
    /// Public origin of the storefront SPA, without a trailing slash.
    /// Payment returns redirect here.
    pub frontend_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `FRONTEND_URL`          |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `PAYMENT_WEBHOOK_SECRET` | unset                   |
    /// | `FRONTEND_URL`           | `http://localhost:4200` |
    ///
    /// # Panics
    ///
    /// On unparsable numbers, a malformed `FRONTEND_URL`, or a missing
    /// `JWT_SECRET`.
    pub fn from_env() -> Self {
        let frontend_url = env_or("FRONTEND_URL", "http://localhost:4200");
        if let Err(e) = Url::parse(&frontend_url) {
            panic!("FRONTEND_URL must be an absolute URL: {e}");
        }
        let frontend_url = frontend_url.trim_end_matches('/').to_string();

        let cors_origins = env_or("CORS_ORIGINS", &frontend_url)
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parsed("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_parsed("REQUEST_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            payment_webhook_secret: std::env::var("PAYMENT_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            frontend_url,
        }
    }
}

pub(crate) fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse `key` if set, else `default`. Panics on a value that does not parse.
pub(crate) fn env_parsed<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
