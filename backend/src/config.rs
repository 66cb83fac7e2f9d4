use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub app_base_url: String,
    /// Postgres greeting store. Takes precedence over the in-memory store.
    pub database_url: Option<String>,
    /// Remote greeting API; when set, the site only renders pages on top of it.
    pub greetings_api_url: Option<String>,
    pub redis_url: Option<String>,
    pub assets_dir: String,
    pub display_utc_offset_hours: i32,
    /// Greeting submissions allowed per client IP per hour.
    pub submit_rate_limit: u64,
    // SMTP (optional)
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub couple_email: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost".into()),
            database_url: optional("DATABASE_URL"),
            greetings_api_url: optional("GREETINGS_API_URL"),
            redis_url: optional("REDIS_URL"),
            assets_dir: env::var("ASSETS_DIR").unwrap_or_else(|_| "./assets".into()),
            display_utc_offset_hours: env::var("DISPLAY_UTC_OFFSET_HOURS")
                .unwrap_or_else(|_| "7".into())
                .parse()?,
            submit_rate_limit: env::var("SUBMIT_RATE_LIMIT")
                .unwrap_or_else(|_| "5".into())
                .parse()?,
            smtp_host: optional("SMTP_HOST"),
            smtp_port: env::var("SMTP_PORT").ok().and_then(|v| v.parse().ok()),
            smtp_username: optional("SMTP_USERNAME"),
            smtp_password: optional("SMTP_PASSWORD"),
            smtp_from: optional("SMTP_FROM"),
            couple_email: optional("COUPLE_EMAIL"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            app_base_url: "http://localhost".into(),
            database_url: None,
            greetings_api_url: None,
            redis_url: None,
            assets_dir: "./assets".into(),
            display_utc_offset_hours: 7,
            submit_rate_limit: 5,
            smtp_host: None,
            smtp_port: None,
            smtp_username: None,
            smtp_password: None,
            smtp_from: None,
            couple_email: None,
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}
