use std::time::Duration;

/// Runtime configuration, loaded once at startup from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Postgres connection string. Required — the server has no storage
    /// fallback.
    pub database_url: String,
    /// Strict event validation: require `path` and `timestamp` in addition
    /// to `type`. When off, a missing timestamp falls back to server
    /// receive time.
    pub strict_events: bool,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub db_idle_timeout_secs: u64,
    /// ipapi-style geolocation endpoint used by the collector.
    pub geo_endpoint: String,
    pub geo_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("COMPASS_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| "DATABASE_URL is required".to_string())?,
            strict_events: std::env::var("COMPASS_STRICT_EVENTS")
                .map(|v| v != "false")
                .unwrap_or(true),
            db_max_connections: std::env::var("COMPASS_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            db_acquire_timeout_secs: std::env::var("COMPASS_DB_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            db_idle_timeout_secs: std::env::var("COMPASS_DB_IDLE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .unwrap_or(600),
            geo_endpoint: std::env::var("COMPASS_GEO_ENDPOINT")
                .unwrap_or_else(|_| "https://ipapi.co/json/".to_string()),
            geo_timeout_ms: std::env::var("COMPASS_GEO_TIMEOUT_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .unwrap_or(2000),
        })
    }

    pub fn db_acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.db_acquire_timeout_secs)
    }

    pub fn db_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.db_idle_timeout_secs)
    }

    pub fn geo_timeout(&self) -> Duration {
        Duration::from_millis(self.geo_timeout_ms)
    }
}
