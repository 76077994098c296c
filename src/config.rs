use std::env;
use std::net::SocketAddr;

/// Minimum accepted length of `JWT_SECRET`, in bytes (HS256 key size).
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct Config {
    // Datastore
    pub redis_url: String,
    pub db_name: String,

    // Auth
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub bcrypt_cost: u32,

    // Server
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,

    // Limits
    pub max_body_bytes: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("redis_url", &"[REDACTED]")
            .field("db_name", &self.db_name)
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("bind_addr", &self.bind_addr)
            .field("cors_origins", &self.cors_origins)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        // Datastore connection string is required
        let redis_url =
            env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL".to_string()))?;
        if redis_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "REDIS_URL".to_string(),
                "cannot be empty".to_string(),
            ));
        }

        let db_name = env::var("DB_NAME").unwrap_or_else(|_| "gsa".to_string());
        if db_name.is_empty()
            || !db_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::InvalidValue(
                "DB_NAME".to_string(),
                "must be non-empty and contain only alphanumeric characters, hyphens, and underscores"
                    .to_string(),
            ));
        }

        // Signing secret: no built-in fallback
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET".to_string(),
                format!("must be at least {} bytes", MIN_SECRET_LEN),
            ));
        }

        let token_ttl_secs = parse_env_or_default("TOKEN_TTL_SECS", 86_400)?;
        if token_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "TOKEN_TTL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let bcrypt_cost = parse_env_or_default("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue(
                "BCRYPT_COST".to_string(),
                "must be between 4 and 31".to_string(),
            ));
        }

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if cors_origins.is_empty() {
            return Err(ConfigError::InvalidValue(
                "CORS_ORIGINS".to_string(),
                "must list at least one origin, or *".to_string(),
            ));
        }

        // Limits
        let max_body_bytes = parse_env_or_default("MAX_BODY_BYTES", 1_048_576)?;

        Ok(Config {
            redis_url,
            db_name,
            jwt_secret,
            token_ttl_secs,
            bcrypt_cost,
            bind_addr,
            cors_origins,
            max_body_bytes,
        })
    }
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}
