use std::path::PathBuf;

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite connection URL (default: `sqlite://expenses.db`).
    pub database_url: String,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory uploaded media is written under (default: `media`).
    pub media_root: PathBuf,
    /// URL prefix media is served from. Always starts and ends with `/`.
    pub media_url: String,
    /// Largest accepted request body in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// Bearer token for the admin console. The console is disabled when unset.
    pub admin_token: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `DATABASE_URL`         | `sqlite://expenses.db`     |
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MEDIA_ROOT`           | `media`                    |
    /// | `MEDIA_URL`            | `/media/`                  |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`                 |
    /// | `ADMIN_TOKEN`          | unset                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.to_string());

        let cors_origins: Vec<String> = get("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let admin_token = lookup("ADMIN_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self {
            database_url: get("DATABASE_URL", "sqlite://expenses.db"),
            host: get("HOST", "0.0.0.0"),
            port: parse("PORT", get("PORT", "8000"))?,
            cors_origins,
            request_timeout_secs: parse("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS", "30"))?,
            media_root: PathBuf::from(get("MEDIA_ROOT", "media")),
            media_url: normalize_media_url(get("MEDIA_URL", "/media/"))?,
            max_upload_bytes: parse("MAX_UPLOAD_BYTES", get("MAX_UPLOAD_BYTES", "10485760"))?,
            admin_token,
        })
    }

    /// Path the media directory is mounted at, without the trailing slash.
    pub fn media_mount_path(&self) -> &str {
        self.media_url.trim_end_matches('/')
    }
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

fn normalize_media_url(raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid {
            var: "MEDIA_URL",
            value: raw,
            reason: "media cannot be served from the site root".into(),
        });
    }
    Ok(format!("/{trimmed}/"))
}
