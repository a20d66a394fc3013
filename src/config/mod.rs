use std::env;
use std::path::PathBuf;

/// Origins allowed when `CORS_ALLOWED_ORIGINS` is unset.
const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,http://localhost:3001,https://blockscan-swin.vercel.app";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_anon_key: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub slither_bin: String,
    pub slither_max_output_bytes: usize,
    pub shutdown_grace_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_anon_key: required("DATABASE_ANON_KEY")?,
            database_max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed_or("BACKEND_PORT", 5000),
            cors_allowed_origins: parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            max_upload_bytes: parsed_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
            slither_bin: env::var("SLITHER_BIN").unwrap_or_else(|_| "slither".to_string()),
            slither_max_output_bytes: parsed_or("SLITHER_MAX_OUTPUT_BYTES", 50 * 1024 * 1024),
            shutdown_grace_secs: parsed_or("SHUTDOWN_GRACE_SECS", 10),
        })
    }
}

/// Read a variable that must be present and non-blank.
fn required(key: &str) -> Result<String, env::VarError> {
    let value = env::var(key)?;
    if value.trim().is_empty() {
        return Err(env::VarError::NotPresent);
    }
    Ok(value)
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
