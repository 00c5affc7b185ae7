use std::path::PathBuf;

use treeshop_core::upload::DEFAULT_UPLOADS_DIR;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory that receives uploaded images and is served at `/uploads`.
    pub uploads_dir: PathBuf,
    /// Maximum accepted request body size in bytes (default: 5 MiB).
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default          |
    /// |------------------------|------------------|
    /// | `HOST`                 | `0.0.0.0`        |
    /// | `PORT`                 | `3001`           |
    /// | `REQUEST_TIMEOUT_SECS` | `30`             |
    /// | `UPLOADS_DIR`          | `public/uploads` |
    /// | `MAX_UPLOAD_BYTES`     | `5242880`        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let uploads_dir = std::env::var("UPLOADS_DIR")
            .unwrap_or_else(|_| DEFAULT_UPLOADS_DIR.into())
            .into();

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (5 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            request_timeout_secs,
            uploads_dir,
            max_upload_bytes,
        }
    }
}
