//! Server configuration from command-line flags and environment.
//!
//! Every setting can come from a flag or its `NOTES_*` variable; nothing
//! secret is compiled in.

use axum::http::HeaderValue;
use clap::Parser;
use notes_core::DbTarget;
use std::path::PathBuf;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Notes REST API server.
#[derive(Debug, Clone, Parser)]
#[command(name = "notes-server", version, about)]
pub struct ServerConfig {
    /// Host to bind to.
    #[arg(long, env = "NOTES_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "NOTES_PORT", default_value_t = 8000)]
    pub port: u16,

    /// SQLite database file.
    #[arg(long, env = "NOTES_DB_PATH", default_value = "notes.sqlite3")]
    pub db_path: PathBuf,

    /// Keep notes in memory only; `--db-path` is ignored.
    #[arg(long, env = "NOTES_IN_MEMORY")]
    pub in_memory: bool,

    /// Browser origin allowed to call the API.
    #[arg(long, env = "NOTES_CORS_ORIGIN", default_value = DEFAULT_CORS_ORIGIN)]
    pub cors_origin: String,

    /// trace|debug|info|warn|error. Defaults to debug in debug builds, info otherwise.
    #[arg(long, env = "NOTES_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs go to stderr when unset.
    #[arg(long, env = "NOTES_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            db_path: PathBuf::from("notes.sqlite3"),
            in_memory: false,
            cors_origin: DEFAULT_CORS_ORIGIN.into(),
            log_level: None,
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// Get bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn db_target(&self) -> DbTarget {
        if self.in_memory {
            DbTarget::Memory
        } else {
            DbTarget::File(self.db_path.clone())
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| notes_core::default_log_level())
    }

    /// Parses the configured origin into a CORS header value.
    pub fn cors_origin_header(&self) -> anyhow::Result<HeaderValue> {
        let origin = self.cors_origin.trim();
        if origin.is_empty() || origin == "*" {
            anyhow::bail!("cors origin must be a concrete origin, got `{origin}`");
        }
        HeaderValue::from_str(origin)
            .map_err(|err| anyhow::anyhow!("invalid cors origin `{origin}`: {err}"))
    }
}
