//! Server settings and the configuration object built from them.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_PER_PAGE, MAX_PER_PAGE};
use serde::Deserialize;

use roster::inbound::http::state::{DEFAULT_MAX_UPLOAD_BYTES, UploadConfig};
use roster::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings layered from CLI flags, `ROSTER_*` environment variables and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROSTER")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Directory uploaded CSV bodies are spooled into.
    pub upload_dir: Option<PathBuf>,
    /// Largest accepted CSV body in bytes.
    pub max_upload_bytes: Option<usize>,
    /// Page size used when a list request omits `perPage`.
    pub page_size: Option<u64>,
}

/// Invalid setting values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("bind address {value:?} is not a socket address")]
    BindAddr { value: String },
    #[error("page size must be between 1 and {MAX_PER_PAGE}, got {value}")]
    PageSize { value: u64 },
    #[error("max upload size must be positive")]
    MaxUploadBytes,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|_| SettingsError::BindAddr {
            value: value.to_owned(),
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn upload(&self) -> Result<UploadConfig, SettingsError> {
        let max_upload_bytes = self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        if max_upload_bytes == 0 {
            return Err(SettingsError::MaxUploadBytes);
        }
        Ok(UploadConfig {
            upload_dir: self.upload_dir.clone().unwrap_or_else(std::env::temp_dir),
            max_upload_bytes,
        })
    }

    pub fn page_size(&self) -> Result<u64, SettingsError> {
        let value = self.page_size.unwrap_or(DEFAULT_PER_PAGE);
        if (1..=MAX_PER_PAGE).contains(&value) {
            Ok(value)
        } else {
            Err(SettingsError::PageSize { value })
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) upload: UploadConfig,
    pub(crate) page_size: u64,
}

impl ServerConfig {
    /// Validate settings into a server configuration without a database.
    pub fn from_settings(settings: &ServerSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            db_pool: None,
            upload: settings.upload()?,
            page_size: settings.page_size()?,
        })
    }

    /// Attach a database connection pool for persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
